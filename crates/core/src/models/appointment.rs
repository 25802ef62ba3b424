use serde::{Deserialize, Serialize};

/// Body of `POST /api/appointments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub user_id: String,
    pub doctor_id: String,
    pub hospital_id: String,
    pub department_id: String,
    pub start_time: String,
    pub end_time: String,
    /// `YYYY-MM-DD`
    pub appointment_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppointmentResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// An existing appointment, as listed on the doctor's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub doctor_id: String,
    #[serde(default)]
    pub doctor_username: Option<String>,
    #[serde(default)]
    pub department_name: Option<String>,
    pub appointment_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
}

/// Which of the doctor's appointment lists to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentWindow {
    Today,
    Week,
}

impl AppointmentWindow {
    pub fn path_segment(&self) -> &'static str {
        match self {
            AppointmentWindow::Today => "today",
            AppointmentWindow::Week => "week",
        }
    }
}
