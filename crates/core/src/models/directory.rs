use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hospital_id: Option<String>,
    #[serde(default)]
    pub hospital_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub user_id: String,
    pub username: String,
    pub specialty: String,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl Doctor {
    /// Label used in doctor pickers, e.g. `Dr. Grey (Cardiology)`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.username, self.specialty)
    }
}

/// A bookable interval for one doctor on one date.
///
/// Times are kept in the backend's `HH:MM` text form; slots are matched by
/// `start_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub is_booked: bool,
}

impl TimeSlot {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            day_of_week: None,
            date: None,
            is_booked: false,
        }
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }

    /// Two slots denote the same interval when their start times match.
    pub fn same_start(&self, other: &TimeSlot) -> bool {
        self.start_time == other.start_time
    }
}
