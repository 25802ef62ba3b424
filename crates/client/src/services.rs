//! Service seams consumed by the booking flow, the session provider and the shell.
//!
//! Every trait is implemented by [`crate::http::ApiClient`]; tests swap in the
//! mocks from [`crate::mock`].

use async_trait::async_trait;
use chrono::NaiveDate;
use healthsync_core::{
    errors::HealthResult,
    models::{
        appointment::{
            Appointment, AppointmentWindow, CreateAppointmentRequest, CreateAppointmentResponse,
        },
        auth::{AuthResponse, LoginRequest, SignupRequest},
        directory::{Department, Doctor, Hospital, TimeSlot},
        emergency::{Coordinates, NearbyHospital},
        history::MedicalRecord,
    },
};
use uuid::Uuid;

/// Lookup of hospitals, departments, doctors and slot availability.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    async fn hospitals(&self, token: &str) -> HealthResult<Vec<Hospital>>;

    async fn departments(&self, token: &str, hospital_id: &str) -> HealthResult<Vec<Department>>;

    async fn doctors(&self, token: &str, department_id: &str) -> HealthResult<Vec<Doctor>>;

    async fn slots(
        &self,
        token: &str,
        doctor_id: &str,
        date: NaiveDate,
    ) -> HealthResult<Vec<TimeSlot>>;
}

/// Accepts appointment bookings. Double-booking prevention is the server's job.
#[async_trait]
pub trait ReservationService: Send + Sync {
    async fn book(
        &self,
        token: &str,
        request: &CreateAppointmentRequest,
        idempotency_key: Uuid,
    ) -> HealthResult<CreateAppointmentResponse>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> HealthResult<AuthResponse>;

    async fn signup(&self, request: &SignupRequest) -> HealthResult<AuthResponse>;
}

#[async_trait]
pub trait EmergencyService: Send + Sync {
    async fn nearby_hospitals(
        &self,
        token: &str,
        origin: Coordinates,
    ) -> HealthResult<Vec<NearbyHospital>>;
}

#[async_trait]
pub trait ChatbotService: Send + Sync {
    async fn ask(&self, query: &str) -> HealthResult<String>;
}

/// Read-only views behind the patient and doctor dashboards.
#[async_trait]
pub trait RecordsService: Send + Sync {
    /// The logged-in patient's own history.
    async fn medical_history(&self, token: &str) -> HealthResult<Vec<MedicalRecord>>;

    /// A patient's history, as seen by their doctor.
    async fn patient_history(
        &self,
        token: &str,
        patient_id: &str,
    ) -> HealthResult<Vec<MedicalRecord>>;

    /// The logged-in doctor's appointments for today or the current week.
    async fn doctor_appointments(
        &self,
        token: &str,
        window: AppointmentWindow,
    ) -> HealthResult<Vec<Appointment>>;
}
