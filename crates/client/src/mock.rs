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
use mockall::mock;
use uuid::Uuid;

use crate::services::{
    AuthService, ChatbotService, DirectoryService, EmergencyService, RecordsService,
    ReservationService,
};

// Mock services for testing
mock! {
    pub Directory {}

    #[async_trait]
    impl DirectoryService for Directory {
        async fn hospitals(&self, token: &str) -> HealthResult<Vec<Hospital>>;
        async fn departments(
            &self,
            token: &str,
            hospital_id: &str,
        ) -> HealthResult<Vec<Department>>;
        async fn doctors(&self, token: &str, department_id: &str) -> HealthResult<Vec<Doctor>>;
        async fn slots(
            &self,
            token: &str,
            doctor_id: &str,
            date: NaiveDate,
        ) -> HealthResult<Vec<TimeSlot>>;
    }
}

mock! {
    pub Reservation {}

    #[async_trait]
    impl ReservationService for Reservation {
        async fn book(
            &self,
            token: &str,
            request: &CreateAppointmentRequest,
            idempotency_key: Uuid,
        ) -> HealthResult<CreateAppointmentResponse>;
    }
}

mock! {
    pub Auth {}

    #[async_trait]
    impl AuthService for Auth {
        async fn login(&self, request: &LoginRequest) -> HealthResult<AuthResponse>;
        async fn signup(&self, request: &SignupRequest) -> HealthResult<AuthResponse>;
    }
}

mock! {
    pub Emergency {}

    #[async_trait]
    impl EmergencyService for Emergency {
        async fn nearby_hospitals(
            &self,
            token: &str,
            origin: Coordinates,
        ) -> HealthResult<Vec<NearbyHospital>>;
    }
}

mock! {
    pub Chatbot {}

    #[async_trait]
    impl ChatbotService for Chatbot {
        async fn ask(&self, query: &str) -> HealthResult<String>;
    }
}

mock! {
    pub Records {}

    #[async_trait]
    impl RecordsService for Records {
        async fn medical_history(&self, token: &str) -> HealthResult<Vec<MedicalRecord>>;
        async fn patient_history(
            &self,
            token: &str,
            patient_id: &str,
        ) -> HealthResult<Vec<MedicalRecord>>;
        async fn doctor_appointments(
            &self,
            token: &str,
            window: AppointmentWindow,
        ) -> HealthResult<Vec<Appointment>>;
    }
}
