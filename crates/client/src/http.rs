//! # HTTP Client
//!
//! `ApiClient` talks to the HealthSync REST backend with `reqwest`. Every
//! non-2xx response is turned into [`HealthError::Api`] carrying the server's
//! `detail` string when the body has one.

use async_trait::async_trait;
use chrono::NaiveDate;
use healthsync_core::{
    errors::{HealthError, HealthResult},
    models::{
        appointment::{
            Appointment, AppointmentWindow, CreateAppointmentRequest, CreateAppointmentResponse,
        },
        auth::{AuthResponse, LoginRequest, SignupRequest},
        chatbot::{ChatbotRequest, ChatbotResponse},
        directory::{Department, Doctor, Hospital, TimeSlot},
        emergency::{Coordinates, NearbyHospital, NearbyHospitalsResponse},
        history::MedicalRecord,
    },
};
use reqwest::{RequestBuilder, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    config::ClientConfig,
    services::{
        AuthService, ChatbotService, DirectoryService, EmergencyService, RecordsService,
    ReservationService,
    },
};

pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client honouring the configured base URL and request timeout.
    pub fn new(config: &ClientConfig) -> HealthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| HealthError::Internal(Box::new(e)))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Bearer {}", token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> HealthResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| HealthError::Transport(e.to_string()))?;

        let status = response.status();
        let url = response.url().path().to_string();
        debug!("{} {}", status.as_u16(), url);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            warn!("Request to {} failed with {}: {:?}", url, status, detail);
            return Err(HealthError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| HealthError::Transport(format!("invalid response body: {}", e)))
    }
}

/// Pulls a string `detail` out of an error body, if there is one.
///
/// Validation failures from the backend carry a list instead of a string;
/// those yield `None` so the caller's generic fallback is shown.
pub fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("detail")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl DirectoryService for ApiClient {
    async fn hospitals(&self, token: &str) -> HealthResult<Vec<Hospital>> {
        let request = self.authorized(self.http.get(self.url("/api/hospitals")), token);
        self.send(request).await
    }

    async fn departments(&self, token: &str, hospital_id: &str) -> HealthResult<Vec<Department>> {
        let request = self
            .authorized(self.http.get(self.url("/api/departments")), token)
            .query(&[("hospital_id", hospital_id)]);
        self.send(request).await
    }

    async fn doctors(&self, token: &str, department_id: &str) -> HealthResult<Vec<Doctor>> {
        let request = self
            .authorized(self.http.get(self.url("/api/doctors")), token)
            .query(&[("department_id", department_id)]);
        self.send(request).await
    }

    async fn slots(
        &self,
        token: &str,
        doctor_id: &str,
        date: NaiveDate,
    ) -> HealthResult<Vec<TimeSlot>> {
        let path = format!("/api/doctor/{}/slots", urlencoding::encode(doctor_id));
        let request = self
            .authorized(self.http.get(self.url(&path)), token)
            .query(&[("date", date.format("%Y-%m-%d").to_string())]);
        self.send(request).await
    }
}

#[async_trait]
impl ReservationService for ApiClient {
    async fn book(
        &self,
        token: &str,
        request: &CreateAppointmentRequest,
        idempotency_key: Uuid,
    ) -> HealthResult<CreateAppointmentResponse> {
        let request = self
            .authorized(self.http.post(self.url("/api/appointments")), token)
            .header(IDEMPOTENCY_HEADER, idempotency_key.to_string())
            .json(request);
        self.send(request).await
    }
}

#[async_trait]
impl AuthService for ApiClient {
    async fn login(&self, request: &LoginRequest) -> HealthResult<AuthResponse> {
        self.send(self.http.post(self.url("/api/auth/login")).json(request)).await
    }

    async fn signup(&self, request: &SignupRequest) -> HealthResult<AuthResponse> {
        self.send(self.http.post(self.url("/api/auth/signup")).json(request)).await
    }
}

#[async_trait]
impl EmergencyService for ApiClient {
    async fn nearby_hospitals(
        &self,
        token: &str,
        origin: Coordinates,
    ) -> HealthResult<Vec<NearbyHospital>> {
        let request = self
            .authorized(self.http.get(self.url("/api/emergency/hospitals")), token)
            .query(&[("lat", origin.lat), ("lng", origin.lng)]);
        let response: NearbyHospitalsResponse = self.send(request).await?;
        Ok(response.hospitals)
    }
}

#[async_trait]
impl ChatbotService for ApiClient {
    async fn ask(&self, query: &str) -> HealthResult<String> {
        if query.trim().is_empty() {
            return Err(HealthError::Validation("Please enter a question".to_string()));
        }
        let body = ChatbotRequest {
            query: query.to_string(),
        };
        let request = self.http.post(self.url("/chatbot")).json(&body);
        let response: ChatbotResponse = self.send(request).await?;
        Ok(response.response)
    }
}

#[async_trait]
impl RecordsService for ApiClient {
    async fn medical_history(&self, token: &str) -> HealthResult<Vec<MedicalRecord>> {
        let request = self.authorized(self.http.get(self.url("/api/medical-history")), token);
        self.send(request).await
    }

    async fn patient_history(
        &self,
        token: &str,
        patient_id: &str,
    ) -> HealthResult<Vec<MedicalRecord>> {
        let path = format!("/api/doctor/patient/{}/history", urlencoding::encode(patient_id));
        let request = self.authorized(self.http.get(self.url(&path)), token);
        self.send(request).await
    }

    async fn doctor_appointments(
        &self,
        token: &str,
        window: AppointmentWindow,
    ) -> HealthResult<Vec<Appointment>> {
        let path = format!("/api/doctor/appointments/{}", window.path_segment());
        let request = self.authorized(self.http.get(self.url(&path)), token);
        self.send(request).await
    }
}
