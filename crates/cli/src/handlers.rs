use std::sync::Arc;

use healthsync_booking::BookingFlow;
use healthsync_client::services::{ChatbotService, EmergencyService, RecordsService};
use healthsync_core::{
    errors::HealthError,
    models::{
        appointment::AppointmentWindow,
        auth::Role,
        emergency::{Coordinates, nearest_first},
    },
};
use healthsync_session::SessionProvider;
use tracing::{debug, info};

use crate::{commands::Command, render};

pub const LOGIN_FIRST: &str = "Please log in first (login <username> <password>).";
pub const DOCTORS_ONLY: &str = "Only doctors can do that.";
pub const PATIENTS_ONLY: &str = "Medical history is only kept for patients.";

/// Interactive front end over the session provider, the booking flow and the
/// emergency, assistant and records services.
///
/// Every command produces the text to print; errors are already turned into
/// user-facing messages.
pub struct Shell {
    sessions: SessionProvider,
    flow: BookingFlow,
    emergency: Arc<dyn EmergencyService>,
    chatbot: Arc<dyn ChatbotService>,
    records: Arc<dyn RecordsService>,
}

impl Shell {
    pub fn new(
        sessions: SessionProvider,
        flow: BookingFlow,
        emergency: Arc<dyn EmergencyService>,
        chatbot: Arc<dyn ChatbotService>,
        records: Arc<dyn RecordsService>,
    ) -> Self {
        Self {
            sessions,
            flow,
            emergency,
            chatbot,
            records,
        }
    }

    pub fn flow(&self) -> &BookingFlow {
        &self.flow
    }

    /// Restores a saved session and, when there is one, loads the hospitals.
    pub async fn start(&mut self) -> String {
        match self.sessions.restore().await {
            Ok(Some(session)) => {
                self.flow.load_hospitals().await;
                format!("Welcome back, {}. Type help for commands.", session.user.username)
            }
            Ok(None) => format!("Welcome to HealthSync. {}", LOGIN_FIRST),
            Err(e) => {
                info!("Could not restore session: {}", e);
                format!("Welcome to HealthSync. {}", LOGIN_FIRST)
            }
        }
    }

    pub async fn handle(&mut self, command: Command) -> String {
        debug!("Handling {:?}", command);
        match command {
            Command::Help => render::help(),
            Command::Login { username, password } => {
                match self.sessions.login(&username, &password).await {
                    Ok(session) => self.after_login(&session.user.username).await,
                    Err(e) => e.user_message("Login failed", "Error logging in"),
                }
            }
            Command::Signup {
                username,
                email,
                password,
            } => match self.sessions.signup(&username, &email, &password).await {
                Ok(session) => self.after_login(&session.user.username).await,
                Err(e) => e.user_message("Signup failed", "Error signing up"),
            },
            Command::Logout => {
                self.flow.start_over();
                match self.sessions.logout().await {
                    Ok(()) => "Logged out".to_string(),
                    Err(e) => e.user_message("Logout failed", "Error logging out"),
                }
            }
            Command::WhoAmI => render::user(self.sessions.handle().user().await.as_ref()),
            Command::Hospitals => {
                if !self.sessions.handle().is_authenticated().await {
                    return LOGIN_FIRST.to_string();
                }
                self.flow.load_hospitals().await;
                render::hospitals(self.flow.hospitals())
            }
            Command::Hospital(id) => {
                self.flow.choose_hospital(&id).await;
                render::form(&self.flow)
            }
            Command::Department(id) => {
                let result = self.flow.choose_department(&id).await;
                self.form_or(result)
            }
            Command::Doctor(id) => {
                let result = self.flow.choose_doctor(&id).await;
                self.form_or(result)
            }
            Command::Date(date) => {
                let result = self.flow.choose_date(date).await;
                self.form_or(result)
            }
            Command::Slot(index) => {
                let result = self.flow.select_slot_at(index);
                self.form_or(result)
            }
            Command::Form => render::form(&self.flow),
            Command::Book => {
                // The outcome lands in the flow's message and error strings.
                let _ = self.flow.submit().await;
                render::form(&self.flow)
            }
            Command::Emergency { lat, lng } => self.emergency(lat, lng).await,
            Command::Ask(query) => match self.chatbot.ask(&query).await {
                Ok(answer) => answer,
                Err(e) => e.user_message(
                    "The assistant could not answer",
                    "Error contacting the assistant",
                ),
            },
            Command::History(patient_id) => self.history(patient_id.as_deref()).await,
            Command::Schedule(window) => self.schedule(window).await,
            Command::Quit => "Goodbye".to_string(),
        }
    }

    async fn after_login(&mut self, username: &str) -> String {
        self.flow.start_over();
        self.flow.load_hospitals().await;
        format!("Logged in as {}\n{}", username, render::hospitals(self.flow.hospitals()))
    }

    async fn emergency(&self, lat: f64, lng: f64) -> String {
        let Some(token) = self.sessions.handle().token().await else {
            return LOGIN_FIRST.to_string();
        };
        let origin = match Coordinates::new(lat, lng) {
            Ok(origin) => origin,
            Err(e) => return e.user_message("Invalid position", "Invalid position"),
        };

        match self.emergency.nearby_hospitals(&token, origin).await {
            Ok(hospitals) => render::nearby(&nearest_first(&origin, hospitals)),
            Err(e) => e.user_message(
                "Failed to fetch nearby hospitals",
                "Error fetching nearby hospitals",
            ),
        }
    }

    /// Patients read their own history; doctors read a named patient's.
    async fn history(&self, patient_id: Option<&str>) -> String {
        let Some(session) = self.sessions.handle().current().await else {
            return LOGIN_FIRST.to_string();
        };

        let result = match (session.user.role(), patient_id) {
            (Some(Role::Patient), None) => self.records.medical_history(&session.token).await,
            (Some(Role::Doctor), Some(patient_id)) => {
                self.records.patient_history(&session.token, patient_id).await
            }
            (Some(Role::Doctor), None) => return "Usage: history <patient_id>".to_string(),
            (_, Some(_)) => return DOCTORS_ONLY.to_string(),
            (_, None) => return PATIENTS_ONLY.to_string(),
        };

        match result {
            Ok(records) => render::history(&records),
            Err(e) => e.user_message(
                "Failed to fetch medical history",
                "Error fetching medical history",
            ),
        }
    }

    async fn schedule(&self, window: AppointmentWindow) -> String {
        let Some(session) = self.sessions.handle().current().await else {
            return LOGIN_FIRST.to_string();
        };
        if session.user.role() != Some(Role::Doctor) {
            return DOCTORS_ONLY.to_string();
        }

        match self.records.doctor_appointments(&session.token, window).await {
            Ok(appointments) => render::appointments(&appointments, window),
            Err(e) => e.user_message(
                "Failed to fetch appointments",
                "Error fetching appointments",
            ),
        }
    }

    /// Validation problems are answered directly; everything else shows in the form.
    fn form_or(&self, result: Result<(), HealthError>) -> String {
        match result {
            Err(HealthError::Validation(message)) => message,
            _ => render::form(&self.flow),
        }
    }
}
