//! # Booking Flow Controller
//!
//! [`BookingFlow`] owns the selection, the option lists fetched for it and the
//! message/error strings shown beside the form.
//!
//! Selector changes are split in two halves so hosts can run fetches
//! concurrently: `select_*` updates the state synchronously and hands back a
//! [`FetchTicket`] when the next list must be loaded, and [`BookingFlow::apply`]
//! installs a finished fetch if its ticket is still current. The `choose_*`
//! methods do both halves in sequence.
//!
//! Fetch failures never roll the selection back; they only set the error
//! string. Nothing is retried.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use healthsync_client::services::{DirectoryService, ReservationService};
use healthsync_core::{
    errors::{HealthError, HealthResult},
    models::directory::{Department, Doctor, Hospital, TimeSlot},
};
use healthsync_session::SessionHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    fetch::{
        FetchKey, FetchOutcome, FetchTicket, Fetcher, Generations, LOGIN_REQUIRED_MESSAGE, Level,
    },
    slots::{SlotPanel, find_slot},
    state::BookingState,
};

pub const BOOKED_MESSAGE: &str = "Appointment booked successfully!";
pub const NO_SLOT_MESSAGE: &str = "Please select a time slot";

/// Which form controls accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub department: bool,
    pub doctor: bool,
    pub date: bool,
    pub submit: bool,
}

pub struct BookingFlow {
    directory: Arc<dyn DirectoryService>,
    reservations: Arc<dyn ReservationService>,
    session: SessionHandle,
    state: BookingState,
    hospitals: Vec<Hospital>,
    departments: Vec<Department>,
    doctors: Vec<Doctor>,
    slots: Vec<TimeSlot>,
    generations: Generations,
    message: Option<String>,
    error: Option<String>,
}

impl BookingFlow {
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        reservations: Arc<dyn ReservationService>,
        session: SessionHandle,
    ) -> Self {
        Self {
            directory,
            reservations,
            session,
            state: BookingState::Empty,
            hospitals: Vec::new(),
            departments: Vec::new(),
            doctors: Vec::new(),
            slots: Vec::new(),
            generations: Generations::default(),
            message: None,
            error: None,
        }
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn controls(&self) -> Controls {
        Controls {
            department: self.state.hospital_id().is_some(),
            doctor: self.state.department_id().is_some(),
            date: self.state.doctor_id().is_some(),
            submit: self.is_submit_enabled(),
        }
    }

    /// True exactly when hospital, department, doctor, date and slot are all chosen.
    pub fn is_submit_enabled(&self) -> bool {
        self.state.is_complete()
    }

    /// Earliest date the picker accepts.
    pub fn min_date(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn slot_panel(&self) -> SlotPanel {
        SlotPanel::build(&self.state, &self.slots)
    }

    pub fn fetcher(&self) -> Fetcher {
        Fetcher::new(self.directory.clone(), self.session.clone())
    }

    /// Loads the hospital list. Does nothing until a session exists.
    pub async fn load_hospitals(&mut self) {
        let Some(token) = self.session.token().await else {
            debug!("No session yet, not loading hospitals");
            return;
        };

        match self.directory.hospitals(&token).await {
            Ok(hospitals) => {
                debug!("Loaded {} hospitals", hospitals.len());
                self.hospitals = hospitals;
            }
            Err(e) => {
                warn!("Fetching hospitals failed: {}", e);
                self.error =
                    Some(e.user_message("Failed to fetch hospitals", "Error fetching hospitals"));
            }
        }
    }

    /// Chooses a hospital; a blank id clears it. Everything downstream is
    /// reset and any in-flight fetch for it becomes stale.
    pub fn select_hospital(&mut self, hospital_id: &str) -> Option<FetchTicket> {
        self.state = self.state.with_hospital(hospital_id);
        self.invalidate_from(Level::Departments);

        self.state.hospital_id().map(|hospital_id| {
            self.generations.ticket(FetchKey::Departments {
                hospital_id: hospital_id.to_string(),
            })
        })
    }

    pub fn select_department(&mut self, department_id: &str) -> HealthResult<Option<FetchTicket>> {
        self.state = self.state.with_department(department_id)?;
        self.invalidate_from(Level::Doctors);

        Ok(self.state.department_id().map(|department_id| {
            self.generations.ticket(FetchKey::Doctors {
                department_id: department_id.to_string(),
            })
        }))
    }

    /// Chooses a doctor. Slots wait for a date, so no fetch is started.
    pub fn select_doctor(&mut self, doctor_id: &str) -> HealthResult<()> {
        self.state = self.state.with_doctor(doctor_id)?;
        self.invalidate_from(Level::Slots);
        Ok(())
    }

    /// Chooses or clears the date. Dates before today are rejected.
    pub fn select_date(&mut self, date: Option<NaiveDate>) -> HealthResult<Option<FetchTicket>> {
        if let Some(date) = date {
            let min = self.min_date();
            if date < min {
                return Err(HealthError::Validation(format!(
                    "Date must be on or after {}",
                    min.format("%Y-%m-%d")
                )));
            }
        }

        self.state = self.state.with_date(date)?;
        self.invalidate_from(Level::Slots);

        Ok(match (self.state.doctor_id(), self.state.date()) {
            (Some(doctor_id), Some(date)) => Some(self.generations.ticket(FetchKey::Slots {
                doctor_id: doctor_id.to_string(),
                date,
            })),
            _ => None,
        })
    }

    /// Replaces the chosen slot with the fetched slot starting at the same time.
    pub fn select_slot(&mut self, slot: &TimeSlot) -> HealthResult<()> {
        let found = find_slot(&self.slots, &slot.start_time)
            .cloned()
            .ok_or_else(|| HealthError::Validation("That slot is not available".to_string()))?;
        if found.is_booked {
            return Err(HealthError::Validation("That slot is already booked".to_string()));
        }

        self.state = self.state.with_slot(found)?;
        Ok(())
    }

    /// Chooses the slot at `index` in the fetched list.
    pub fn select_slot_at(&mut self, index: usize) -> HealthResult<()> {
        let slot = self
            .slots
            .get(index)
            .cloned()
            .ok_or_else(|| HealthError::Validation(format!("No slot number {}", index + 1)))?;
        self.select_slot(&slot)
    }

    /// Installs a finished fetch. Returns false when the ticket is stale (the
    /// user changed an upstream selector meanwhile) and the result was dropped.
    pub fn apply(&mut self, ticket: &FetchTicket, outcome: FetchOutcome) -> bool {
        let level = ticket.key.level();
        if outcome.level() != level || !self.generations.is_current(ticket) {
            debug!(
                "Discarding stale {:?} result (generation {}, current {})",
                level,
                ticket.generation,
                self.generations.current(level)
            );
            return false;
        }

        let failure = match outcome {
            FetchOutcome::Departments(Ok(list)) => {
                self.departments = list;
                None
            }
            FetchOutcome::Doctors(Ok(list)) => {
                self.doctors = list;
                None
            }
            FetchOutcome::Slots(Ok(list)) => {
                self.slots = list;
                None
            }
            FetchOutcome::Departments(Err(e))
            | FetchOutcome::Doctors(Err(e))
            | FetchOutcome::Slots(Err(e)) => Some(e),
        };

        if let Some(e) = failure {
            warn!("{:?} fetch failed: {}", level, e);
            self.error = Some(e.user_message(level.failure_message(), level.error_context()));
        }
        true
    }

    pub async fn choose_hospital(&mut self, hospital_id: &str) {
        if let Some(ticket) = self.select_hospital(hospital_id) {
            self.run(ticket).await;
        }
    }

    pub async fn choose_department(&mut self, department_id: &str) -> HealthResult<()> {
        if let Some(ticket) = self.select_department(department_id)? {
            self.run(ticket).await;
        }
        Ok(())
    }

    pub async fn choose_doctor(&mut self, doctor_id: &str) -> HealthResult<()> {
        self.select_doctor(doctor_id)
    }

    pub async fn choose_date(&mut self, date: Option<NaiveDate>) -> HealthResult<()> {
        if let Some(ticket) = self.select_date(date)? {
            self.run(ticket).await;
        }
        Ok(())
    }

    async fn run(&mut self, ticket: FetchTicket) {
        let outcome = self.fetcher().fetch(&ticket).await;
        self.apply(&ticket, outcome);
    }

    /// Sends the booking.
    ///
    /// On success the message is set and the form is reset, including the slot
    /// list. On failure the error is set and the selection is kept so the user
    /// can correct it and resubmit. The returned error mirrors the error string.
    pub async fn submit(&mut self) -> HealthResult<()> {
        self.message = None;
        self.error = None;

        match self.send().await {
            Ok(()) => {
                self.message = Some(BOOKED_MESSAGE.to_string());
                self.reset();
                Ok(())
            }
            Err(e) => {
                warn!("Booking failed: {}", e);
                self.error =
                    Some(e.user_message("Failed to book appointment", "Error booking appointment"));
                Err(e)
            }
        }
    }

    async fn send(&self) -> HealthResult<()> {
        let draft = self
            .state
            .draft()
            .ok_or_else(|| HealthError::Validation(NO_SLOT_MESSAGE.to_string()))?;
        let session = self
            .session
            .current()
            .await
            .ok_or_else(|| HealthError::Authentication(LOGIN_REQUIRED_MESSAGE.to_string()))?;

        let request = draft.to_request(&session.user.id);
        let idempotency_key = Uuid::new_v4();
        info!(
            "Booking {} {}-{} with doctor {} (key {})",
            request.appointment_date,
            request.start_time,
            request.end_time,
            request.doctor_id,
            idempotency_key
        );

        let response = self
            .reservations
            .book(&session.token, &request, idempotency_key)
            .await?;
        debug!("Reservation service replied {:?}", response.message);
        Ok(())
    }

    /// Clears the selection and every dependent list. Hospitals are kept.
    pub fn reset(&mut self) {
        self.state = BookingState::Empty;
        self.invalidate_from(Level::Departments);
    }

    /// Forgets everything tied to the previous session: the selection, every
    /// list including hospitals, and the message and error strings. Call it
    /// whenever the user logs in or out.
    pub fn start_over(&mut self) {
        self.reset();
        self.hospitals.clear();
        self.message = None;
        self.error = None;
    }

    fn invalidate_from(&mut self, level: Level) {
        self.generations.invalidate_from(level);
        for l in Level::ALL.into_iter().filter(|l| *l >= level) {
            match l {
                Level::Departments => self.departments.clear(),
                Level::Doctors => self.doctors.clear(),
                Level::Slots => self.slots.clear(),
            }
        }
    }
}
