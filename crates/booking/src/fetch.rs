//! Dependent list fetches and their request generations.
//!
//! Every selector change bumps the generation of each level below it. A fetch
//! result is applied only if its ticket still carries the current generation
//! for its level, so a slow response for a previous hospital can never fill
//! the department list of the hospital chosen after it.

use std::sync::Arc;

use chrono::NaiveDate;
use healthsync_client::services::DirectoryService;
use healthsync_core::{
    errors::{HealthError, HealthResult},
    models::directory::{Department, Doctor, TimeSlot},
};
use healthsync_session::SessionHandle;
use tracing::debug;

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to book an appointment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Departments,
    Doctors,
    Slots,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Departments, Level::Doctors, Level::Slots];

    /// Fallback shown when the server rejects the fetch without a detail.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Level::Departments => "Failed to fetch departments",
            Level::Doctors => "Failed to fetch doctors",
            Level::Slots => "Failed to fetch time slots",
        }
    }

    /// Prefix for transport failures.
    pub fn error_context(&self) -> &'static str {
        match self {
            Level::Departments => "Error fetching departments",
            Level::Doctors => "Error fetching doctors",
            Level::Slots => "Error fetching time slots",
        }
    }
}

/// The upstream identifiers a fetch is filtered by. Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKey {
    Departments { hospital_id: String },
    Doctors { department_id: String },
    Slots { doctor_id: String, date: NaiveDate },
}

impl FetchKey {
    pub fn level(&self) -> Level {
        match self {
            FetchKey::Departments { .. } => Level::Departments,
            FetchKey::Doctors { .. } => Level::Doctors,
            FetchKey::Slots { .. } => Level::Slots,
        }
    }
}

/// Issued when a fetch starts; presented again when its result is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: FetchKey,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Generations {
    departments: u64,
    doctors: u64,
    slots: u64,
}

impl Generations {
    pub fn current(&self, level: Level) -> u64 {
        match level {
            Level::Departments => self.departments,
            Level::Doctors => self.doctors,
            Level::Slots => self.slots,
        }
    }

    /// Invalidates `level` and every level below it.
    pub fn invalidate_from(&mut self, level: Level) {
        for l in Level::ALL.into_iter().filter(|l| *l >= level) {
            let counter = match l {
                Level::Departments => &mut self.departments,
                Level::Doctors => &mut self.doctors,
                Level::Slots => &mut self.slots,
            };
            *counter += 1;
        }
    }

    pub fn ticket(&self, key: FetchKey) -> FetchTicket {
        let generation = self.current(key.level());
        FetchTicket { key, generation }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.current(ticket.key.level()) == ticket.generation
    }
}

/// A completed fetch, not yet applied.
#[derive(Debug)]
pub enum FetchOutcome {
    Departments(HealthResult<Vec<Department>>),
    Doctors(HealthResult<Vec<Doctor>>),
    Slots(HealthResult<Vec<TimeSlot>>),
}

impl FetchOutcome {
    pub fn level(&self) -> Level {
        match self {
            FetchOutcome::Departments(_) => Level::Departments,
            FetchOutcome::Doctors(_) => Level::Doctors,
            FetchOutcome::Slots(_) => Level::Slots,
        }
    }

    fn failed(level: Level, err: HealthError) -> Self {
        match level {
            Level::Departments => FetchOutcome::Departments(Err(err)),
            Level::Doctors => FetchOutcome::Doctors(Err(err)),
            Level::Slots => FetchOutcome::Slots(Err(err)),
        }
    }
}

/// Runs fetches independently of the controller, so a host may have several
/// in flight while the user keeps changing selectors.
#[derive(Clone)]
pub struct Fetcher {
    directory: Arc<dyn DirectoryService>,
    session: SessionHandle,
}

impl Fetcher {
    pub fn new(directory: Arc<dyn DirectoryService>, session: SessionHandle) -> Self {
        Self { directory, session }
    }

    pub async fn fetch(&self, ticket: &FetchTicket) -> FetchOutcome {
        let Some(token) = self.session.token().await else {
            return FetchOutcome::failed(
                ticket.key.level(),
                HealthError::Authentication(LOGIN_REQUIRED_MESSAGE.to_string()),
            );
        };

        debug!("Fetching {:?} (generation {})", ticket.key, ticket.generation);
        match &ticket.key {
            FetchKey::Departments { hospital_id } => {
                FetchOutcome::Departments(self.directory.departments(&token, hospital_id).await)
            }
            FetchKey::Doctors { department_id } => {
                FetchOutcome::Doctors(self.directory.doctors(&token, department_id).await)
            }
            FetchKey::Slots { doctor_id, date } => {
                FetchOutcome::Slots(self.directory.slots(&token, doctor_id, *date).await)
            }
        }
    }
}
