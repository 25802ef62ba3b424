use chrono::NaiveDate;
use healthsync_core::{
    errors::{HealthError, HealthResult},
    models::{appointment::CreateAppointmentRequest, directory::TimeSlot},
};

/// How far the user has progressed through the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Empty,
    Hospital,
    Department,
    Doctor,
    Date,
    Slot,
}

/// The in-progress selection.
///
/// Each variant carries exactly the fields chosen so far. Choosing a value at
/// one stage always returns a state that drops everything downstream of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BookingState {
    #[default]
    Empty,
    HospitalChosen {
        hospital_id: String,
    },
    DepartmentChosen {
        hospital_id: String,
        department_id: String,
    },
    DoctorChosen {
        hospital_id: String,
        department_id: String,
        doctor_id: String,
    },
    DateChosen {
        hospital_id: String,
        department_id: String,
        doctor_id: String,
        date: NaiveDate,
    },
    SlotChosen {
        hospital_id: String,
        department_id: String,
        doctor_id: String,
        date: NaiveDate,
        slot: TimeSlot,
    },
}

fn chosen(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl BookingState {
    pub fn stage(&self) -> Stage {
        match self {
            BookingState::Empty => Stage::Empty,
            BookingState::HospitalChosen { .. } => Stage::Hospital,
            BookingState::DepartmentChosen { .. } => Stage::Department,
            BookingState::DoctorChosen { .. } => Stage::Doctor,
            BookingState::DateChosen { .. } => Stage::Date,
            BookingState::SlotChosen { .. } => Stage::Slot,
        }
    }

    pub fn hospital_id(&self) -> Option<&str> {
        match self {
            BookingState::Empty => None,
            BookingState::HospitalChosen { hospital_id }
            | BookingState::DepartmentChosen { hospital_id, .. }
            | BookingState::DoctorChosen { hospital_id, .. }
            | BookingState::DateChosen { hospital_id, .. }
            | BookingState::SlotChosen { hospital_id, .. } => Some(hospital_id.as_str()),
        }
    }

    pub fn department_id(&self) -> Option<&str> {
        match self {
            BookingState::DepartmentChosen { department_id, .. }
            | BookingState::DoctorChosen { department_id, .. }
            | BookingState::DateChosen { department_id, .. }
            | BookingState::SlotChosen { department_id, .. } => Some(department_id.as_str()),
            _ => None,
        }
    }

    pub fn doctor_id(&self) -> Option<&str> {
        match self {
            BookingState::DoctorChosen { doctor_id, .. }
            | BookingState::DateChosen { doctor_id, .. }
            | BookingState::SlotChosen { doctor_id, .. } => Some(doctor_id.as_str()),
            _ => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            BookingState::DateChosen { date, .. } | BookingState::SlotChosen { date, .. } => {
                Some(*date)
            }
            _ => None,
        }
    }

    pub fn slot(&self) -> Option<&TimeSlot> {
        match self {
            BookingState::SlotChosen { slot, .. } => Some(slot),
            _ => None,
        }
    }

    /// Chooses a hospital. A blank id goes back to [`BookingState::Empty`].
    pub fn with_hospital(&self, hospital_id: &str) -> BookingState {
        match chosen(hospital_id) {
            Some(hospital_id) => BookingState::HospitalChosen { hospital_id },
            None => BookingState::Empty,
        }
    }

    /// Chooses a department. Rejected until a hospital is chosen.
    pub fn with_department(&self, department_id: &str) -> HealthResult<BookingState> {
        let hospital_id = self
            .hospital_id()
            .ok_or_else(|| HealthError::Validation("Select a hospital first".to_string()))?
            .to_string();

        Ok(match chosen(department_id) {
            Some(department_id) => BookingState::DepartmentChosen {
                hospital_id,
                department_id,
            },
            None => BookingState::HospitalChosen { hospital_id },
        })
    }

    /// Chooses a doctor. Rejected until a department is chosen.
    pub fn with_doctor(&self, doctor_id: &str) -> HealthResult<BookingState> {
        let (hospital_id, department_id) = match (self.hospital_id(), self.department_id()) {
            (Some(h), Some(d)) => (h.to_string(), d.to_string()),
            _ => return Err(HealthError::Validation("Select a department first".to_string())),
        };

        Ok(match chosen(doctor_id) {
            Some(doctor_id) => BookingState::DoctorChosen {
                hospital_id,
                department_id,
                doctor_id,
            },
            None => BookingState::DepartmentChosen {
                hospital_id,
                department_id,
            },
        })
    }

    /// Chooses (or clears, with `None`) the date. Rejected until a doctor is chosen.
    pub fn with_date(&self, date: Option<NaiveDate>) -> HealthResult<BookingState> {
        let (hospital_id, department_id, doctor_id) =
            match (self.hospital_id(), self.department_id(), self.doctor_id()) {
                (Some(h), Some(d), Some(dr)) => (h.to_string(), d.to_string(), dr.to_string()),
                _ => return Err(HealthError::Validation("Select a doctor first".to_string())),
            };

        Ok(match date {
            Some(date) => BookingState::DateChosen {
                hospital_id,
                department_id,
                doctor_id,
                date,
            },
            None => BookingState::DoctorChosen {
                hospital_id,
                department_id,
                doctor_id,
            },
        })
    }

    /// Replaces the chosen slot. Rejected until a date is chosen.
    pub fn with_slot(&self, slot: TimeSlot) -> HealthResult<BookingState> {
        match self {
            BookingState::DateChosen {
                hospital_id,
                department_id,
                doctor_id,
                date,
            }
            | BookingState::SlotChosen {
                hospital_id,
                department_id,
                doctor_id,
                date,
                ..
            } => Ok(BookingState::SlotChosen {
                hospital_id: hospital_id.clone(),
                department_id: department_id.clone(),
                doctor_id: doctor_id.clone(),
                date: *date,
                slot,
            }),
            _ => Err(HealthError::Validation("Select a date first".to_string())),
        }
    }

    /// The complete selection, available only once a slot is chosen.
    pub fn draft(&self) -> Option<BookingDraft> {
        match self {
            BookingState::SlotChosen {
                hospital_id,
                department_id,
                doctor_id,
                date,
                slot,
            } => Some(BookingDraft {
                hospital_id: hospital_id.clone(),
                department_id: department_id.clone(),
                doctor_id: doctor_id.clone(),
                date: *date,
                slot: slot.clone(),
            }),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stage() == Stage::Slot
    }
}

/// A fully specified booking, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub hospital_id: String,
    pub department_id: String,
    pub doctor_id: String,
    pub date: NaiveDate,
    pub slot: TimeSlot,
}

impl BookingDraft {
    pub fn to_request(&self, user_id: &str) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            user_id: user_id.to_string(),
            doctor_id: self.doctor_id.clone(),
            hospital_id: self.hospital_id.clone(),
            department_id: self.department_id.clone(),
            start_time: self.slot.start_time.clone(),
            end_time: self.slot.end_time.clone(),
            appointment_date: self.date.format("%Y-%m-%d").to_string(),
        }
    }
}
