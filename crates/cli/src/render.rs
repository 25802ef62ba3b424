//! Plain-text views of the booking form and the lists the shell prints.

use std::fmt::Write;

use healthsync_booking::{BookingFlow, slots::SlotPanel};
use healthsync_core::models::{
    appointment::{Appointment, AppointmentWindow},
    auth::User,
    directory::Hospital,
    emergency::NearbyHospital,
    history::MedicalRecord,
};

use crate::commands::COMMANDS;

const NONE: &str = "(none)";
const DISABLED: &str = "(disabled)";

pub fn help() -> String {
    let width = COMMANDS.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
    COMMANDS
        .iter()
        .map(|(usage, description)| format!("  {:width$}  {}", usage, description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn user(user: Option<&User>) -> String {
    match user {
        Some(user) => match &user.email {
            Some(email) => format!("Logged in as {} <{}>", user.username, email),
            None => format!("Logged in as {}", user.username),
        },
        None => "Not logged in".to_string(),
    }
}

pub fn hospitals(hospitals: &[Hospital]) -> String {
    if hospitals.is_empty() {
        return "No hospitals loaded".to_string();
    }
    hospitals
        .iter()
        .map(|h| format!("  {}  {} ({})", h.id, h.name, h.address))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Nearest-first list with the distance from the caller in kilometres.
pub fn nearby(hospitals: &[(NearbyHospital, f64)]) -> String {
    if hospitals.is_empty() {
        return "No hospitals found nearby".to_string();
    }
    hospitals
        .iter()
        .enumerate()
        .map(|(i, (hospital, km))| {
            let availability = if hospital.doctor_availability {
                "doctors available"
            } else {
                "no doctors available"
            };
            format!(
                "{:>2}. {} ({:.1} km) {}, {}",
                i + 1,
                hospital.name,
                km,
                hospital.address,
                availability
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn history(records: &[MedicalRecord]) -> String {
    if records.is_empty() {
        return "No medical history records found.".to_string();
    }
    records
        .iter()
        .map(|record| {
            let field = |value: &Option<String>| value.as_deref().unwrap_or("None").to_string();
            let updated_at = record.updated_at.as_deref().unwrap_or("N/A");
            let updated_by = record.updated_by.as_deref().unwrap_or("N/A");
            [
                format!("Record {} (updated {} by {})", record.id, updated_at, updated_by),
                format!("  Conditions: {}", field(&record.conditions)),
                format!("  Allergies:  {}", field(&record.allergies)),
                format!("  Notes:      {}", field(&record.notes)),
            ]
            .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A doctor's appointments, one per line, with the patient id to pass to `history`.
pub fn appointments(appointments: &[Appointment], window: AppointmentWindow) -> String {
    if appointments.is_empty() {
        return match window {
            AppointmentWindow::Today => "No appointments today.".to_string(),
            AppointmentWindow::Week => "No appointments this week.".to_string(),
        };
    }
    appointments
        .iter()
        .map(|a| {
            let contact = a.email.as_deref().map(|e| format!(" <{}>", e)).unwrap_or_default();
            format!(
                "  {} {} - {}  {}{} [{}]  {}",
                a.appointment_date,
                a.start_time,
                a.end_time,
                a.username,
                contact,
                a.user_id,
                a.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The whole form: selectors with their options, the slot picker, the
/// submit control and the message/error lines.
pub fn form(flow: &BookingFlow) -> String {
    let state = flow.state();
    let controls = flow.controls();
    let mut out = String::new();

    let hospital = state.hospital_id().map(|id| {
        let name = flow.hospitals().iter().find(|h| h.id == id).map(|h| h.name.as_str());
        labelled(id, name)
    });
    let _ = writeln!(out, "Hospital:   {}", hospital.as_deref().unwrap_or(NONE));
    if state.hospital_id().is_none() {
        let options = flow.hospitals().iter().map(|h| (h.id.as_str(), h.name.clone()));
        list_options(&mut out, options);
    }

    let department = state.department_id().map(|id| {
        let name = flow.departments().iter().find(|d| d.id == id).map(|d| d.name.as_str());
        labelled(id, name)
    });
    let department = selector(controls.department, department.as_deref());
    let _ = writeln!(out, "Department: {}", department);
    if controls.department && state.department_id().is_none() {
        let options = flow.departments().iter().map(|d| (d.id.as_str(), d.name.clone()));
        list_options(&mut out, options);
    }

    let doctor = state.doctor_id().map(|id| {
        let name = flow.doctors().iter().find(|d| d.user_id == id).map(|d| d.display_name());
        labelled(id, name.as_deref())
    });
    let _ = writeln!(out, "Doctor:     {}", selector(controls.doctor, doctor.as_deref()));
    if controls.doctor && state.doctor_id().is_none() {
        let options = flow.doctors().iter().map(|d| (d.user_id.as_str(), d.display_name()));
        list_options(&mut out, options);
    }

    let date = state.date().map(|d| d.format("%Y-%m-%d").to_string());
    let _ = write!(out, "Date:       {}", selector(controls.date, date.as_deref()));
    if controls.date {
        let _ = write!(out, " (from {})", flow.min_date().format("%Y-%m-%d"));
    }
    out.push('\n');

    out.push_str("Slots:\n");
    let panel = flow.slot_panel();
    match &panel {
        SlotPanel::Slots(buttons) => {
            for button in buttons {
                let marker = if button.active { "*" } else { " " };
                let booked = if button.disabled { " (booked)" } else { "" };
                let number = button.index + 1;
                let _ = writeln!(out, "  {} {:>2}) {}{}", marker, number, button.label, booked);
            }
        }
        _ => {
            if let Some(notice) = panel.notice() {
                let _ = writeln!(out, "  {}", notice);
            }
        }
    }

    let submit = if controls.submit { "ready" } else { DISABLED };
    let _ = write!(out, "Book Appointment: {}", submit);

    if let Some(message) = flow.message() {
        let _ = write!(out, "\n{}", message);
    }
    if let Some(error) = flow.error() {
        let _ = write!(out, "\nError: {}", error);
    }
    out
}

fn labelled(id: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{} ({})", name, id),
        None => id.to_string(),
    }
}

fn selector(enabled: bool, value: Option<&str>) -> String {
    match (enabled, value) {
        (false, _) => DISABLED.to_string(),
        (true, Some(value)) => value.to_string(),
        (true, None) => NONE.to_string(),
    }
}

fn list_options<'a>(out: &mut String, options: impl Iterator<Item = (&'a str, String)>) {
    for (id, label) in options {
        let _ = writeln!(out, "    - {}  {}", id, label);
    }
}
