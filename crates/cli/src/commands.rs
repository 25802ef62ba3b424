use chrono::NaiveDate;
use healthsync_core::{
    errors::{HealthError, HealthResult},
    models::appointment::AppointmentWindow,
};

/// Every shell command with its usage line, in the order `help` lists them.
pub const COMMANDS: &[(&str, &str)] = &[
    ("help", "Show this list"),
    ("login <username> <password>", "Log in"),
    ("signup <username> <email> <password>", "Create an account and log in"),
    ("logout", "Forget the current session"),
    ("whoami", "Show the logged-in user"),
    ("hospitals", "Reload and list hospitals"),
    ("hospital <id|->", "Choose a hospital (- clears it)"),
    ("department <id|->", "Choose a department"),
    ("doctor <id|->", "Choose a doctor"),
    ("date <YYYY-MM-DD|->", "Choose the appointment date"),
    ("slot <number>", "Choose a time slot from the list"),
    ("form", "Show the booking form"),
    ("book", "Book the selected slot"),
    ("emergency <lat> <lng>", "List hospitals near a position"),
    ("ask <question>", "Ask the HealthSync assistant"),
    ("history [patient_id]", "Your medical history; doctors name a patient"),
    ("schedule [today|week]", "Your appointments (doctors only)"),
    ("quit", "Leave the shell"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Login { username: String, password: String },
    Signup { username: String, email: String, password: String },
    Logout,
    WhoAmI,
    Hospitals,
    Hospital(String),
    Department(String),
    Doctor(String),
    Date(Option<NaiveDate>),
    /// Zero-based index into the slot list.
    Slot(usize),
    Form,
    Book,
    Emergency { lat: f64, lng: f64 },
    Ask(String),
    /// A patient's own history, or the named patient's for a doctor.
    History(Option<String>),
    Schedule(AppointmentWindow),
    Quit,
}

fn usage(command: &str) -> HealthError {
    let line = COMMANDS
        .iter()
        .find(|(usage, _)| usage.split_whitespace().next() == Some(command))
        .map(|(usage, _)| *usage)
        .unwrap_or(command);
    HealthError::Validation(format!("Usage: {}", line))
}

fn is_known(command: &str) -> bool {
    COMMANDS
        .iter()
        .any(|(usage, _)| usage.split_whitespace().next() == Some(command))
}

/// `-` stands for "no selection".
fn selector(value: &str) -> String {
    if value == "-" { String::new() } else { value.to_string() }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> HealthResult<Option<Command>> {
    let line = line.trim();
    let Some((name, rest)) = line
        .split_once(char::is_whitespace)
        .map(|(n, r)| (n, r.trim()))
        .or_else(|| (!line.is_empty()).then_some((line, "")))
    else {
        return Ok(None);
    };
    let args: Vec<&str> = rest.split_whitespace().collect();
    let name = name.to_ascii_lowercase();

    let command = match (name.as_str(), args.as_slice()) {
        ("help" | "?", []) => Command::Help,
        ("login", [username, password]) => Command::Login {
            username: username.to_string(),
            password: password.to_string(),
        },
        ("signup", [username, email, password]) => Command::Signup {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        },
        ("logout", []) => Command::Logout,
        ("whoami", []) => Command::WhoAmI,
        ("hospitals", []) => Command::Hospitals,
        ("hospital", [id]) => Command::Hospital(selector(id)),
        ("department", [id]) => Command::Department(selector(id)),
        ("doctor", [id]) => Command::Doctor(selector(id)),
        ("date", ["-"]) => Command::Date(None),
        ("date", [value]) => {
            let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                HealthError::Validation(format!("Invalid date {:?}, expected YYYY-MM-DD", value))
            })?;
            Command::Date(Some(date))
        }
        ("slot", [number]) => match number.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Slot(n - 1),
            _ => {
                let message = format!("Invalid slot number {:?}", number);
                return Err(HealthError::Validation(message));
            }
        },
        ("form", []) => Command::Form,
        ("book", []) => Command::Book,
        ("emergency", [lat, lng]) => {
            let parse_coord = |value: &str| {
                value.parse::<f64>().map_err(|_| {
                    HealthError::Validation(format!("Invalid coordinate {:?}", value))
                })
            };
            Command::Emergency {
                lat: parse_coord(*lat)?,
                lng: parse_coord(*lng)?,
            }
        }
        ("ask", _) if !rest.is_empty() => Command::Ask(rest.to_string()),
        ("history", []) => Command::History(None),
        ("history", [patient_id]) => Command::History(Some(patient_id.to_string())),
        ("schedule", [] | ["today"]) => Command::Schedule(AppointmentWindow::Today),
        ("schedule", ["week"]) => Command::Schedule(AppointmentWindow::Week),
        ("quit" | "exit", []) => Command::Quit,
        _ if is_known(&name) => return Err(usage(&name)),
        _ => {
            return Err(HealthError::Validation(format!(
                "Unknown command {:?}; type help for a list",
                name
            )));
        }
    };

    Ok(Some(command))
}
