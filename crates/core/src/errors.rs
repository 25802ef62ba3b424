use thiserror::Error;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HealthError {
    /// Converts the error into the single inline string shown next to a form.
    ///
    /// Server-supplied details are shown verbatim. An API failure without a
    /// detail falls back to `fallback`; transport and internal failures are
    /// prefixed with `context` (e.g. "Error fetching departments").
    pub fn user_message(&self, fallback: &str, context: &str) -> String {
        match self {
            HealthError::Api { detail: Some(detail), .. } => detail.clone(),
            HealthError::Api { detail: None, .. } => fallback.to_string(),
            HealthError::Validation(msg) | HealthError::Authentication(msg) => msg.clone(),
            HealthError::Transport(msg) => format!("{}: {}", context, msg),
            HealthError::Storage(err) => format!("{}: {}", context, err),
            HealthError::Internal(err) => format!("{}: {}", context, err),
        }
    }

    /// True when the server rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, HealthError::Api { status: 401, .. })
    }
}

pub type HealthResult<T> = Result<T, HealthError>;
