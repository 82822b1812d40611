use thiserror::Error;

pub const LOAD_ENTRIES_FAILED: &str = "Could not load entries";

/// Failures surfaced by the journal client. `Display` output is short enough
/// to show verbatim in the status line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JournalError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {message}")]
    Server { status: Option<u16>, message: String },

    #[error("Not signed in (session missing or expired)")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    State(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateKey(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl JournalError {
    pub fn server(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn empty_content() -> Self {
        Self::Validation("Please write something before saving".to_string())
    }
}
