use thiserror::Error;

/// Message shown when a failure carries no text of its own.
pub const GENERIC_FAILURE: &str = "Failed to generate image";

#[derive(Debug, Error)]
pub enum PollinationsError {
    #[error("Please enter a prompt to generate an image.")]
    ValidationError,
    #[error("API request failed: {}", status_line(.status, .status_text))]
    RequestError { status: u16, status_text: String },
    #[error("{0}")]
    TransportError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Logger error: {0}")]
    LoggerError(String),
}

impl PollinationsError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PollinationsError::ValidationError)
    }

    /// Text surfaced to the user for a failed generation.
    pub fn user_message(&self) -> String {
        let text = self.to_string();
        if text.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            text
        }
    }
}

fn status_line(status: &u16, status_text: &str) -> String {
    let reason = status_text.trim();
    if reason.is_empty() {
        status.to_string()
    } else {
        format!("{} {}", status, reason)
    }
}

// reqwest embeds the request URL, and with it the API key, in its message.
impl From<reqwest::Error> for PollinationsError {
    fn from(err: reqwest::Error) -> Self {
        PollinationsError::TransportError(err.without_url().to_string())
    }
}

pub type Result<T> = std::result::Result<T, PollinationsError>;
