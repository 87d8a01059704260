use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn missing_prompt() -> Self {
        Self::new(
            NotificationKind::Warning,
            "Error",
            "Please enter a prompt to generate an image.",
        )
    }

    pub fn generated() -> Self {
        Self::new(
            NotificationKind::Success,
            "Success!",
            "Your image has been generated successfully.",
        )
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, "Generation Failed", message)
    }
}
