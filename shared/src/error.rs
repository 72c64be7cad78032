use std::time::Duration;

use crate::mode::{InputMode, MediaKind};
use crate::notify::Severity;

/// Everything that can go wrong between picking media and rendering a result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    UserInput(#[from] UserInputError),
}

/// The API answered, but not with something we can render.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Response has no `data` field")]
    MissingData,
    #[error("{0}")]
    Rejected(String),
    #[error("{kind} result has {found} elements, expected at least {expected}")]
    TooFewElements {
        kind: MediaKind,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UserInputError {
    #[error("Please select a file first")]
    NoFileSelected,
    #[error("The selected file is still loading, please wait")]
    StillReading,
    #[error("Please start the camera first")]
    CameraNotStarted,
    #[error("The camera has not produced a frame yet")]
    NoFrame,
    #[error("Please select a {} file (got {mime})", .mode.media_kind().field_name())]
    WrongFileType { mode: InputMode, mime: String },
    #[error("Files cannot be selected in {0} mode")]
    FileNotAllowed(InputMode),
    #[error("A detection is already running, please wait")]
    Busy,
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ClientError {
    pub fn severity(&self) -> Severity {
        match self {
            ClientError::UserInput(UserInputError::Busy | UserInputError::StillReading) => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    /// Text shown in the notification banner for an interactive failure.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Timeout(_) => {
                "Detection timed out, try a smaller video or adjust the parameters".to_string()
            }
            ClientError::UserInput(err) => err.to_string(),
            ClientError::Validation(ValidationError::Rejected(msg)) => {
                format!("Detection failed: {}", msg)
            }
            ClientError::Validation(err) => format!("Invalid response from the API: {}", err),
            ClientError::Network(_) | ClientError::Http { .. } => {
                format!("Detection failed: {}", self)
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }
}
