use thiserror::Error;

/// Cloneable so one outcome can be handed to every deduplicated caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("Request cancelled")]
    Cancelled,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server answered {0}")]
    Status(u16),

    #[error("Undecodable response: {0}")]
    Decode(String),

    #[error("Request task aborted: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for CoordinatorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(e.to_string())
        }
    }
}
