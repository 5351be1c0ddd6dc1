use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid cache entry: {0}")]
    InvalidCacheEntry(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Classified failure of a single fetch against an external source.
///
/// Provider adapters and the image origin surface these; the aggregator and
/// the image service downgrade them to "this tier failed" and never re-raise.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream rejected request (HTTP {status}): {message}")]
    UpstreamRejected { status: u16, message: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("All tiers exhausted")]
    Exhausted,
}

impl FetchError {
    /// Everything except `MalformedInput` may succeed on another attempt or tier.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::MalformedInput(_))
    }

    /// Short label used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout => "timeout",
            FetchError::Transport(_) => "transport",
            FetchError::UpstreamRejected { .. } => "upstream_rejected",
            FetchError::MalformedInput(_) => "malformed_input",
            FetchError::Exhausted => "exhausted",
        }
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        FetchError::UpstreamRejected {
            status,
            message: message.into(),
        }
    }
}
