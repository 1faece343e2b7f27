//! Error types for the daily verse service.

/// Top-level error type for the daily refresh cycle.
#[derive(Debug, thiserror::Error)]
pub enum VerseError {
    /// Persisted key-value store read or write failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Notification facility failure (cancel, schedule).
    #[error("notification error: {0}")]
    Notification(String),

    /// Content collection is empty or malformed.
    #[error("collection error: {0}")]
    Collection(String),

    /// Phone number that cannot be brought into E.164 form.
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, VerseError>;
