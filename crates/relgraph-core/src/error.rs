//! Validation error types.

use thiserror::Error;

/// Rejections raised before any store interaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} required")]
    Missing(&'static str),

    #[error("invalid {what}: {value} (must be A-Z, 0-9, _, -)")]
    InvalidToken { what: &'static str, value: String },

    #[error("unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("unsupported event type: {0}")]
    UnsupportedEventType(String),

    #[error("invalid event_timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("{0}")]
    Invalid(String),
}

/// Result type for validation steps.
pub type ValidationResult<T> = Result<T, ValidationError>;

impl ValidationError {
    /// Create a free-form validation error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
