//! Error types for stroke operations.

use thiserror::Error;

/// Result type for stroke operations.
pub type StrokeResult<T> = Result<T, StrokeError>;

/// Errors that can occur while configuring or feeding a stroke.
#[derive(Debug, Error)]
pub enum StrokeError {
    /// A brush setting is outside its allowed range.
    #[error("Invalid brush setting {field}: {value}")]
    InvalidSetting {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A colour string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A pointer sample carried non-finite or out-of-range coordinates.
    #[error("Invalid pointer sample: {0}")]
    InvalidSample(String),

    /// Settings or event serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
