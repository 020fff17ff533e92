//! Renderer error types.

use stroke_core::StrokeError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering, importing or exporting.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An imported payload could not be decoded into an image.
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// The surface could not be encoded.
    #[error("Failed to encode image: {0}")]
    ImageEncode(String),

    /// The operation is not allowed while a stroke is being drawn.
    #[error("Cannot {0} while a stroke is in progress")]
    StrokeInProgress(&'static str),

    /// Surface dimensions must be non-zero.
    #[error("Invalid surface dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Stroke input or settings were rejected.
    #[error(transparent)]
    Stroke(#[from] StrokeError),
}
