//! Error types used throughout the rendering pipeline.

use thiserror::Error;

/// Main error type for qiraster operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The QR encoder rejected the payload (usually too long for version 40).
    #[error("QR encoding failed: {0}")]
    Encode(String),

    /// A render option is outside its documented range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// The logo could not be loaded. The pipeline recovers from this one.
    #[error("Logo error: {0}")]
    Logo(String),

    /// Low-level PNG writer failure
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    /// High-level codec failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The caller-supplied buffer cannot hold the encoded image.
    #[error("Output buffer too small: need {needed} bytes, have {capacity}")]
    Capacity { needed: usize, capacity: usize },

    /// Some items of a batch could not be rendered.
    #[error("{failed} of {total} batch items failed (lines {lines:?})")]
    Batch {
        failed: usize,
        total: usize,
        /// One-based positions of the failed items.
        lines: Vec<usize>,
    },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
