//! Error types for the layout generator.

use thiserror::Error;

/// Result type alias using LayoutError.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Main error type for layout generation operations.
///
/// Missing sprites are deliberately not represented here: a missing texture
/// is an expected condition, recovered locally and surfaced through the
/// run's missing-asset report instead of interrupting processing.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// Failed to read or parse a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structure input failed validation.
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    /// Structure has a zero-length axis and cannot be sliced into layers.
    #[error("Degenerate structure size: {0}")]
    DegenerateSize(String),

    /// Invalid asset pack layout.
    #[error("Invalid asset pack: {0}")]
    InvalidAssetPack(String),

    /// Rendering configuration out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
