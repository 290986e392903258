//! Error types for canvas I/O and settings validation

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the canvas file operations
///
/// A failed operation leaves the canvas exactly as it was.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("cannot read image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("cannot write image {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("nothing to save, the canvas has no visible area")]
    EmptyCanvas,
}

/// Settings rejected by [`crate::Settings::validate`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("pen width {width} is outside {min}..={max}")]
    PenWidth { width: u32, min: u32, max: u32 },
    #[error("window size must be non-zero")]
    WindowSize,
    #[error("print page size must be non-zero")]
    PrintPage,
    #[error("unknown default save format {0:?}")]
    DefaultFormat(String),
}
