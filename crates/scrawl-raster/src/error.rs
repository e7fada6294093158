//! Error types for scrawl-raster

use thiserror::Error;

/// Errors that can occur during rasterization
#[derive(Debug, Error)]
pub enum RasterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] scrawl_core::Error),

    /// Invalid canvas dimensions
    #[error("invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Vector length does not match the canvas size
    #[error("vector length mismatch: expected {expected}, got {actual}")]
    VectorLength { expected: usize, actual: usize },

    /// Rendering was asked for ink with no points
    #[error("empty ink")]
    EmptyInk,

    /// An affine transform could not be inverted
    #[error("singular affine transform")]
    SingularTransform,
}

/// Result type for rasterization operations
pub type RasterResult<T> = Result<T, RasterError>;
