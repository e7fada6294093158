//! Error types for scrawl-engine

use thiserror::Error;

/// Errors that can occur during segmentation and parsing
#[derive(Debug, Error)]
pub enum EngineError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] scrawl_core::Error),

    /// Rasterization error
    #[error("raster error: {0}")]
    Raster(#[from] scrawl_raster::RasterError),

    /// Neural network error
    #[error("network error: {0}")]
    Net(#[from] scrawl_net::NetError),

    /// A symbol was built from ink without any points
    #[error("empty ink for symbol")]
    EmptyInk,
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
