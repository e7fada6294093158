//! Error types for scrawl-net

use thiserror::Error;

/// Errors that can occur during network construction and inference
#[derive(Debug, Error)]
pub enum NetError {
    /// Rasterization error
    #[error("raster error: {0}")]
    Raster(#[from] scrawl_raster::RasterError),

    /// I/O error while reading a weight stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input vector does not match the first layer width
    #[error("input length mismatch: expected {expected}, got {actual}")]
    InputLength { expected: usize, actual: usize },

    /// Weight stream declared a nonsensical layer count
    #[error("invalid layer count in weight stream: {0}")]
    BadLayerCount(i32),

    /// Weight stream declared a nonsensical layer size
    #[error("invalid layer size in weight stream: {0}")]
    BadLayerSize(i32),

    /// Parameter vector does not match the declared layer sizes
    #[error("parameter count mismatch: expected {expected}, got {actual}")]
    ParameterCount { expected: usize, actual: usize },

    /// The input layer is not a square raster
    #[error("input layer size {0} is not a perfect square")]
    NonSquareInput(usize),

    /// A network produced no outputs
    #[error("network produced no outputs")]
    EmptyOutput,

    /// The cascade selected a bucket with no network
    #[error("bucket {bucket} out of range: {count} bucket networks")]
    BucketOutOfRange { bucket: usize, count: usize },

    /// The label table has no entry for a classification result
    #[error("no label for bucket {bucket}, index {index}")]
    LabelTable { bucket: usize, index: usize },
}

/// Result type for network operations
pub type NetResult<T> = Result<T, NetError>;
