//! Error types for scrawl-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// Scrawl core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Vertex reference outside the graph
    #[error("vertex out of bounds: {vertex} >= {count}")]
    VertexOutOfBounds { vertex: usize, count: usize },

    /// Edge weight vector does not match the vertex count
    #[error("edge weight count mismatch: expected {expected} for {vertices} vertices, got {actual}")]
    EdgeWeightCount {
        vertices: usize,
        expected: usize,
        actual: usize,
    },

    /// A trace with no points was used where geometry is required
    #[error("empty trace")]
    EmptyTrace,

    /// A trace group with no traces was used where geometry is required
    #[error("empty trace group")]
    EmptyTraceGroup,
}

/// Result type alias for scrawl-core operations
pub type Result<T> = std::result::Result<T, Error>;
