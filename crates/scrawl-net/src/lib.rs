//! scrawl-net - Neural network inference for symbol classification
//!
//! Forward-only feed-forward networks and the two-stage cascade that
//! maps an ink cluster to a symbol label:
//!
//! - [`Network`] - dense layers with a configurable nonlinearity,
//!   loaded once from a binary weight stream
//! - [`TraceNetwork`] - rasterizes a trace group and evaluates it,
//!   optionally averaging over randomized distortions
//! - [`CascadeClassifier`] - coarse bucket network followed by a
//!   bucket-specific network and a label table
//!
//! Training is out of scope; weights are opaque learned parameters.

pub mod cascade;
mod error;
pub mod network;

pub use cascade::{
    BUCKET_WEIGHT, CASCADE_WEIGHT, CascadeClassifier, CascadeOutcome, NORMALIZED_TOTAL,
    TraceNetwork, index_of_max, normalize,
};
pub use error::{NetError, NetResult};
pub use network::{Activation, Network};
