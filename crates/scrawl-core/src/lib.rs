//! Scrawl Core - Basic data structures for handwriting recognition
//!
//! This crate provides the fundamental data structures used throughout
//! the scrawl handwritten-equation recognition library:
//!
//! - [`Point`] - A two-dimensional point
//! - [`Trace`] - One continuous pen-down stroke as an ordered point sequence
//! - [`TraceGroup`] - A collection of traces treated as one geometric unit
//! - [`BoundingBox`] - Axis-aligned extent of a trace or group
//! - [`MinimumSpanningTree`] - Kruskal-built stroke connectivity with path
//!   and context queries
//!
//! All coordinates are real-valued with the ink convention of y growing
//! upward; rasterization (in `scrawl-raster`) flips to image coordinates.

pub mod error;
pub mod mst;
pub mod point;
pub mod trace;

pub use error::{Error, Result};
pub use mst::MinimumSpanningTree;
pub use point::Point;
pub use trace::{BoundingBox, Trace, TraceGroup};
