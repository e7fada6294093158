//! Scrawl - Handwritten equation recognition for Rust
//!
//! Scrawl converts hand-drawn ink strokes into a typeset (TeX)
//! representation of a mathematical expression:
//!
//! 1. **Segmentation** - a minimum spanning tree over inter-stroke
//!    distances proposes symbol-sized stroke clusters, and an exact
//!    cover search picks the best segmentation
//! 2. **Classification** - a cascade of feed-forward networks maps each
//!    rasterized cluster to a symbol label with a confidence
//! 3. **Structural parsing** - a geometrical grammar resolves baseline
//!    order, exponents, indices, roots and fractions from the symbols'
//!    relative positions and serializes the tree to TeX
//!
//! # Example
//!
//! ```
//! use scrawl::{Classification, Engine, EngineResult, Label, Point, Trace, TraceGroup};
//!
//! // Recognition with a stub classifier; production code loads a
//! // NetClassifier from trained weight streams.
//! let classifier = |cluster: &TraceGroup, _ctx: Option<&TraceGroup>| -> EngineResult<Classification> {
//!     let bounds = cluster.bounding_box().unwrap();
//!     Ok(Classification {
//!         label: if bounds.min_x < 5.0 { Label::Two } else { Label::Three },
//!         confidence: if cluster.len() == 1 { 0.9 } else { 0.2 },
//!     })
//! };
//!
//! let mut engine = Engine::new(classifier);
//! let ink = TraceGroup::from_traces(vec![
//!     [Point::new(0.0, 0.0), Point::new(2.0, 8.0)].into_iter().collect::<Trace>(),
//!     [Point::new(20.0, 0.0), Point::new(22.0, 8.0)].into_iter().collect::<Trace>(),
//! ]);
//! assert_eq!(engine.recognize(&ink).unwrap(), "23");
//! ```

// Re-export core types (primary data structures used everywhere)
pub use scrawl_core::*;

// Re-export the engine surface at the crate root
pub use scrawl_engine::{
    Classification, Classifier, Diagnostics, Engine, EngineError, EngineResult, GrammarParser,
    Label, MstPartitioner, NetClassifier, NullDiagnostics, PartitionerOptions, Symbol,
    SymbolArena, SymbolClass, SymbolId,
};

// Re-export domain crates as modules to avoid name conflicts
pub use scrawl_engine as engine;
pub use scrawl_net as net;
pub use scrawl_raster as raster;
