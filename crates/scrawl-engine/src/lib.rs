//! scrawl-engine - Segmentation and structural parsing
//!
//! The recognition pipeline of the scrawl library:
//!
//! - [`MstPartitioner`] segments an expression's strokes into
//!   symbol-sized clusters over a minimum spanning tree and scores the
//!   candidate clusters through a [`Classifier`]
//! - The symbol model ([`Symbol`], [`SymbolArena`], templates) holds
//!   classified clusters and their structural links by id
//! - [`GrammarParser`] resolves baseline order, exponents, indices,
//!   roots and fractions from the symbols' relative geometry, and
//!   serializes the result to TeX
//! - [`Engine`] ties the pieces together and adds the incremental
//!   append / remove / reset surface
//!
//! # Quick Start
//!
//! ```
//! use scrawl_core::{Point, Trace, TraceGroup};
//! use scrawl_engine::{Classification, Engine, EngineResult, Label};
//!
//! // A stub classifier; production code uses NetClassifier.
//! let classifier = |cluster: &TraceGroup, _ctx: Option<&TraceGroup>| -> EngineResult<Classification> {
//!     let bounds = cluster.bounding_box().unwrap();
//!     Ok(Classification {
//!         label: if bounds.min_x < 5.0 { Label::Two } else { Label::Three },
//!         confidence: if cluster.len() == 1 { 0.9 } else { 0.2 },
//!     })
//! };
//!
//! let mut engine = Engine::new(classifier);
//! let expression = TraceGroup::from_traces(vec![
//!     [Point::new(0.0, 0.0), Point::new(2.0, 8.0)].into_iter().collect::<Trace>(),
//!     [Point::new(20.0, 0.0), Point::new(22.0, 8.0)].into_iter().collect::<Trace>(),
//! ]);
//! assert_eq!(engine.recognize(&expression).unwrap(), "23");
//! ```

pub mod classifier;
pub mod diagnostics;
pub mod engine;
mod error;
pub mod parser;
pub mod partitioner;
pub mod symbols;

pub use classifier::{Classification, Classifier, NetClassifier};
pub use diagnostics::{CollectingDiagnostics, Diagnostics, NullDiagnostics};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use parser::{GrammarParser, serialize};
pub use partitioner::{
    DOT_CONFIDENCE, GARBAGE_THRESHOLD, MAX_TRACES_PER_SYMBOL, MstPartitioner, PartitionerOptions,
};
pub use symbols::{
    AcceptanceRule, ArgumentPosition, Label, Relation, RenderShape, SlotSpec, Symbol, SymbolArena,
    SymbolClass, SymbolId, SymbolTemplate,
};

// Re-export the sibling crates for convenience
pub use scrawl_core;
pub use scrawl_net;
pub use scrawl_raster;
