//! Recognition engine
//!
//! Binds a partitioner and a grammar parser around one symbol arena.
//! Every operation runs the same pipeline - segment, classify, parse -
//! to completion before returning; callers wanting concurrent
//! recognition serialize requests against one engine instance
//! externally.

use scrawl_core::TraceGroup;

use crate::classifier::Classifier;
use crate::error::EngineResult;
use crate::parser::{GrammarParser, serialize};
use crate::partitioner::{MstPartitioner, PartitionerOptions};
use crate::symbols::{Symbol, SymbolArena};

/// Handwritten-expression recognition engine.
pub struct Engine<C> {
    partitioner: MstPartitioner<C>,
    parser: GrammarParser,
    arena: SymbolArena,
}

impl<C: Classifier> Engine<C> {
    /// An engine with default partitioner options.
    pub fn new(classifier: C) -> Self {
        Self::with_options(classifier, PartitionerOptions::default())
    }

    /// An engine with explicit partitioner options.
    pub fn with_options(classifier: C, options: PartitionerOptions) -> Self {
        Self {
            partitioner: MstPartitioner::with_options(classifier, options),
            parser: GrammarParser::new(),
            arena: SymbolArena::new(),
        }
    }

    /// Recognize a whole expression from scratch.
    ///
    /// Replaces any previous state; returns the TeX serialization.
    pub fn recognize(&mut self, expression: &TraceGroup) -> EngineResult<String> {
        let symbols = self.partitioner.partition(expression)?;
        self.arena = SymbolArena::from_symbols(symbols);
        self.parser.parse(&mut self.arena)?;
        Ok(self.to_tex())
    }

    /// Add strokes to the current expression and re-recognize.
    pub fn append(&mut self, new_traces: &TraceGroup) -> EngineResult<String> {
        let symbols = self.arena.take_symbols();
        let symbols = self.partitioner.append(symbols, new_traces)?;
        self.arena = SymbolArena::from_symbols(symbols);
        self.parser.parse(&mut self.arena)?;
        Ok(self.to_tex())
    }

    /// Erase strokes from the current expression and re-recognize.
    pub fn remove(&mut self, erased: &TraceGroup) -> EngineResult<String> {
        let symbols = self.arena.take_symbols();
        let symbols = self.partitioner.remove(symbols, erased)?;
        self.arena = SymbolArena::from_symbols(symbols);
        self.parser.parse(&mut self.arena)?;
        Ok(self.to_tex())
    }

    /// Forget the current expression.
    pub fn reset(&mut self) {
        self.arena = SymbolArena::new();
    }

    /// TeX serialization of the current state; empty for no symbols.
    pub fn to_tex(&self) -> String {
        if self.arena.is_empty() {
            String::new()
        } else {
            serialize(&self.arena)
        }
    }

    /// The current symbols, in arena order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.arena.iter()
    }

    /// Number of recognized symbols.
    pub fn symbol_count(&self) -> usize {
        self.arena.len()
    }

    /// The underlying partitioner (e.g. to install diagnostics).
    pub fn partitioner_mut(&mut self) -> &mut MstPartitioner<C> {
        &mut self.partitioner
    }

    /// The underlying parser (e.g. to install diagnostics).
    pub fn parser_mut(&mut self) -> &mut GrammarParser {
        &mut self.parser
    }
}
