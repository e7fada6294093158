//! Diagnostics sink
//!
//! The partitioner and parser report what they decided - candidate
//! counts, filtered clusters, fallback activations - through an
//! explicit sink handed in by the caller instead of global verbosity
//! flags. The default sink discards everything.

/// Receiver for engine progress notes.
pub trait Diagnostics {
    /// Record one diagnostic note.
    fn note(&mut self, message: &str);
}

/// Discards all notes; the default sink.
#[derive(Debug, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn note(&mut self, _message: &str) {}
}

/// Collects notes in memory, mainly for tests and debugging.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    /// All recorded notes, oldest first
    pub notes: Vec<String>,
}

impl Diagnostics for CollectingDiagnostics {
    fn note(&mut self, message: &str) {
        self.notes.push(message.to_string());
    }
}
