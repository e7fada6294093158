//! Error types for scrawl-test

use thiserror::Error;

/// Errors raised by the regression test framework
#[derive(Debug, Error)]
pub enum TestError {
    /// I/O error while reading or writing test artifacts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A golden file was missing in compare mode
    #[error("golden file not found: {0}")]
    GoldenMissing(String),
}

/// Result type for test framework operations
pub type TestResult<T> = Result<T, TestError>;
