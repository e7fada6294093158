//! scrawl-test - Regression test framework for scrawl
//!
//! This crate provides a small regression test harness supporting three
//! modes:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files (default)
//! - **Display**: Run tests without comparison (visual inspection)
//!
//! # Usage
//!
//! ```ignore
//! use scrawl_test::RegParams;
//!
//! let mut rp = RegParams::new("partition");
//! rp.compare_values(3.0, clusters.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // scrawl-test is at crates/scrawl-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
