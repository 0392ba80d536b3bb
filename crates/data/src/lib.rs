//! CSV input loading and report writing.
//!
//! Loading validates shape only (parseable rows, unique fund ids);
//! window-level completeness is the analysis engine's concern.

pub mod loader;
pub mod report;

pub use loader::{load_funds, load_returns};
pub use report::ReportWriter;
