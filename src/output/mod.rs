//! Output formatting module
//!
//! Console rendering for check results.

mod formatter;

pub use formatter::ResultFormatter;
