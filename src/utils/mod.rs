//! Shared utilities

pub mod logger;
pub mod timer;

pub use timer::{Stopwatch, Timer};
