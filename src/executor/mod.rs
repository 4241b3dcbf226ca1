//! Check execution engine
//!
//! Provides sequential execution of the backend and render checks.

mod runner;

pub use runner::{verify_backend, verify_render};
