//! Data models for endpoint and render verification
//!
//! This module contains all data structures shared by the checkers.

mod check;
mod status;

pub use check::{CheckCase, CheckResult, CheckStatus, CheckSummary};
pub use status::{StatusCreate, StatusRecord};
