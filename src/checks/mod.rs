//! Verification checks
//!
//! ## Backend checks (1-5)
//! - Root endpoint greeting
//! - Status record creation
//! - Status listing (probe record visibility is soft)
//! - CORS headers (soft)
//! - Liveness probe
//!
//! ## Render check
//! - Heading visibility by accessible role and name, then a full-page screenshot

mod backend;
mod render;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{api_client, BackendSuite};
pub use render::{RenderCheck, RenderReport};
