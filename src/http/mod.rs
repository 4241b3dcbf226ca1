//! HTTP client module for backend verification
//!
//! Provides HTTP client functionality for checking REST endpoints.

mod client;

pub use client::{HttpClient, HttpRequest, HttpResponse};
