//! Error types for browser automation

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Timeout after {timeout_ms}ms waiting for {role} \"{name}\" to be visible")]
    ElementTimeout {
        role: String,
        name: String,
        timeout_ms: u64,
    },

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("Screenshot file not found or empty after saving: {}", .0.display())]
    ScreenshotMissing(PathBuf),

    #[error("CDP error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BrowserResult<T> = Result<T, BrowserError>;
