//! Configuration module
//!
//! Handles loading and layering configuration for both checkers:
//! built-in defaults, an optional YAML/JSON file, environment overrides,
//! then command-line flags.

mod dotenv;
mod env;
mod file;

pub use dotenv::BackendTarget;
pub use env::{EnvConfig, ENV_HELP};
pub use file::load_config;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP endpoint checker settings
    pub backend: BackendConfig,

    /// Page render checker settings
    pub render: RenderConfig,

    /// Disable ANSI colors in console output
    pub no_color: bool,
}

impl AppConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend.timeout_secs == 0 || self.backend.liveness_timeout_secs == 0 {
            anyhow::bail!("Backend timeouts must be greater than zero");
        }
        if self.backend.client_name.trim().is_empty() {
            anyhow::bail!("Backend client_name must not be empty");
        }
        if self.render.url.trim().is_empty() {
            anyhow::bail!("Render url must not be empty");
        }
        if self.render.heading_name.trim().is_empty() {
            anyhow::bail!("Render heading_name must not be empty");
        }
        if self.render.wait_timeout_ms == 0 || self.render.poll_interval_ms == 0 {
            anyhow::bail!("Render wait timeout and poll interval must be greater than zero");
        }
        Ok(())
    }
}

/// HTTP endpoint checker configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Dotenv file holding the backend URL
    pub env_file: PathBuf,

    /// `client_name` sent when creating the probe status record
    pub client_name: String,

    /// Timeout for the functional checks, in seconds
    pub timeout_secs: u64,

    /// Timeout for the final liveness probe, in seconds
    pub liveness_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from("/app/frontend/.env"),
            client_name: "test_client_backend_verification".to_string(),
            timeout_secs: 10,
            liveness_timeout_secs: 5,
        }
    }
}

/// Page render checker configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Page to open
    pub url: String,

    /// Accessible role of the element to wait for
    pub heading_role: String,

    /// Exact accessible name of the element to wait for
    pub heading_name: String,

    /// Upper bound on the visibility wait, in milliseconds
    pub wait_timeout_ms: u64,

    /// Delay between visibility probes, in milliseconds
    pub poll_interval_ms: u64,

    /// Where the full-page screenshot is written
    pub screenshot_path: PathBuf,

    /// Run Chromium without a window
    pub headless: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3001".to_string(),
            heading_role: "heading".to_string(),
            heading_name: "أهلاً بك في مكتبة تفانين".to_string(),
            wait_timeout_ms: 10_000,
            poll_interval_ms: 100,
            screenshot_path: PathBuf::from("/app/jules-scratch/verification/verification.png"),
            headless: true,
        }
    }
}
