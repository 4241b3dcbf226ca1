//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{AppConfig, ENV_HELP};

/// Backend endpoint and page render verification harness
#[derive(Parser, Debug)]
#[command(name = "stack-verify")]
#[command(author = "hephaex@gmail.com")]
#[command(version)]
#[command(about = "Verify a web backend's REST endpoints and a page's rendered heading")]
#[command(after_help = ENV_HELP)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP endpoint checks against the backend
    Backend(BackendArgs),

    /// Check that the page renders its heading and capture a screenshot
    Render(RenderArgs),
}

/// Arguments for backend command
#[derive(Parser, Debug)]
pub struct BackendArgs {
    /// Dotenv file holding REACT_APP_BACKEND_URL
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// client_name used for the probe status record
    #[arg(long)]
    pub client_name: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Liveness probe timeout in seconds
    #[arg(long)]
    pub liveness_timeout: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Page to open
    #[arg(long)]
    pub url: Option<String>,

    /// Exact heading text to wait for
    #[arg(long)]
    pub heading: Option<String>,

    /// Screenshot output path
    #[arg(long)]
    pub screenshot: Option<PathBuf>,

    /// Heading visibility timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl BackendArgs {
    /// Overlay flags that were given onto `config`
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.env_file {
            config.backend.env_file = path.clone();
        }
        if let Some(name) = &self.client_name {
            config.backend.client_name = name.clone();
        }
        if let Some(secs) = self.timeout {
            config.backend.timeout_secs = secs;
        }
        if let Some(secs) = self.liveness_timeout {
            config.backend.liveness_timeout_secs = secs;
        }
        if self.no_color {
            config.no_color = true;
        }
    }
}

impl RenderArgs {
    /// Overlay flags that were given onto `config`
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.url {
            config.render.url = url.clone();
        }
        if let Some(heading) = &self.heading {
            config.render.heading_name = heading.clone();
        }
        if let Some(path) = &self.screenshot {
            config.render.screenshot_path = path.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.render.wait_timeout_ms = ms;
        }
        if self.headful {
            config.render.headless = false;
        }
        if self.no_color {
            config.no_color = true;
        }
    }
}
