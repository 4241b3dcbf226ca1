//! Configuration file management
//!
//! Handles finding, loading, and validating configuration files.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::AppConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./stack-verify.yaml",
    "./stack-verify.yml",
    "./.stack-verify.yaml",
    "~/.config/stack-verify/config.yaml",
];

/// Find configuration file in standard locations
pub fn find_config_file() -> Option<PathBuf> {
    CONFIG_LOCATIONS
        .iter()
        .map(|location| expand_path(location))
        .find(|path| path.exists())
}

/// Load configuration from an explicit path, a standard location, or defaults
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match find_config_file() {
            Some(found) => found,
            None => {
                debug!("No config file found, using defaults");
                return Ok(AppConfig::default());
            }
        },
    };

    debug!("Loading config from {}", path.display());

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig = if is_yaml_file(&path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
    };

    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
