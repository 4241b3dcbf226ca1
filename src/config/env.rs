//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

use super::AppConfig;

/// Environment variable prefix
const ENV_PREFIX: &str = "STACK_VERIFY";

/// Help text listing the recognised variables
pub const ENV_HELP: &str = "\
Environment Variables:
  STACK_VERIFY_ENV_FILE          Dotenv file holding REACT_APP_BACKEND_URL
  STACK_VERIFY_CLIENT_NAME       client_name used for the probe status record
  STACK_VERIFY_TIMEOUT           Backend request timeout in seconds
  STACK_VERIFY_LIVENESS_TIMEOUT  Liveness probe timeout in seconds
  STACK_VERIFY_RENDER_URL        Page opened by the render checker
  STACK_VERIFY_HEADING           Exact heading text to wait for
  STACK_VERIFY_SCREENSHOT        Screenshot output path
  STACK_VERIFY_WAIT_TIMEOUT_MS   Heading visibility timeout in milliseconds
  STACK_VERIFY_NO_COLOR          Disable colored output (true/false)";

/// Configuration overrides read from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// From STACK_VERIFY_ENV_FILE
    pub env_file: Option<PathBuf>,
    /// From STACK_VERIFY_CLIENT_NAME
    pub client_name: Option<String>,
    /// From STACK_VERIFY_TIMEOUT
    pub timeout: Option<u64>,
    /// From STACK_VERIFY_LIVENESS_TIMEOUT
    pub liveness_timeout: Option<u64>,
    /// From STACK_VERIFY_RENDER_URL
    pub render_url: Option<String>,
    /// From STACK_VERIFY_HEADING
    pub heading: Option<String>,
    /// From STACK_VERIFY_SCREENSHOT
    pub screenshot: Option<PathBuf>,
    /// From STACK_VERIFY_WAIT_TIMEOUT_MS
    pub wait_timeout_ms: Option<u64>,
    /// From STACK_VERIFY_NO_COLOR
    pub no_color: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            env_file: get_env("ENV_FILE").map(PathBuf::from),
            client_name: get_env("CLIENT_NAME"),
            timeout: get_env_parse("TIMEOUT"),
            liveness_timeout: get_env_parse("LIVENESS_TIMEOUT"),
            render_url: get_env("RENDER_URL"),
            heading: get_env("HEADING"),
            screenshot: get_env("SCREENSHOT").map(PathBuf::from),
            wait_timeout_ms: get_env_parse("WAIT_TIMEOUT_MS"),
            no_color: get_env_bool("NO_COLOR"),
        }
    }

    /// Overlay every variable that is set onto `config`
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
        if let Some(url) = &self.render_url {
            config.render.url = url.clone();
        }
        if let Some(heading) = &self.heading {
            config.render.heading_name = heading.clone();
        }
        if let Some(path) = &self.screenshot {
            config.render.screenshot_path = path.clone();
        }
        if let Some(ms) = self.wait_timeout_ms {
            config.render.wait_timeout_ms = ms;
        }
        if let Some(no_color) = self.no_color {
            config.no_color = no_color;
        }
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}"))
        .ok()
        .filter(|v| !v.is_empty())
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables in tests
#[cfg(test)]
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

#[cfg(test)]
impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn var(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_{name}"), value.into()));
        self
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        for (key, value) in self.vars {
            env::set_var(key, value);
        }

        EnvGuard { previous }
    }
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}
