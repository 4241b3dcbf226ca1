//! Backend target discovery from a frontend dotenv file

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;

/// Key whose value names the backend base URL
pub const BACKEND_URL_KEY: &str = "REACT_APP_BACKEND_URL";

/// Base address of the backend under test
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendTarget {
    base_url: String,
}

impl BackendTarget {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read the backend URL from a dotenv-style file
    ///
    /// Fails when the file cannot be read or carries no usable
    /// `REACT_APP_BACKEND_URL` line.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let url = parse_backend_url(&content)
            .with_context(|| format!("{BACKEND_URL_KEY} not set in {}", path.display()))?;

        Ok(Self::new(url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// REST API root, `{base}/api`
    pub fn api_url(&self) -> String {
        format!("{}/api", self.base_url)
    }
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_url())
    }
}

/// First `REACT_APP_BACKEND_URL=` line wins; blank values count as absent.
fn parse_backend_url(content: &str) -> Option<String> {
    let prefix = format!("{BACKEND_URL_KEY}=");
    let line = content.lines().find(|line| line.starts_with(&prefix))?;
    let (_, value) = line.split_once('=')?;
    let value = strip_quotes(value.trim()).trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
