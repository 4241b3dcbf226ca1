//! Logging utilities
//!
//! Diagnostics go to stderr so stdout carries only the check report.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log level configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
        }
    }
}

/// Filter used when `RUST_LOG` is not set
fn default_filter(level: LogLevel) -> String {
    format!("stack_verify={}", level.to_tracing_level())
}

/// Initialize the logger; `RUST_LOG` takes precedence over `level`
pub fn init_logger(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
