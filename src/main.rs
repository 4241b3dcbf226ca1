//! stack-verify - backend endpoint and page render verification
//!
//! A CLI harness with two independent checkers:
//!
//! ## Features
//!
//! - `backend`: five ordered HTTP checks against a REST backend (root
//!   greeting, status create, status list, CORS, liveness) with hard/soft
//!   outcomes and a 0/1 exit status
//! - `render`: headless Chromium waits for a heading by accessible role and
//!   exact name, then writes a full-page screenshot
//!
//! ## Usage
//!
//! ```bash
//! # Check the backend named in /app/frontend/.env
//! stack-verify backend
//!
//! # Check a backend from another dotenv file
//! stack-verify backend --env-file ./frontend/.env
//!
//! # Verify the page heading and capture a screenshot
//! stack-verify render --url http://localhost:3001 --screenshot ./verification.png
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

mod browser;
mod checks;
mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod utils;

use cli::{Args, Command};
use config::{AppConfig, EnvConfig};
use executor::{verify_backend, verify_render};
use output::ResultFormatter;
use utils::logger::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logger(LogLevel::from_verbose(args.verbose));

    let config = resolve_config(&args)?;
    let formatter = if config.no_color {
        ResultFormatter::new().no_color()
    } else {
        ResultFormatter::new()
    };

    match args.command {
        Command::Backend(_) => {
            let code = verify_backend(&config.backend, formatter).await;
            Ok(ExitCode::from(code))
        }
        Command::Render(_) => {
            verify_render(&config.render, &formatter).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Defaults, then config file, then environment, then flags
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = config::load_config(args.config.as_deref())?;

    EnvConfig::load().apply(&mut config);

    match &args.command {
        Command::Backend(backend_args) => backend_args.apply(&mut config),
        Command::Render(render_args) => render_args.apply(&mut config),
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
