//! Check execution runners
//!
//! Runs the backend checks in their fixed order and the render check once.

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::checks::{api_client, BackendSuite, RenderCheck};
use crate::config::{BackendConfig, BackendTarget, RenderConfig};
use crate::models::{CheckCase, CheckStatus, CheckSummary};
use crate::output::ResultFormatter;
use crate::utils::Timer;

/// Sequential runner for the backend checks
pub struct BackendRunner {
    target: BackendTarget,
    suite: BackendSuite,
    formatter: ResultFormatter,
}

impl BackendRunner {
    /// Resolve the backend target and build the HTTP client
    ///
    /// Fails without touching the network when the dotenv file is unreadable
    /// or carries no backend URL.
    pub fn prepare(config: &BackendConfig, formatter: ResultFormatter) -> Result<Self> {
        let target = BackendTarget::from_env_file(&config.env_file).with_context(|| {
            format!(
                "Could not get backend URL from {}",
                config.env_file.display()
            )
        })?;
        debug!(
            "Backend {} resolved from {}",
            target.base_url(),
            config.env_file.display()
        );

        let client = api_client(&target.api_url(), config.timeout_secs)?;
        let suite = BackendSuite::new(client, &config.client_name)
            .liveness_timeout(config.liveness_timeout_secs);

        Ok(Self {
            target,
            suite,
            formatter,
        })
    }

    pub fn target(&self) -> &BackendTarget {
        &self.target
    }

    /// Run every check in order, printing as each completes
    pub async fn run_all(&self) -> CheckSummary {
        let api_url = self.target.api_url();
        println!("{}", self.formatter.format_target(&api_url));
        info!("Starting backend verification against {}", api_url);

        let mut summary = CheckSummary::new(api_url);

        for case in CheckCase::all() {
            println!("{}", self.formatter.format_case(case));

            let timer = Timer::start(case.name());
            let result = self.suite.run(case).await;
            let result = result.with_duration(timer.stop());

            match result.status {
                CheckStatus::Pass => info!("  {}", result),
                CheckStatus::Warn => warn!("  {}", result),
                CheckStatus::Fail => error!("  {}", result),
            }
            println!("{}", self.formatter.format_result(&result));

            summary.record(result);
        }

        println!("{}", self.formatter.format_summary(&summary));
        info!(
            "Backend verification started at {} completed in {}ms - passed: {}",
            summary.started_at.to_rfc3339(),
            summary.total_duration_ms(),
            summary.passed
        );

        summary
    }
}

/// Run the backend checker end to end and return the process exit code
pub async fn verify_backend(config: &BackendConfig, formatter: ResultFormatter) -> u8 {
    println!("{}", formatter.format_start());

    match BackendRunner::prepare(config, formatter.clone()) {
        Ok(runner) => runner.run_all().await.exit_code(),
        Err(e) => {
            error!("Backend verification aborted: {:#}", e);
            println!("{}", formatter.format_fatal(&e));
            1
        }
    }
}

/// Run the render checker; any failure is returned as an error
pub async fn verify_render(config: &RenderConfig, formatter: &ResultFormatter) -> Result<()> {
    info!("Starting render verification of {}", config.url);
    let report = RenderCheck::new(config).run().await?;
    println!("{}", formatter.format_render_report(&report));
    Ok(())
}
