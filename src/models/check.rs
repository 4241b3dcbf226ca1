//! Check result models for backend verification
//!
//! Defines check cases, results, and the run-scoped outcome accumulator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five backend checks, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCase {
    RootEndpoint,
    CreateStatus,
    ListStatus,
    Cors,
    ServiceStatus,
}

impl CheckCase {
    /// Get check number (1-5)
    pub fn number(&self) -> u8 {
        match self {
            CheckCase::RootEndpoint => 1,
            CheckCase::CreateStatus => 2,
            CheckCase::ListStatus => 3,
            CheckCase::Cors => 4,
            CheckCase::ServiceStatus => 5,
        }
    }

    /// Get check name
    pub fn name(&self) -> &'static str {
        match self {
            CheckCase::RootEndpoint => "Root Endpoint GET /api/",
            CheckCase::CreateStatus => "POST /api/status",
            CheckCase::ListStatus => "GET /api/status",
            CheckCase::Cors => "CORS Configuration",
            CheckCase::ServiceStatus => "Backend Service Status",
        }
    }

    /// All checks in the order they run
    pub fn all() -> Vec<CheckCase> {
        vec![
            CheckCase::RootEndpoint,
            CheckCase::CreateStatus,
            CheckCase::ListStatus,
            CheckCase::Cors,
            CheckCase::ServiceStatus,
        ]
    }
}

impl fmt::Display for CheckCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.name())
    }
}

/// Outcome of a single check
///
/// `Warn` is a soft outcome: it is reported but never flips the run result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "✅",
            CheckStatus::Warn => "⚠️ ",
            CheckStatus::Fail => "❌",
        }
    }

    pub fn is_hard_failure(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "PASS"),
            CheckStatus::Warn => write!(f, "WARN"),
            CheckStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Result of a single check execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckResult {
    pub case: CheckCase,
    pub status: CheckStatus,
    pub duration_ms: u64,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl CheckResult {
    pub fn pass(case: CheckCase, message: impl Into<String>) -> Self {
        Self::new(case, CheckStatus::Pass, message)
    }

    pub fn warn(case: CheckCase, message: impl Into<String>) -> Self {
        Self::new(case, CheckStatus::Warn, message)
    }

    pub fn fail(case: CheckCase, message: impl Into<String>) -> Self {
        Self::new(case, CheckStatus::Fail, message)
    }

    fn new(case: CheckCase, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            case,
            status,
            duration_ms: 0,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms] - {}",
            self.status.symbol(),
            self.case,
            self.duration_ms,
            self.message
        )
    }
}

/// Accumulated outcome of one backend verification run
///
/// `passed` starts true and is only ever AND-ed with each hard outcome, so a
/// failure recorded at any point survives until the end of the run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckSummary {
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub passed: bool,
    pub results: Vec<CheckResult>,
}

impl CheckSummary {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            started_at: Utc::now(),
            passed: true,
            results: Vec::new(),
        }
    }

    /// Record a check result and fold it into the run outcome
    pub fn record(&mut self, result: CheckResult) {
        self.passed &= !result.status.is_hard_failure();
        self.results.push(result);
    }

    pub fn count(&self, status: CheckStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.results.iter().map(|r| r.duration_ms).sum()
    }

    pub fn exit_code(&self) -> u8 {
        if self.passed {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Backend verification - {}", self.target)?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        write!(
            f,
            "Pass: {} | Warn: {} | Fail: {} | Duration: {}ms",
            self.count(CheckStatus::Pass),
            self.count(CheckStatus::Warn),
            self.count(CheckStatus::Fail),
            self.total_duration_ms()
        )
    }
}
