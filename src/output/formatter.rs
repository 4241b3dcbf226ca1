//! Console formatting for check results
//!
//! Renders the per-check status lines and the closing banner.

use crate::checks::RenderReport;
use crate::models::{CheckCase, CheckResult, CheckStatus, CheckSummary};

const RULE: &str = "==================================================";

/// Result formatter
#[derive(Clone, Debug)]
pub struct ResultFormatter {
    colorize: bool,
}

impl ResultFormatter {
    pub fn new() -> Self {
        Self { colorize: true }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Banner printed before any check runs
    pub fn format_start(&self) -> String {
        format!("🚀 Starting Backend API Tests\n{RULE}")
    }

    pub fn format_target(&self, api_url: &str) -> String {
        format!("🔍 Testing backend at: {api_url}")
    }

    /// Section heading printed before a check runs
    pub fn format_case(&self, case: CheckCase) -> String {
        format!("\n{}. Testing {}", case.number(), case.name())
    }

    /// Format a single check result
    pub fn format_result(&self, result: &CheckResult) -> String {
        let line = format!("{} {}", result.status.symbol(), result.message);
        self.paint(result.status, &line)
    }

    /// Closing banner with counts
    pub fn format_summary(&self, summary: &CheckSummary) -> String {
        let (status, banner) = if summary.passed {
            (CheckStatus::Pass, "🎉 ALL BACKEND TESTS PASSED")
        } else {
            (CheckStatus::Fail, "💥 SOME BACKEND TESTS FAILED")
        };

        format!(
            "\n{RULE}\n{}\nPass: {} | Warn: {} | Fail: {} | Duration: {}ms",
            self.paint(status, banner),
            summary.count(CheckStatus::Pass),
            summary.count(CheckStatus::Warn),
            summary.count(CheckStatus::Fail),
            summary.total_duration_ms()
        )
    }

    /// Fatal setup failure, printed instead of any check output
    pub fn format_fatal(&self, error: &anyhow::Error) -> String {
        let line = format!("❌ CRITICAL: {error:#}");
        format!(
            "{}\n\n{RULE}\n{}",
            self.paint(CheckStatus::Fail, &line),
            self.paint(CheckStatus::Fail, "💥 SOME BACKEND TESTS FAILED")
        )
    }

    pub fn format_render_report(&self, report: &RenderReport) -> String {
        let line = format!(
            "✅ {} rendered; screenshot saved to {} ({} bytes)",
            report.url,
            report.screenshot_path.display(),
            report.screenshot_bytes
        );
        self.paint(CheckStatus::Pass, &line)
    }

    fn paint(&self, status: CheckStatus, text: &str) -> String {
        if !self.colorize {
            return text.to_string();
        }
        let code = match status {
            CheckStatus::Pass => "32",
            CheckStatus::Warn => "33",
            CheckStatus::Fail => "31",
        };
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new()
    }
}
