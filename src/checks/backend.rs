//! Backend endpoint checks
//!
//! Checks 1-5: root endpoint, status creation, status listing, CORS, liveness.
//!
//! None of these return an error: transport failures, bad statuses and
//! malformed bodies are all folded into the returned [`CheckResult`].

use anyhow::Result;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::http::{HttpClient, HttpRequest, HttpResponse};
use crate::models::{CheckCase, CheckResult, StatusCreate, StatusRecord};

/// Greeting the root endpoint must return in its `message` field
pub const EXPECTED_GREETING: &str = "Hello World";

const CORS_HEADERS: [&str; 3] = [
    "access-control-allow-origin",
    "access-control-allow-methods",
    "access-control-allow-headers",
];

/// The ordered backend check suite
pub struct BackendSuite {
    client: HttpClient,
    client_name: String,
    liveness_timeout_secs: u64,
}

impl BackendSuite {
    /// `client` must already carry the API root as its base URL
    pub fn new(client: HttpClient, client_name: impl Into<String>) -> Self {
        Self {
            client,
            client_name: client_name.into(),
            liveness_timeout_secs: 5,
        }
    }

    pub fn liveness_timeout(mut self, secs: u64) -> Self {
        self.liveness_timeout_secs = secs;
        self
    }

    /// Run a single check
    pub async fn run(&self, case: CheckCase) -> CheckResult {
        info!("Running check {}", case);
        match case {
            CheckCase::RootEndpoint => self.check_root().await,
            CheckCase::CreateStatus => self.check_create_status().await,
            CheckCase::ListStatus => self.check_list_status().await,
            CheckCase::Cors => self.check_cors().await,
            CheckCase::ServiceStatus => self.check_service_status().await,
        }
    }

    /// Check 1: `GET /api/` answers 200 with the greeting
    async fn check_root(&self) -> CheckResult {
        let case = CheckCase::RootEndpoint;
        let resp = match self.client.get("/").await {
            Ok(resp) => resp,
            Err(e) => return transport_failure(case, "Root endpoint connection failed", e),
        };

        if !resp.is_ok() {
            return CheckResult::fail(
                case,
                format!("Root endpoint failed with status {}", resp.status_code),
            );
        }

        match resp.json() {
            Ok(data) if data.get("message").and_then(Value::as_str) == Some(EXPECTED_GREETING) => {
                CheckResult::pass(case, "Root endpoint working correctly")
            }
            Ok(data) => CheckResult::fail(
                case,
                format!("Root endpoint returned unexpected data: {data}"),
            ),
            Err(_) => CheckResult::fail(
                case,
                format!("Root endpoint returned non-JSON body: {}", snippet(&resp.body)),
            ),
        }
    }

    /// Check 2: `POST /api/status` creates and echoes a record
    async fn check_create_status(&self) -> CheckResult {
        let case = CheckCase::CreateStatus;
        let body = StatusCreate::new(&self.client_name);
        let resp = match self.client.post_json("/status", &body).await {
            Ok(resp) => resp,
            Err(e) => return transport_failure(case, "POST /api/status connection failed", e),
        };

        if !resp.is_ok() {
            return status_failure(case, "POST /api/status", &resp);
        }

        let data = match resp.json() {
            Ok(data) => data,
            Err(_) => {
                return CheckResult::fail(
                    case,
                    format!("POST /api/status returned non-JSON body: {}", snippet(&resp.body)),
                )
            }
        };

        let missing = StatusRecord::missing_fields(&data);
        if !missing.is_empty() {
            return CheckResult::fail(
                case,
                format!(
                    "POST /api/status missing required fields {}: {data}",
                    missing.join(", ")
                ),
            );
        }

        let record = StatusRecord::from_value(&data);
        if record.echoes(&self.client_name) {
            debug!("Created status record {} at {}", record.id, record.timestamp);
            CheckResult::pass(case, "POST /api/status working correctly")
                .with_details(json!({ "created_id": record.id }))
        } else {
            CheckResult::fail(
                case,
                format!("POST /api/status returned wrong client_name: {data}"),
            )
        }
    }

    /// Check 3: `GET /api/status` lists records; the probe record is a soft expectation
    async fn check_list_status(&self) -> CheckResult {
        let case = CheckCase::ListStatus;
        let resp = match self.client.get("/status").await {
            Ok(resp) => resp,
            Err(e) => return transport_failure(case, "GET /api/status connection failed", e),
        };

        if !resp.is_ok() {
            return status_failure(case, "GET /api/status", &resp);
        }

        let records = match resp.json() {
            Ok(Value::Array(records)) => records,
            Ok(other) => {
                return CheckResult::fail(
                    case,
                    format!("GET /api/status returned non-list data: {}", json_kind(&other)),
                )
            }
            Err(_) => {
                return CheckResult::fail(
                    case,
                    format!("GET /api/status returned non-JSON body: {}", snippet(&resp.body)),
                )
            }
        };

        let found = records.iter().any(|record| {
            record.get("client_name").and_then(Value::as_str) == Some(self.client_name.as_str())
        });
        let details = json!({ "records": records.len(), "probe_found": found });

        if found {
            CheckResult::pass(
                case,
                format!(
                    "GET /api/status working correctly (returned {} records, test record found)",
                    records.len()
                ),
            )
            .with_details(details)
        } else {
            warn!("Probe record '{}' not visible in status list", self.client_name);
            CheckResult::warn(
                case,
                format!(
                    "GET /api/status returned {} records but the test record was not found - possible persistence issue",
                    records.len()
                ),
            )
            .with_details(details)
        }
    }

    /// Check 4: CORS headers on `OPTIONS /api/`; never a hard failure
    async fn check_cors(&self) -> CheckResult {
        let case = CheckCase::Cors;
        let resp = match self.client.options("/").await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("CORS probe failed: {}", e);
                return CheckResult::warn(
                    case,
                    format!("Could not test CORS configuration: {e}"),
                );
            }
        };

        let observed: serde_json::Map<String, Value> = CORS_HEADERS
            .iter()
            .map(|name| {
                let value = resp
                    .get_header(name)
                    .map(|v| Value::String(v.clone()))
                    .unwrap_or(Value::Null);
                (name.to_string(), value)
            })
            .collect();
        let observed = Value::Object(observed);

        if resp.get_header("access-control-allow-origin").map(String::as_str) == Some("*") {
            CheckResult::pass(case, "CORS properly configured - allows all origins")
                .with_details(observed)
        } else {
            CheckResult::warn(case, format!("CORS configuration: {observed}")).with_details(observed)
        }
    }

    /// Check 5: liveness probe on `GET /api/` with the short timeout
    async fn check_service_status(&self) -> CheckResult {
        let case = CheckCase::ServiceStatus;
        let request = HttpRequest::get("/").timeout(self.liveness_timeout_secs);
        match self.client.send(request).await {
            Ok(resp) if resp.is_ok() => {
                CheckResult::pass(case, "Backend service is running and responding")
            }
            Ok(resp) => CheckResult::fail(
                case,
                format!(
                    "Backend service responding with error status: {}",
                    resp.status_code
                ),
            ),
            Err(e) => transport_failure(case, "Backend service not responding", e),
        }
    }
}

/// Build the checker's HTTP client rooted at the API URL
pub fn api_client(api_url: &str, timeout_secs: u64) -> Result<HttpClient> {
    HttpClient::with_timeout(timeout_secs)?
        .base_url(api_url)
        .default_header("User-Agent", concat!("stack-verify/", env!("CARGO_PKG_VERSION")))
}

fn transport_failure(case: CheckCase, context: &str, error: anyhow::Error) -> CheckResult {
    CheckResult::fail(case, format!("CRITICAL: {context}: {error}"))
}

fn status_failure(case: CheckCase, endpoint: &str, resp: &HttpResponse) -> CheckResult {
    CheckResult::fail(
        case,
        format!(
            "{endpoint} failed with status {}: {}",
            resp.status_code,
            snippet(&resp.body)
        ),
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// First 200 characters of a body, for messages
fn snippet(body: &str) -> String {
    const LIMIT: usize = 200;
    if body.chars().count() > LIMIT {
        let cut: String = body.chars().take(LIMIT).collect();
        format!("{cut}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::mock::{spawn_backend, MockBackend};
    use crate::models::CheckStatus;
    use axum::http::StatusCode;
    use std::time::{Duration, Instant};

    const PROBE: &str = "test_client_backend_verification";

    async fn suite_for(mock: MockBackend) -> BackendSuite {
        suite_named(mock, PROBE).await
    }

    async fn suite_named(mock: MockBackend, client_name: &str) -> BackendSuite {
        let base = spawn_backend(mock).await;
        let client = api_client(&format!("{base}/api"), 5).unwrap();
        BackendSuite::new(client, client_name).liveness_timeout(2)
    }

    #[tokio::test]
    async fn test_all_checks_pass_against_conforming_backend() {
        let suite = suite_for(MockBackend::default()).await;
        for case in CheckCase::all() {
            let result = suite.run(case).await;
            assert_eq!(result.status, CheckStatus::Pass, "{result}");
        }
    }

    #[tokio::test]
    async fn test_create_status_reports_created_id() {
        let suite = suite_for(MockBackend::default()).await;
        let result = suite.run(CheckCase::CreateStatus).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.details.unwrap()["created_id"], "rec-1");
    }

    #[tokio::test]
    async fn test_root_wrong_greeting_fails() {
        let suite = suite_for(MockBackend {
            greeting: "Hi".to_string(),
            ..Default::default()
        })
        .await;
        let result = suite.run(CheckCase::RootEndpoint).await;
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("unexpected data"));
    }

    #[tokio::test]
    async fn test_root_error_status_fails() {
        let suite = suite_for(MockBackend {
            root_status: StatusCode::INTERNAL_SERVER_ERROR,
            ..Default::default()
        })
        .await;
        assert_eq!(suite.run(CheckCase::RootEndpoint).await.status, CheckStatus::Fail);
        assert_eq!(suite.run(CheckCase::ServiceStatus).await.status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn test_mismatched_echo_fails() {
        let suite = suite_for(MockBackend {
            echo_override: Some("someone_else".to_string()),
            ..Default::default()
        })
        .await;
        let result = suite.run(CheckCase::CreateStatus).await;
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("wrong client_name"));
    }

    #[tokio::test]
    async fn test_missing_timestamp_fails() {
        let suite = suite_for(MockBackend {
            omit_timestamp: true,
            ..Default::default()
        })
        .await;
        let result = suite.run(CheckCase::CreateStatus).await;
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("timestamp"));
    }

    #[tokio::test]
    async fn test_non_string_echo_fails() {
        let suite = suite_named(
            MockBackend {
                record_override: Some(json!({"id": "a", "client_name": 7, "timestamp": "t"})),
                ..Default::default()
            },
            "7",
        )
        .await;
        let result = suite.run(CheckCase::CreateStatus).await;
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("wrong client_name"));
    }

    #[tokio::test]
    async fn test_null_id_still_passes_echo() {
        let suite = suite_for(MockBackend {
            record_override: Some(json!({"id": null, "client_name": PROBE, "timestamp": "t"})),
            ..Default::default()
        })
        .await;
        let result = suite.run(CheckCase::CreateStatus).await;
        assert_eq!(result.status, CheckStatus::Pass, "{result}");
        assert!(result.details.unwrap()["created_id"].is_null());
    }

    #[tokio::test]
    async fn test_non_list_status_body_fails() {
        let suite = suite_for(MockBackend {
            list_body: Some(json!({"items": []})),
            ..Default::default()
        })
        .await;
        let result = suite.run(CheckCase::ListStatus).await;
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("non-list data: object"));
    }

    #[tokio::test]
    async fn test_non_json_bodies_fail() {
        let suite = suite_for(MockBackend {
            raw_body: Some("<html>maintenance</html>"),
            ..Default::default()
        })
        .await;
        for case in [
            CheckCase::RootEndpoint,
            CheckCase::CreateStatus,
            CheckCase::ListStatus,
        ] {
            let result = suite.run(case).await;
            assert_eq!(result.status, CheckStatus::Fail, "{result}");
            assert!(result.message.contains("non-JSON body"), "{result}");
            assert!(result.message.contains("maintenance"));
        }
    }

    #[tokio::test]
    async fn test_liveness_uses_short_timeout() {
        let base = spawn_backend(MockBackend {
            root_delay: Some(Duration::from_secs(4)),
            ..Default::default()
        })
        .await;
        let client = api_client(&format!("{base}/api"), 10).unwrap();
        let suite = BackendSuite::new(client, PROBE).liveness_timeout(1);

        let started = Instant::now();
        let result = suite.run(CheckCase::ServiceStatus).await;
        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("Timeout after 1 seconds"), "{result}");
    }

    #[tokio::test]
    async fn test_unpersisted_record_is_a_warning() {
        let suite = suite_for(MockBackend {
            persist: false,
            ..Default::default()
        })
        .await;
        assert_eq!(suite.run(CheckCase::CreateStatus).await.status, CheckStatus::Pass);
        let result = suite.run(CheckCase::ListStatus).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert_eq!(result.details.unwrap()["probe_found"], false);
    }

    #[tokio::test]
    async fn test_restricted_cors_is_a_warning() {
        let suite = suite_for(MockBackend {
            cors_origin: Some("http://localhost:3000"),
            ..Default::default()
        })
        .await;
        let result = suite.run(CheckCase::Cors).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert_eq!(
            result.details.unwrap()["access-control-allow-origin"],
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = api_client(&format!("http://127.0.0.1:{port}/api"), 2).unwrap();
        let suite = BackendSuite::new(client, PROBE).liveness_timeout(1);

        let root = suite.run(CheckCase::RootEndpoint).await;
        assert_eq!(root.status, CheckStatus::Fail);
        assert!(root.message.starts_with("CRITICAL"));
        // Transport errors on the CORS probe stay soft
        assert_eq!(suite.run(CheckCase::Cors).await.status, CheckStatus::Warn);
        assert_eq!(suite.run(CheckCase::ServiceStatus).await.status, CheckStatus::Fail);
    }

    #[test]
    fn test_snippet_truncates() {
        let long = "x".repeat(500);
        assert_eq!(snippet(&long).len(), 203);
        assert_eq!(snippet("short"), "short");
    }
}
