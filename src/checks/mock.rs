//! In-process backend used by the check tests

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Knobs for how the mock backend deviates from the expected contract
#[derive(Clone, Debug)]
pub struct MockBackend {
    pub greeting: String,
    pub root_status: StatusCode,
    pub persist: bool,
    pub echo_override: Option<String>,
    pub omit_timestamp: bool,
    pub cors_origin: Option<&'static str>,
    /// Returned verbatim by `POST /api/status` instead of a generated record
    pub record_override: Option<Value>,
    /// Returned by `GET /api/status` instead of the stored records
    pub list_body: Option<Value>,
    /// Plain-text 200 body served by the root, create and list routes
    pub raw_body: Option<&'static str>,
    /// Delay before the root endpoint answers
    pub root_delay: Option<Duration>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            greeting: "Hello World".to_string(),
            root_status: StatusCode::OK,
            persist: true,
            echo_override: None,
            omit_timestamp: false,
            cors_origin: Some("*"),
            record_override: None,
            list_body: None,
            raw_body: None,
            root_delay: None,
        }
    }
}

#[derive(Clone)]
struct MockState {
    behavior: MockBackend,
    records: Arc<Mutex<Vec<Value>>>,
    created: Arc<Mutex<u64>>,
}

/// Serve `behavior` on an ephemeral localhost port and return its base URL
pub async fn spawn_backend(behavior: MockBackend) -> String {
    let state = MockState {
        behavior,
        records: Arc::new(Mutex::new(Vec::new())),
        created: Arc::new(Mutex::new(0)),
    };

    let router = Router::new()
        .route("/api/", get(root).options(preflight))
        .route("/api/status", get(list_status).post(create_status))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

fn raw(body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "text/html")], body).into_response()
}

async fn root(State(state): State<MockState>) -> Response {
    if let Some(delay) = state.behavior.root_delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(text) = state.behavior.raw_body {
        return raw(text);
    }
    if state.behavior.root_status != StatusCode::OK {
        return (state.behavior.root_status, "upstream unavailable").into_response();
    }
    Json(json!({ "message": state.behavior.greeting })).into_response()
}

async fn preflight(State(state): State<MockState>) -> Response {
    match state.behavior.cors_origin {
        Some(origin) => (
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, origin),
                (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            ],
            "",
        )
            .into_response(),
        None => StatusCode::OK.into_response(),
    }
}

async fn create_status(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    if let Some(text) = state.behavior.raw_body {
        return raw(text);
    }
    if let Some(record) = &state.behavior.record_override {
        return Json(record.clone()).into_response();
    }

    let id = {
        let mut created = state.created.lock().unwrap();
        *created += 1;
        format!("rec-{}", *created)
    };

    let client_name = match &state.behavior.echo_override {
        Some(name) => Value::String(name.clone()),
        None => body["client_name"].clone(),
    };

    let mut record = json!({
        "id": id,
        "client_name": client_name,
        "timestamp": "2024-01-01T00:00:00Z",
    });
    if state.behavior.omit_timestamp {
        if let Some(fields) = record.as_object_mut() {
            fields.remove("timestamp");
        }
    }

    if state.behavior.persist {
        state.records.lock().unwrap().push(record.clone());
    }
    Json(record).into_response()
}

async fn list_status(State(state): State<MockState>) -> Response {
    if let Some(text) = state.behavior.raw_body {
        return raw(text);
    }
    if let Some(body) = &state.behavior.list_body {
        return Json(body.clone()).into_response();
    }
    Json(Value::Array(state.records.lock().unwrap().clone())).into_response()
}
