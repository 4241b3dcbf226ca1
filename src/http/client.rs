//! HTTP client for backend verification
//!
//! Provides a thin request/response layer over reqwest that keeps transport
//! failures distinguishable from HTTP-level outcomes.

use anyhow::{Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client, Method,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// HTTP client for endpoint checks
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Option<String>,
    default_headers: HeaderMap,
    timeout_secs: u64,
}

impl HttpClient {
    /// Create client with custom timeout
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: None,
            default_headers: HeaderMap::new(),
            timeout_secs,
        })
    }

    /// Set base URL for requests
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Add default header
    pub fn default_header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("Invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("Invalid header value")?;
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Build full URL
    fn build_url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) => {
                if path.starts_with("http://") || path.starts_with("https://") {
                    path.to_string()
                } else {
                    format!("{}{}", base.trim_end_matches('/'), path)
                }
            }
            None => path.to_string(),
        }
    }

    /// Send HTTP request
    ///
    /// Every transport-level failure comes back as an [`HttpError`] wrapped in
    /// `anyhow`; any HTTP status, including 4xx/5xx, is a successful response.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.build_url(&request.url);
        debug!("Sending {} request to {}", request.method, url);

        let method =
            Method::from_bytes(request.method.as_bytes()).context("Invalid HTTP method")?;

        let parsed = reqwest::Url::parse(&url).map_err(|_| HttpError::InvalidUrl(url.clone()))?;
        let mut req_builder = self.client.request(method, parsed);

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.clone());
        }

        let timeout_secs = match request.timeout_secs {
            Some(secs) => {
                req_builder = req_builder.timeout(Duration::from_secs(secs));
                secs
            }
            None => self.timeout_secs,
        };

        let start = std::time::Instant::now();

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(timeout_secs)
            } else if e.is_connect() {
                HttpError::ConnectionRefused(url.clone())
            } else {
                HttpError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();

        let mut response_headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                response_headers.insert(key.to_string(), v.to_string());
            }
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(timeout_secs)
            } else {
                HttpError::RequestFailed(format!("Failed to read response body: {e}"))
            }
        })?;

        let duration_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            duration_ms
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            headers: response_headers,
            body,
            duration_ms,
        })
    }

    /// Convenience method for GET request
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send(HttpRequest::get(url)).await
    }

    /// POST a JSON-serialized body
    pub async fn post_json<T: Serialize>(&self, url: &str, body: &T) -> Result<HttpResponse> {
        let body = serde_json::to_string(body).context("Failed to serialize request body")?;
        self.send(
            HttpRequest::post(url)
                .header(CONTENT_TYPE.as_str(), "application/json")
                .body(body),
        )
        .await
    }

    /// Convenience method for OPTIONS request
    pub async fn options(&self, url: &str) -> Result<HttpResponse> {
        self.send(HttpRequest::options(url)).await
    }
}

/// HTTP request builder
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            timeout_secs: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    pub fn options(url: impl Into<String>) -> Self {
        Self::new("OPTIONS", url)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Override the client timeout for this request only
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// HTTP response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }

    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_str(&self.body).context("Response body is not valid JSON")
    }
}
