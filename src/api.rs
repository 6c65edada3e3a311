use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::protocol::{AnalysisPayload, ExecutionPayload};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const RETRY_BACKOFF_UNIT: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status}: {status_text}")]
    Status { status: u16, status_text: String },
    #[error("{0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Client errors (4xx) are the caller's fault and are never retried.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if (400..500).contains(status))
    }
}

// Timeouts and refused connections get the product's short messages, other
// transport failures keep reqwest's description.
fn from_transport(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Transport("Timeout".to_string())
    } else if err.is_connect() {
        ApiError::Transport("Error de conexión".to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

/// HTTP gateway to the evaluation server. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    backoff_unit: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<ApiClient, ApiError> {
        ApiClient::with_backoff(base_url, RETRY_BACKOFF_UNIT)
    }

    /// Same as [`ApiClient::new`] with a configurable retry backoff unit.
    pub fn with_backoff(base_url: &str, backoff_unit: Duration) -> Result<ApiClient, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(from_transport)?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            backoff_unit,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One request with the fixed timeout. Non-2xx statuses become
    /// [`ApiError::Status`], transport failures keep their own message.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{method} {url}");
        let mut builder = self.http.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let response = builder.send().await.map_err(from_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Repeats [`request`](ApiClient::request) up to `max_retries + 1` times
    /// with linear backoff (one unit after the first failure, two after the
    /// second, and so on). 4xx failures abort the loop immediately.
    pub async fn request_with_retry<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
        max_retries: u32,
    ) -> Result<T, ApiError> {
        let mut attempt = 0u32;
        loop {
            let err = match self.request(method.clone(), endpoint, body.clone()).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if err.is_client_error() || attempt >= max_retries {
                return Err(err);
            }
            let wait = self.backoff_unit * (attempt + 1);
            warn!("{endpoint} failed ({err}), retrying in {wait:?}");
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }

    /// Submits code for scoring.
    pub async fn evaluate(&self, code: &str) -> Result<AnalysisPayload, ApiError> {
        self.request(Method::POST, "/api/evaluar", Some(json!({ "codigo": code })))
            .await
    }

    /// Runs code on the server and returns its captured output.
    pub async fn execute(&self, code: &str) -> Result<ExecutionPayload, ApiError> {
        self.request(Method::POST, "/api/ejecutar", Some(json!({ "codigo": code })))
            .await
    }

    pub async fn list_examples(&self) -> Result<BTreeMap<String, String>, ApiError> {
        self.request(Method::GET, "/api/ejemplos", None).await
    }

    /// Example listing with the retry policy, for startup where the server
    /// may still be warming up.
    pub async fn fetch_examples(&self) -> Result<BTreeMap<String, String>, ApiError> {
        self.request_with_retry(Method::GET, "/api/ejemplos", None, DEFAULT_MAX_RETRIES)
            .await
    }

    /// Cheap reachability probe, a HEAD with a short timeout.
    pub async fn check_connection(&self) -> bool {
        let url = format!("{}/api/ejemplos", self.base_url);
        match self.http.head(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
