//! HttpStageRunner -- concrete [`StageRunner`] over the runner's HTTP API.
//!
//! Endpoints (relative to the configured base URL):
//! - `POST /v1/stages/run` with a JSON `StageRequest`, answering a `StageResult`
//! - `GET /health`, answering `{"status": ...}`
//!
//! Transport failures and HTTP status codes are classified onto
//! [`StageError`] so the dispatcher can decide whether to retry:
//!
//! | condition                        | error               |
//! |----------------------------------|---------------------|
//! | connect/send failure, 502, 503   | `Unavailable`       |
//! | 429                              | `ResourceExhausted` |
//! | 409                              | `Aborted`           |
//! | client timeout, 504              | `DeadlineExceeded`  |
//! | undecodable body                 | `InvalidResponse`   |
//! | any other non-2xx                | `Failed`            |

use std::time::Duration;

use reqwest::StatusCode;
use tessera_core::stage::StageRunner;
use tessera_types::error::StageError;
use tessera_types::stage::{HealthResponse, StageRequest, StageResult};

/// Stage runner reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStageRunner {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStageRunner {
    const RUN_PATH: &'static str = "/v1/stages/run";
    const HEALTH_PATH: &'static str = "/health";

    /// Create a runner client for `base_url` (e.g. `http://stage-sampler:9091`).
    ///
    /// No overall request timeout is set here; the dispatcher bounds each
    /// attempt itself.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StageError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| StageError::InvalidResponse(format!("failed to parse response: {e}")))
    }
}

impl StageRunner for HttpStageRunner {
    async fn run_stage(&self, request: &StageRequest) -> Result<StageResult, StageError> {
        tracing::debug!(stage_id = %request.stage_id, node_type = %request.node_type, "sending stage request");

        let response = self
            .client
            .post(self.url(Self::RUN_PATH))
            .json(request)
            .send()
            .await
            .map_err(classify_transport)?;

        Self::decode(response).await
    }

    async fn health(&self) -> Result<HealthResponse, StageError> {
        let response = self
            .client
            .get(self.url(Self::HEALTH_PATH))
            .send()
            .await
            .map_err(classify_transport)?;

        Self::decode(response).await
    }
}

/// Map a non-success HTTP status onto a stage error.
pub fn classify_status(status: StatusCode, body: &str) -> StageError {
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("HTTP {status}: {}", body.trim())
    };
    match status {
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => StageError::Unavailable(detail),
        StatusCode::TOO_MANY_REQUESTS => StageError::ResourceExhausted(detail),
        StatusCode::CONFLICT => StageError::Aborted(detail),
        StatusCode::GATEWAY_TIMEOUT => StageError::DeadlineExceeded,
        _ => StageError::Failed(detail),
    }
}

fn classify_transport(err: reqwest::Error) -> StageError {
    if err.is_timeout() {
        StageError::DeadlineExceeded
    } else if err.is_decode() {
        StageError::InvalidResponse(err.to_string())
    } else {
        StageError::Unavailable(err.to_string())
    }
}
