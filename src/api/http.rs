use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{AnalysisBackend, AnalysisRequest, AnalysisResult, BackendError};
use crate::config::ApiConfig;

/// Error body of a failed request. FastAPI sends a string for handled errors
/// and a list for validation errors; only the string form is user-facing.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: Option<String>,
}

/// Talks to the analysis service over HTTP.
///
/// ureq is blocking, so each call runs on tokio's blocking pool.
#[derive(Clone)]
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
    body_limit: u64,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> Self {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(timeout)
            // Non-2xx bodies carry the `detail` we want to show
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            body_limit: config.max_body_mb.max(1).saturating_mul(1024 * 1024),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn analyze_blocking(&self, request: &AnalysisRequest) -> Result<AnalysisResult, BackendError> {
        let url = format!("{}/api/analyze", self.base_url);
        log::debug!("POST {url} ({})", request.describe());

        let mut response = self
            .agent
            .post(&url)
            .send_json(request)
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .body_mut()
                .read_json::<ErrorBody>()
                .ok()
                .and_then(|b| b.detail)
                .and_then(|d| d.as_str().map(str::to_string));
            log::debug!("  HTTP {} detail={:?}", status.as_u16(), detail);
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_json::<AnalysisResult>()
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn health_blocking(&self) -> Result<(), BackendError> {
        let url = format!("{}/api/health", self.base_url);
        log::debug!("GET {url}");

        let mut response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                detail: None,
            });
        }

        let body: HealthBody = response
            .body_mut()
            .read_json()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        match body.status.as_deref() {
            Some("healthy") => Ok(()),
            other => Err(BackendError::Decode(format!(
                "unexpected health status: {}",
                other.unwrap_or("<missing>")
            ))),
        }
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, BackendError> {
        let this = self.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || this.analyze_blocking(&request))
            .await
            .map_err(|e| BackendError::Transport(format!("request task failed: {e}")))?
    }

    async fn health(&self) -> Result<(), BackendError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.health_blocking())
            .await
            .map_err(|e| BackendError::Transport(format!("health task failed: {e}")))?
    }
}
