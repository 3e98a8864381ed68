//! Analysis backend client.
//!
//! `AnalysisBackend` abstracts over how the analysis service is reached:
//! - `HttpBackend`: the real `POST /api/analyze` endpoint
//! - `MockBackend`: canned responses for tests and offline demos

pub mod http;
pub mod models;

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

pub use http::HttpBackend;
pub use models::{AnalysisRequest, AnalysisResult, SceneData, SceneEmotion, TopEmotion};

/// Shown when the backend gives us nothing better.
pub const GENERIC_FAILURE: &str = "An error occurred during analysis";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// Non-success HTTP status. `detail` is the backend's own message, if any.
    #[error("backend returned HTTP {status}{}", detail_suffix(.detail))]
    Rejected { status: u16, detail: Option<String> },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("response decode error: {0}")]
    Decode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl BackendError {
    /// Message to show the user: the backend's `detail` verbatim when present.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Run one analysis. No retries.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, BackendError>;

    /// Liveness probe.
    async fn health(&self) -> Result<(), BackendError>;
}

/// Backend returning a fixed outcome and recording every request it sees.
pub struct MockBackend {
    outcome: Result<AnalysisResult, BackendError>,
    calls: AtomicUsize,
    requests: Mutex<Vec<AnalysisRequest>>,
}

impl MockBackend {
    pub fn succeeding(result: AnalysisResult) -> Self {
        Self::with_outcome(Ok(result))
    }

    pub fn failing(error: BackendError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<AnalysisResult, BackendError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of `analyze` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received, oldest first.
    pub fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }
        self.outcome.clone()
    }

    async fn health(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
