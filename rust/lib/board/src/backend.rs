//! Seam between the board and the external job backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BackendError;
use crate::form::Application;
use crate::model::LikeState;

/// Query for one page of the job list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQuery {
    pub page: u32,
    pub limit: u32,
    /// Backend status filter, e.g. `"open"`.
    pub status: Option<String>,
    pub job_type: Option<String>,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 50,
            status: None,
            job_type: None,
        }
    }
}

/// Backend confirmation of a submitted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationReceipt {
    pub message: String,
    pub application_id: Option<String>,
}

/// Persistence, engagement and application endpoints of the backend.
///
/// `list_jobs` returns the raw response body. Envelopes differ between
/// backend versions; the board accepts any of them.
#[async_trait]
pub trait JobBackend: Send + Sync + 'static {
    async fn list_jobs(&self, query: &JobQuery) -> Result<Value, BackendError>;

    async fn like(&self, job_id: &str) -> Result<LikeState, BackendError>;

    async fn unlike(&self, job_id: &str) -> Result<LikeState, BackendError>;

    async fn submit_application(&self, application: &Application) -> Result<ApplicationReceipt, BackendError>;
}
