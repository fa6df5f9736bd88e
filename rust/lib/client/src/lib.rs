//! HTTP client for the job board backend.
//!
//! Authentication is handled by pluggable [`TokenSource`] implementations;
//! the client attaches a bearer token when the source yields one.
//!
//! ```ignore
//! use jobboard_client::{JobBoardClient, StaticToken};
//!
//! let client = JobBoardClient::new("http://localhost:3001", Arc::new(StaticToken::new(jwt)));
//! let body = client.list_jobs(&JobQuery::default()).await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use jobboard_core::{Application, ApplicationReceipt, BackendError, JobBackend, JobQuery, LikeState};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

// ── Error ───────────────────────────────────────────────────────────

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success status. `message` is taken from the body's `message` or
    /// `error` field when present.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("auth: {0}")]
    Auth(String),

    #[error("decode: {0}")]
    Decode(String),
}

impl From<ApiError> for BackendError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Server { status, message } => BackendError::Server { status, message },
            ApiError::Network(e) => BackendError::Network(e.to_string()),
            ApiError::Auth(m) => BackendError::Auth(m),
            ApiError::Decode(m) => BackendError::Decode(m),
        }
    }
}

// ── TokenSource ─────────────────────────────────────────────────────

/// Pluggable token provider, consulted before every request.
///
/// Returns `Ok(None)` to send the request without an Authorization header.
#[async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}

/// Anonymous requests.
pub struct NoAuth;

#[async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}

/// Bearer token obtained elsewhere (config file, environment).
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(Some(self.0.clone()))
    }
}

// ── Responses ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LikeResponse {
    #[serde(alias = "is_liked", rename = "isLiked")]
    is_liked: bool,
    #[serde(alias = "likes_count", rename = "likesCount", default)]
    likes_count: i64,
}

impl From<LikeResponse> for LikeState {
    fn from(r: LikeResponse) -> Self {
        LikeState {
            is_liked: r.is_liked,
            likes_count: r.likes_count.clamp(0, u32::MAX as i64) as u32,
        }
    }
}

/// Human-readable message from an error body: `message`, then `error`,
/// then the raw text.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(m) = v.get(key).and_then(Value::as_str) {
                if !m.trim().is_empty() {
                    return m.to_string();
                }
            }
        }
    }
    let text = body.trim();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        text.to_string()
    }
}

fn receipt_from(body: &Value) -> ApplicationReceipt {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Application submitted")
        .to_string();
    let id = ["applicationId", "application_id", "id"]
        .iter()
        .find_map(|k| body.get(*k))
        .or_else(|| body.get("application").and_then(|a| a.get("id")));
    let application_id = match id {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    ApplicationReceipt {
        message,
        application_id,
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Client for the `/api` endpoints of the job board backend.
pub struct JobBoardClient {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
}

impl JobBoardClient {
    pub fn new(base_url: impl Into<String>, token_source: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_source,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn like_url(&self, job_id: &str) -> String {
        self.url(&format!("/api/jobs/{job_id}/like"))
    }

    /// Attach the bearer token, if any.
    async fn authed(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, ApiError> {
        match self.token_source.token().await? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    async fn send<R: serde::de::DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> Result<R, ApiError> {
        let resp = self.authed(builder).await?.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = error_message(&body, status);
            debug!(status = status.as_u16(), %message, "request failed");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {e}")))
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<Value, ApiError> {
        self.send(self.http.get(self.url("/api/health"))).await
    }

    /// `GET /api/jobs`. The body is returned as-is; envelopes vary.
    pub async fn list_jobs(&self, query: &JobQuery) -> Result<Value, ApiError> {
        let mut params: Vec<(&str, String)> = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
            ("simple", "true".to_string()),
        ];
        if let Some(status) = &query.status {
            params.push(("status", status.clone()));
        }
        if let Some(job_type) = &query.job_type {
            params.push(("job_type", job_type.clone()));
        }
        let req = self.http.get(self.url("/api/jobs")).query(&params);
        self.send(req).await
    }

    /// `GET /api/jobs/{id}`.
    pub async fn get_job(&self, job_id: &str) -> Result<Value, ApiError> {
        self.send(self.http.get(self.url(&format!("/api/jobs/{job_id}"))))
            .await
    }

    /// `POST /api/jobs/{id}/like`.
    pub async fn like_job(&self, job_id: &str) -> Result<LikeState, ApiError> {
        let resp: LikeResponse = self.send(self.http.post(self.like_url(job_id))).await?;
        Ok(resp.into())
    }

    /// `DELETE /api/jobs/{id}/like`.
    pub async fn unlike_job(&self, job_id: &str) -> Result<LikeState, ApiError> {
        let resp: LikeResponse = self.send(self.http.delete(self.like_url(job_id))).await?;
        Ok(resp.into())
    }

    /// `GET /api/jobs/{id}/like`.
    pub async fn like_status(&self, job_id: &str) -> Result<LikeState, ApiError> {
        let resp: LikeResponse = self.send(self.http.get(self.like_url(job_id))).await?;
        Ok(resp.into())
    }

    /// `POST /api/applications` as multipart form data with the resume
    /// attached as `resume`.
    pub async fn submit_application(&self, application: &Application) -> Result<ApplicationReceipt, ApiError> {
        let mut form = Form::new();
        for (name, value) in application.fields() {
            form = form.text(name, value.to_string());
        }
        let resume = Part::bytes(application.resume.bytes.clone())
            .file_name(application.resume.file_name.clone())
            .mime_str(&application.resume.content_type)?;
        form = form.part("resume", resume);

        let req = self.http.post(self.url("/api/applications")).multipart(form);
        let body: Value = self.send(req).await?;
        Ok(receipt_from(&body))
    }
}

#[async_trait]
impl JobBackend for JobBoardClient {
    async fn list_jobs(&self, query: &JobQuery) -> Result<Value, BackendError> {
        Ok(JobBoardClient::list_jobs(self, query).await?)
    }

    async fn like(&self, job_id: &str) -> Result<LikeState, BackendError> {
        Ok(self.like_job(job_id).await?)
    }

    async fn unlike(&self, job_id: &str) -> Result<LikeState, BackendError> {
        Ok(self.unlike_job(job_id).await?)
    }

    async fn submit_application(&self, application: &Application) -> Result<ApplicationReceipt, BackendError> {
        Ok(JobBoardClient::submit_application(self, application).await?)
    }
}

#[cfg(test)]
mod tests;
