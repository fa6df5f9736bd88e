use std::collections::BTreeMap;
use std::fmt;

use jobboard_cache::CacheError;
use thiserror::Error;

use crate::model::JobId;

// ── Validation ──────────────────────────────────────────────────────

/// Per-field validation messages, keyed by form field name.
///
/// Ordered by field name so messages render in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when no field failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ── Backend ─────────────────────────────────────────────────────────

/// Failure talking to the external job backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// Non-success HTTP status; `message` is the server's human-readable text.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("decode: {0}")]
    Decode(String),

    #[error("no backend configured")]
    Unavailable,
}

// ── Board ───────────────────────────────────────────────────────────

/// Error returned by job board operations.
///
/// None of these are fatal: the board keeps its last good state and queues a
/// notice before returning any of them.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Backend answered, but not with anything that looks like job data.
    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("job not found: {0}")]
    NotFound(JobId),

    #[error("cache: {0}")]
    Cache(#[from] CacheError),
}
