use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use jobboard_cache::SnapshotCache;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::{ApplicationReceipt, JobBackend, JobQuery};
use crate::error::{BackendError, BoardError};
use crate::filter::FilterSpec;
use crate::form::{ApplicationForm, JobForm};
use crate::listing::Listing;
use crate::model::{JobId, JobPosting, LikeState, PostingStatus};
use crate::remote;
use crate::sample::seed_jobs;
use crate::store::JobStore;

/// Cache key of the last-known-good job collection.
pub const JOBS_SNAPSHOT: &str = "jobs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-visible notification produced by a board operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

/// Where the collection came from after a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restored {
    /// The store already held jobs and was left alone.
    Kept,
    Cache { saved_at: DateTime<Utc> },
    Seed,
}

/// The job board state container.
///
/// Wraps the [`JobStore`] with everything a front end drives: filter state
/// and its memoized listing, backend sync for loads, likes and applications,
/// the last-known-good cache, and a queue of notices.
///
/// Every async operation records the store revision it started from, so a
/// response that resolves after a newer local edit never overwrites it.
pub struct JobBoard {
    store: Arc<JobStore>,
    backend: Option<Arc<dyn JobBackend>>,
    cache: Option<SnapshotCache>,
    filter: RwLock<FilterSpec>,
    listing: Listing,
    notices: Mutex<Vec<Notice>>,
}

impl JobBoard {
    pub fn new(store: Arc<JobStore>) -> Self {
        Self {
            store,
            backend: None,
            cache: None,
            filter: RwLock::new(FilterSpec::default()),
            listing: Listing::new(),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn JobBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_cache(mut self, cache: SnapshotCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    pub fn get(&self, id: &JobId) -> Option<JobPosting> {
        self.store.get(id)
    }

    // ====================================================================
    // Filtering
    // ====================================================================

    pub fn filter(&self) -> FilterSpec {
        self.filter.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_filter(&self, spec: FilterSpec) {
        *self.filter.write().unwrap_or_else(PoisonError::into_inner) = spec;
    }

    /// Edit the current filter in place.
    pub fn update_filter(&self, f: impl FnOnce(&mut FilterSpec)) {
        let mut spec = self.filter.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut spec);
    }

    /// Published postings passing the current filter, in collection order.
    pub fn listing(&self) -> Arc<Vec<JobPosting>> {
        self.listing.view(&self.store, &self.filter())
    }

    pub fn summary(&self) -> String {
        self.filter().summary(self.listing().len())
    }

    // ====================================================================
    // Posting
    // ====================================================================

    /// Validate the employer form and add the posting with `status`.
    pub fn create_posting(&self, form: &JobForm, status: PostingStatus) -> Result<JobPosting, BoardError> {
        let draft = match form.to_draft(status) {
            Ok(draft) => draft,
            Err(errs) => {
                let message = match status {
                    PostingStatus::Draft => "Please fill in at least the job title and company name.",
                    PostingStatus::Published => "Please fill in all required fields before publishing.",
                };
                self.notice(NoticeLevel::Error, "Missing Information", message);
                return Err(errs.into());
            }
        };

        let job = self.store.add(draft);
        match status {
            PostingStatus::Draft => self.notice(
                NoticeLevel::Info,
                "Draft Saved",
                "Your job posting has been saved as a draft.",
            ),
            PostingStatus::Published => self.notice(
                NoticeLevel::Info,
                "Job Published",
                "Your job posting has been published successfully!",
            ),
        }
        Ok(job)
    }

    // ====================================================================
    // Likes
    // ====================================================================

    /// Toggle the like optimistically, then sync remote postings with the
    /// backend.
    ///
    /// The backend's answer is applied only if the record was not written
    /// again meanwhile. On failure the optimistic toggle is reverted (unless
    /// superseded) and the error returned. Unknown ids yield `Ok(None)`.
    pub async fn toggle_like(&self, id: &JobId) -> Result<Option<LikeState>, BoardError> {
        let Some(toggled) = self.store.toggle_like(id) else {
            return Ok(None);
        };
        let liked = toggled.state.is_liked;

        let synced = match (&self.backend, id.as_remote()) {
            (Some(backend), Some(remote_id)) => {
                let result = if liked {
                    backend.like(remote_id).await
                } else {
                    backend.unlike(remote_id).await
                };
                Some(result)
            }
            _ => None,
        };

        match synced {
            Some(Err(e)) => {
                warn!(%id, error = %e, "like sync failed");
                self.store.revert_like(id, toggled.revision);
                self.notice(NoticeLevel::Error, "Like failed", e.to_string());
                return Err(e.into());
            }
            Some(Ok(server)) => {
                self.store.reconcile_like(id, server, toggled.revision);
            }
            None => {}
        }

        if liked {
            self.notice(NoticeLevel::Info, "Added to favorites", "Job saved to your favorites");
        } else {
            self.notice(NoticeLevel::Info, "Removed from favorites", "Job removed from your favorites");
        }
        Ok(self.store.get(id).map(|j| j.like_state()))
    }

    // ====================================================================
    // Load
    // ====================================================================

    /// Fetch a page of jobs from the backend and merge it into the store.
    ///
    /// Returns the number of records accepted from the response. On any
    /// failure the store keeps what it had (or falls back to the cached
    /// snapshot, then the seed catalogue, when empty), a notice is queued,
    /// and the error is returned.
    pub async fn load(&self, query: &JobQuery) -> Result<usize, BoardError> {
        let issued_at = self.store.version();
        let result = match &self.backend {
            Some(backend) => fetch(backend.as_ref(), query).await,
            None => Err(BackendError::Unavailable.into()),
        };

        match result {
            Ok(jobs) => {
                let fetched = jobs.len();
                let len = self.store.merge_remote(jobs, issued_at);
                info!(fetched, len, page = query.page, "jobs loaded");
                if let Err(e) = self.persist() {
                    warn!(error = %e, "could not save job snapshot");
                }
                Ok(fetched)
            }
            Err(e) => {
                warn!(error = %e, "job load failed");
                let restored = self.restore();
                debug!(?restored, "fallback after failed load");
                match &e {
                    BoardError::Shape(_) => self.notice(
                        NoticeLevel::Error,
                        "No data found",
                        "The server response did not contain any jobs.",
                    ),
                    _ => self.notice(NoticeLevel::Error, "Failed to load jobs", e.to_string()),
                }
                Err(e)
            }
        }
    }

    /// Fill an empty store from the cached snapshot, else the seed catalogue.
    /// Seeded records are placeholders until the next successful load.
    pub fn restore(&self) -> Restored {
        if !self.store.is_empty() {
            return Restored::Kept;
        }
        if let Some(cache) = &self.cache {
            match cache.load::<Vec<JobPosting>>(JOBS_SNAPSHOT) {
                Ok(Some(snapshot)) if !snapshot.value.is_empty() => {
                    info!(count = snapshot.value.len(), saved_at = %snapshot.saved_at, "restored cached jobs");
                    self.store.replace_all(snapshot.value);
                    return Restored::Cache {
                        saved_at: snapshot.saved_at,
                    };
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "cached job snapshot unreadable"),
            }
        }
        self.store.fill_placeholders(seed_jobs(Utc::now()));
        Restored::Seed
    }

    /// Write the current collection, minus placeholders, to the cache.
    /// `Ok(None)` without a cache.
    pub fn persist(&self) -> Result<Option<DateTime<Utc>>, BoardError> {
        let Some(cache) = &self.cache else {
            return Ok(None);
        };
        let saved_at = cache.save(JOBS_SNAPSHOT, &self.store.persistable())?;
        Ok(Some(saved_at))
    }

    // ====================================================================
    // Applications
    // ====================================================================

    pub async fn apply(&self, id: &JobId, form: ApplicationForm) -> Result<ApplicationReceipt, BoardError> {
        let Some(job) = self.store.get(id) else {
            self.notice(NoticeLevel::Error, "Application Failed", format!("Job {id} no longer exists."));
            return Err(BoardError::NotFound(id.clone()));
        };

        let application = match form.into_application(&job) {
            Ok(app) => app,
            Err(errs) => {
                self.notice(
                    NoticeLevel::Error,
                    "Please fill all required fields",
                    "Check the form for errors and try again",
                );
                return Err(errs.into());
            }
        };

        let result = match &self.backend {
            Some(backend) => backend.submit_application(&application).await,
            None => Err(BackendError::Unavailable),
        };
        match result {
            Ok(receipt) => {
                info!(job = %id, application = ?receipt.application_id, "application submitted");
                self.notice(
                    NoticeLevel::Info,
                    "Application Submitted Successfully!",
                    format!(
                        "Your application for {} at {} has been submitted. We'll get back to you soon.",
                        job.title, job.company
                    ),
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!(job = %id, error = %e, "application submission failed");
                self.notice(NoticeLevel::Error, "Submission Failed", e.to_string());
                Err(e.into())
            }
        }
    }

    // ====================================================================
    // Notices
    // ====================================================================

    fn notice(&self, level: NoticeLevel, title: &str, message: impl Into<String>) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notice {
                level,
                title: title.to_string(),
                message: message.into(),
            });
    }

    /// Take every queued notice, oldest first.
    pub fn drain_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

async fn fetch(backend: &dyn JobBackend, query: &JobQuery) -> Result<Vec<JobPosting>, BoardError> {
    let body = backend.list_jobs(query).await?;
    let page = remote::parse_job_page(&body)?;
    debug!(records = page.records.len(), total = page.total, page = page.page, "job page received");
    Ok(remote::transform_page(&page, Utc::now()))
}
