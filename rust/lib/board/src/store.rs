use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::model::{JobDraft, JobId, JobPatch, JobPosting, LikeState};

/// Unique identifier for a store subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// What changed in the store. Delivered to subscribers after the write lock
/// has been released, so handlers may read the store freely.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Added(JobId),
    Updated(JobId),
    Deleted(JobId),
    LikeToggled { id: JobId, state: LikeState },
    /// Backend-confirmed engagement replaced the optimistic value.
    LikeReconciled { id: JobId, state: LikeState },
    /// The whole collection was swapped (load, cache restore, reset).
    Replaced { count: usize },
}

/// Callback type for store change notifications.
pub type ChangeHandler = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Result of an optimistic like toggle: the new engagement and the revision
/// stamped on the record by this write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggled {
    pub state: LikeState,
    pub revision: u64,
}

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    handler: ChangeHandler,
}

#[derive(Default)]
struct StoreState {
    /// Postings in display order, most recent first.
    jobs: Vec<JobPosting>,
    /// Clock value of the last local write per id. Entries outlive deletes
    /// and act as tombstones.
    revisions: HashMap<JobId, u64>,
    /// Sample records standing in until the first successful load.
    placeholders: HashSet<JobId>,
    clock: u64,
}

impl StoreState {
    fn position(&self, id: &JobId) -> Option<usize> {
        self.jobs.iter().position(|j| &j.id == id)
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn stamp(&mut self, id: &JobId) -> u64 {
        let rev = self.tick();
        self.revisions.insert(id.clone(), rev);
        rev
    }

    fn next_local_id(&self) -> u64 {
        self.jobs
            .iter()
            .filter_map(|j| match j.id {
                JobId::Local(n) => Some(n),
                JobId::Remote(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// The authoritative in-memory collection of job postings.
///
/// Every mutation goes through one `RwLock`, so concurrent callers never lose
/// an update. Each write advances a logical clock and stamps the touched
/// record's revision; responses that were issued before a newer local write
/// are detected by comparing revisions.
///
/// - `add(draft)` prepends a posting with a fresh local id.
/// - `update(id, patch)` / `delete(id)` are no-ops for unknown ids.
/// - `toggle_like(id)` flips the like flag and moves the counter by one.
/// - `merge_remote(jobs, issued_at)` folds a backend load into the collection.
/// - `subscribe(handler)` registers a change handler.
pub struct JobStore {
    state: RwLock<StoreState>,
    handlers: RwLock<Vec<HandlerEntry>>,
    next_sub: AtomicU64,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_jobs(Vec::new())
    }

    /// Create a store holding `jobs` in the given order.
    pub fn with_jobs(jobs: Vec<JobPosting>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                jobs,
                ..Default::default()
            }),
            handlers: RwLock::new(Vec::new()),
            next_sub: AtomicU64::new(1),
        }
    }

    /// Create a store pre-seeded with the sample catalogue. The samples are
    /// placeholders: the first successful merge drops them.
    pub fn seeded() -> Self {
        let store = Self::new();
        store.fill_placeholders(crate::sample::seed_jobs(Utc::now()));
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Add a posting created in this session.
    pub fn add(&self, draft: JobDraft) -> JobPosting {
        self.add_at(draft, Utc::now())
    }

    pub fn add_at(&self, draft: JobDraft, now: DateTime<Utc>) -> JobPosting {
        let job = {
            let mut state = self.write();
            let id = JobId::Local(state.next_local_id());
            let job = draft.into_posting(id, now);
            state.stamp(&job.id);
            state.jobs.insert(0, job.clone());
            job
        };
        debug!(id = %job.id, title = %job.title, status = %job.status, "job added");
        self.notify(&StoreEvent::Added(job.id.clone()));
        job
    }

    /// Merge `patch` into the posting with `id`. Returns the updated posting,
    /// or `None` when no such posting exists.
    pub fn update(&self, id: &JobId, patch: JobPatch) -> Option<JobPosting> {
        let job = {
            let mut state = self.write();
            let idx = state.position(id)?;
            patch.apply_to(&mut state.jobs[idx]);
            state.stamp(id);
            state.jobs[idx].clone()
        };
        debug!(%id, "job updated");
        self.notify(&StoreEvent::Updated(id.clone()));
        Some(job)
    }

    /// Remove the posting with `id`, leaving a tombstone revision behind.
    pub fn delete(&self, id: &JobId) -> Option<JobPosting> {
        let removed = {
            let mut state = self.write();
            let idx = state.position(id)?;
            let removed = state.jobs.remove(idx);
            state.placeholders.remove(id);
            state.stamp(id);
            removed
        };
        debug!(%id, "job deleted");
        self.notify(&StoreEvent::Deleted(id.clone()));
        Some(removed)
    }

    /// Flip the like flag and move the counter by exactly one.
    pub fn toggle_like(&self, id: &JobId) -> Option<Toggled> {
        let toggled = {
            let mut state = self.write();
            let idx = state.position(id)?;
            let job = &mut state.jobs[idx];
            flip_like(job);
            let like = job.like_state();
            Toggled {
                state: like,
                revision: state.stamp(id),
            }
        };
        debug!(%id, liked = toggled.state.is_liked, count = toggled.state.likes_count, "like toggled");
        self.notify(&StoreEvent::LikeToggled {
            id: id.clone(),
            state: toggled.state,
        });
        Some(toggled)
    }

    /// Apply backend-confirmed engagement, but only if nothing touched the
    /// record since the write stamped `issued_at`. Returns whether it applied.
    pub fn reconcile_like(&self, id: &JobId, remote: LikeState, issued_at: u64) -> bool {
        {
            let mut state = self.write();
            if state.revisions.get(id) != Some(&issued_at) {
                debug!(%id, issued_at, "stale like response ignored");
                return false;
            }
            let Some(idx) = state.position(id) else {
                return false;
            };
            let job = &mut state.jobs[idx];
            job.is_liked = remote.is_liked;
            job.likes_count = remote.likes_count;
            state.tick();
        }
        self.notify(&StoreEvent::LikeReconciled {
            id: id.clone(),
            state: remote,
        });
        true
    }

    /// Undo an optimistic toggle stamped `issued_at`, unless a newer local
    /// write already superseded it.
    pub fn revert_like(&self, id: &JobId, issued_at: u64) -> Option<LikeState> {
        let like = {
            let mut state = self.write();
            if state.revisions.get(id) != Some(&issued_at) {
                return None;
            }
            let idx = state.position(id)?;
            let job = &mut state.jobs[idx];
            flip_like(job);
            let like = job.like_state();
            state.stamp(id);
            like
        };
        debug!(%id, "optimistic like reverted");
        self.notify(&StoreEvent::LikeToggled {
            id: id.clone(),
            state: like,
        });
        Some(like)
    }

    /// Fold a backend load issued at clock `issued_at` into the collection.
    ///
    /// Local-id postings stay in front. A remote record whose local revision
    /// (or tombstone) is newer than `issued_at` keeps its local state, and a
    /// record deleted after the load was issued stays deleted. Every other
    /// remote record replaces its local copy. Placeholders are dropped.
    /// Returns the resulting length.
    pub fn merge_remote(&self, remote: Vec<JobPosting>, issued_at: u64) -> usize {
        let count = {
            let mut guard = self.write();
            let state = &mut *guard;
            let revisions = &state.revisions;
            let newer = |id: &JobId| revisions.get(id).is_some_and(|&rev| rev > issued_at);
            let placeholders = std::mem::take(&mut state.placeholders);

            let mut local: Vec<JobPosting> = Vec::new();
            let mut held: HashMap<JobId, JobPosting> = HashMap::new();
            for job in state.jobs.drain(..) {
                if placeholders.contains(&job.id) {
                    continue;
                }
                if job.id.is_local() {
                    local.push(job);
                } else if newer(&job.id) {
                    held.insert(job.id.clone(), job);
                }
            }

            let mut seen: HashSet<JobId> = HashSet::new();
            let mut merged = local;
            for job in remote {
                if job.id.is_local() || !seen.insert(job.id.clone()) {
                    continue;
                }
                if newer(&job.id) {
                    if let Some(kept) = held.remove(&job.id) {
                        merged.push(kept);
                    }
                } else {
                    merged.push(job);
                }
            }
            // Locally edited records missing from this page survive.
            merged.extend(held.into_values());

            state.jobs = merged;
            state.tick();
            state.jobs.len()
        };
        debug!(count, issued_at, "remote jobs merged");
        self.notify(&StoreEvent::Replaced { count });
        count
    }

    /// Swap in a whole collection (cache restore).
    pub fn replace_all(&self, jobs: Vec<JobPosting>) {
        let count = jobs.len();
        {
            let mut state = self.write();
            state.jobs = jobs;
            state.placeholders.clear();
            state.tick();
        }
        self.notify(&StoreEvent::Replaced { count });
    }

    /// Swap in stand-in records. They are listed like any other posting but
    /// never persisted, and the next successful merge drops them.
    pub fn fill_placeholders(&self, jobs: Vec<JobPosting>) {
        let count = jobs.len();
        {
            let mut state = self.write();
            state.placeholders = jobs.iter().map(|j| j.id.clone()).collect();
            state.jobs = jobs;
            state.tick();
        }
        debug!(count, "placeholder jobs installed");
        self.notify(&StoreEvent::Replaced { count });
    }

    /// Drop every posting and revision. The clock keeps running.
    pub fn clear(&self) {
        {
            let mut state = self.write();
            state.jobs.clear();
            state.revisions.clear();
            state.placeholders.clear();
            state.tick();
        }
        self.notify(&StoreEvent::Replaced { count: 0 });
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn get(&self, id: &JobId) -> Option<JobPosting> {
        let state = self.read();
        state.position(id).map(|idx| state.jobs[idx].clone())
    }

    /// All postings in display order.
    pub fn jobs(&self) -> Vec<JobPosting> {
        self.read().jobs.clone()
    }

    /// Postings worth keeping across sessions: everything but placeholders.
    pub fn persistable(&self) -> Vec<JobPosting> {
        let state = self.read();
        state
            .jobs
            .iter()
            .filter(|j| !state.placeholders.contains(&j.id))
            .cloned()
            .collect()
    }

    /// Resolve a user-typed id. Backend ids are tried first, so a digit-only
    /// backend id wins over a local posting with the same number.
    pub fn resolve(&self, raw: &str) -> Option<JobId> {
        let raw = raw.trim();
        let state = self.read();
        let remote = JobId::Remote(raw.to_string());
        if state.position(&remote).is_some() {
            return Some(remote);
        }
        let local = JobId::Local(raw.parse().ok()?);
        state.position(&local).map(|_| local)
    }

    /// Postings together with the version they were read at.
    pub fn snapshot(&self) -> (u64, Vec<JobPosting>) {
        let state = self.read();
        (state.clock, state.jobs.clone())
    }

    pub fn len(&self) -> usize {
        self.read().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current clock. Changes on every write.
    pub fn version(&self) -> u64 {
        self.read().clock
    }

    /// Clock value of the last local write to `id`, including deletes.
    pub fn revision(&self, id: &JobId) -> Option<u64> {
        self.read().revisions.get(id).copied()
    }

    // ── Subscriptions ───────────────────────────────────────────────

    /// Register a handler called synchronously after every change.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_sub.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(HandlerEntry {
                id,
                handler: Arc::new(handler),
            });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|entry| entry.id != id);
    }

    fn notify(&self, event: &StoreEvent) {
        let entries = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for entry in entries {
            (entry.handler)(event);
        }
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

fn flip_like(job: &mut JobPosting) {
    if job.is_liked {
        job.is_liked = false;
        job.likes_count = job.likes_count.saturating_sub(1);
    } else {
        job.is_liked = true;
        job.likes_count = job.likes_count.saturating_add(1);
    }
}
