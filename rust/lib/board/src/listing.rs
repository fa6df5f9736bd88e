use std::sync::{Arc, Mutex, PoisonError};

use crate::filter::FilterSpec;
use crate::model::JobPosting;
use crate::store::JobStore;

/// Memoized filtered view over a [`JobStore`].
///
/// The cached result is keyed on the store version and the filter spec and
/// is only recomputed when either changes.
#[derive(Default)]
pub struct Listing {
    memo: Mutex<Option<Memo>>,
}

struct Memo {
    version: u64,
    spec: FilterSpec,
    jobs: Arc<Vec<JobPosting>>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self, store: &JobStore, spec: &FilterSpec) -> Arc<Vec<JobPosting>> {
        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        let version = store.version();
        if let Some(m) = memo.as_ref() {
            if m.version == version && &m.spec == spec {
                return m.jobs.clone();
            }
        }

        let (version, jobs) = store.snapshot();
        let jobs = Arc::new(spec.apply(&jobs));
        *memo = Some(Memo {
            version,
            spec: spec.clone(),
            jobs: jobs.clone(),
        });
        jobs
    }
}
