pub mod apply;
pub mod config;
pub mod jobs;
pub mod post;
pub mod status;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use jobboard_cache::SnapshotCache;
use jobboard_client::{JobBoardClient, NoAuth, StaticToken, TokenSource};
use jobboard_core::{JobBoard, JobPosting, JobQuery, JobStore, NoticeLevel, ValidationErrors, JOBS_SNAPSHOT};
use tracing::warn;

use crate::config::{ClientConfig, API_URL_ENV};

/// Resolved settings shared by every command.
pub struct Context {
    pub config: ClientConfig,
    pub server: String,
    pub json: bool,
}

impl Context {
    pub fn load(config_path: &Path, server_flag: Option<&str>, json: bool) -> Result<Self> {
        let config = ClientConfig::load(config_path)?;
        let server = config.server_url(server_flag, std::env::var(API_URL_ENV).ok());
        Ok(Self { config, server, json })
    }

    pub fn client(&self) -> JobBoardClient {
        let token: Arc<dyn TokenSource> = if self.config.token.is_empty() {
            Arc::new(NoAuth)
        } else {
            Arc::new(StaticToken::new(self.config.token.clone()))
        };
        JobBoardClient::new(self.server.as_str(), token)
    }

    pub fn query(&self, page: u32) -> JobQuery {
        JobQuery {
            page: page.max(1),
            limit: self.config.page_size,
            ..JobQuery::default()
        }
    }

    /// Board over the cached snapshot (empty when there is none), wired to
    /// the backend and the cache.
    pub fn board(&self) -> Result<JobBoard> {
        let cache = SnapshotCache::open(&self.config.cache_file())?;
        let jobs = match cache.load::<Vec<JobPosting>>(JOBS_SNAPSHOT) {
            Ok(Some(snapshot)) => snapshot.value,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable job snapshot");
                Vec::new()
            }
        };
        let store = Arc::new(JobStore::with_jobs(jobs));
        Ok(JobBoard::new(store)
            .with_backend(Arc::new(self.client()))
            .with_cache(cache))
    }
}

/// Look up a typed id in the cached collection, loading from the backend
/// when it is not there yet. Backend ids win over local ones.
pub async fn find_job(ctx: &Context, board: &JobBoard, raw: &str) -> Result<JobPosting> {
    if let Some(job) = lookup(board, raw) {
        return Ok(job);
    }
    // The failure is reported through notices; the lookup below decides.
    let _ = board.load(&ctx.query(1)).await;
    report(board);
    lookup(board, raw).ok_or_else(|| anyhow::anyhow!("Job {} not found.", raw.trim()))
}

fn lookup(board: &JobBoard, raw: &str) -> Option<JobPosting> {
    let id = board.store().resolve(raw)?;
    board.get(&id)
}

/// Print queued notices to stderr.
pub fn report(board: &JobBoard) {
    for notice in board.drain_notices() {
        match notice.level {
            NoticeLevel::Info => eprintln!("{}: {}", notice.title, notice.message),
            NoticeLevel::Error => eprintln!("error: {}: {}", notice.title, notice.message),
        }
    }
}

pub fn print_field_errors(errs: &ValidationErrors) {
    for (field, message) in errs.iter() {
        eprintln!("  {:24} {}", field, message);
    }
}

/// Truncate to `width` characters, marking the cut with `~`.
pub fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}
