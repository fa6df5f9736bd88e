use anyhow::Result;
use jobboard_cache::SnapshotCache;
use jobboard_client::ApiError;
use jobboard_core::{JobPosting, JOBS_SNAPSHOT};
use serde_json::Value;

use super::Context;

/// Backend health and local cache summary.
pub async fn status(ctx: &Context) -> Result<()> {
    println!("Server:    {}", ctx.server);
    println!("Token:     {}", if ctx.config.token.is_empty() { "-" } else { "set" });

    let cache_file = ctx.config.cache_file();
    println!("Cache:     {}", cache_file.display());
    match SnapshotCache::open(&cache_file)?.load::<Vec<JobPosting>>(JOBS_SNAPSHOT) {
        Ok(Some(snapshot)) => println!(
            "Snapshot:  {} jobs, saved {}",
            snapshot.value.len(),
            snapshot.saved_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        Ok(None) => println!("Snapshot:  none"),
        Err(e) => println!("Snapshot:  unreadable ({})", e),
    }

    match ctx.client().health().await {
        Ok(body) => {
            let state = body.get("status").and_then(Value::as_str).unwrap_or("ok");
            println!("Status:    connected ({})", state);
        }
        Err(ApiError::Server { status, message }) => {
            println!("Status:    error ({}: {})", status, message);
        }
        Err(e) => {
            println!("Status:    disconnected ({})", e);
        }
    }
    Ok(())
}
