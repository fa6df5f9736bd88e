//! `jobboard jobs`, `show` and `like`.

use anyhow::Result;
use jobboard_core::{FilterSpec, JobPosting, JobType, JobTypeFilter, LocationFilter, Restored, SalaryRange};
use tracing::debug;

use super::{clip, find_job, report, Context};

pub fn filter_from_args(search: &str, location: &str, job_type: &str, min: f64, max: f64) -> FilterSpec {
    FilterSpec {
        search: search.to_string(),
        location: LocationFilter::parse(location),
        job_type: JobTypeFilter::parse(job_type),
        salary: SalaryRange::new(min, max),
    }
}

/// Warning for a `--type` value outside the known set. Such a filter still
/// applies, matching postings that carry the same free-form type.
pub fn job_type_hint(filter: &JobTypeFilter) -> Option<String> {
    let JobTypeFilter::Only(JobType::Other(raw)) = filter else {
        return None;
    };
    let known = JobType::KNOWN.map(|t| t.as_str().to_string()).join(", ");
    Some(format!("Unknown job type \"{}\"; known types: {}.", raw, known))
}

/// Load (or restore) the collection and print the filtered listing.
pub async fn list(ctx: &Context, filter: FilterSpec, page: u32, offline: bool) -> Result<()> {
    let board = ctx.board()?;
    if offline {
        match board.restore() {
            Restored::Seed => eprintln!("No cached jobs; showing sample listings."),
            restored => debug!(?restored, "offline listing"),
        }
    } else if let Err(e) = board.load(&ctx.query(page)).await {
        debug!(error = %e, "listing fallback jobs");
    }
    report(&board);

    if let Some(hint) = job_type_hint(&filter.job_type) {
        eprintln!("{hint}");
    }
    board.set_filter(filter);
    let jobs = board.listing();
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&*jobs)?);
        return Ok(());
    }

    if jobs.is_empty() {
        println!("No jobs found. Try adjusting your filters.");
        return Ok(());
    }
    print_table(&jobs);
    println!();
    println!("{}", board.summary());
    Ok(())
}

fn print_table(jobs: &[JobPosting]) {
    println!(
        "{:12} {:30} {:16} {:12} {:11} {:16} {:8} {:>6}",
        "ID", "TITLE", "COMPANY", "LOCATION", "TYPE", "SALARY", "POSTED", "LIKES"
    );
    for job in jobs {
        let likes = if job.is_liked {
            format!("*{}", job.likes_count)
        } else {
            job.likes_count.to_string()
        };
        println!(
            "{:12} {:30} {:16} {:12} {:11} {:16} {:8} {:>6}",
            clip(&job.id.to_string(), 12),
            clip(&job.title, 30),
            clip(&job.company, 16),
            clip(&job.location, 12),
            clip(job.job_type.as_str(), 11),
            clip(job.compensation.display(), 16),
            clip(&job.posted_time, 8),
            likes
        );
    }
}

pub async fn show(ctx: &Context, id: &str) -> Result<()> {
    let board = ctx.board()?;
    let job = find_job(ctx, &board, id).await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&job)?);
        return Ok(());
    }

    println!("{} at {}", job.title, job.company);
    println!("ID:         {}", job.id);
    println!("Status:     {}", job.status);
    println!("Location:   {}", job.location);
    println!("Type:       {}", job.job_type);
    println!("Experience: {}", job.experience);
    println!("Salary:     {}", job.compensation.display());
    println!("Posted:     {}", job.posted_time);
    if let Some(deadline) = job.application_deadline {
        println!("Apply by:   {}", deadline.format("%Y-%m-%d"));
    }
    println!(
        "Likes:      {}{}",
        job.likes_count,
        if job.is_liked { " (liked)" } else { "" }
    );
    if !job.description.is_empty() {
        println!();
        println!("{}", job.description);
    }
    for (heading, text) in [("Requirements", &job.requirements), ("Responsibilities", &job.responsibilities)] {
        if let Some(text) = text {
            println!();
            println!("{heading}:");
            println!("{text}");
        }
    }
    Ok(())
}

/// Toggle the like and print the resulting state.
pub async fn like(ctx: &Context, id: &str) -> Result<()> {
    let board = ctx.board()?;
    let id = find_job(ctx, &board, id).await?.id;

    let result = board.toggle_like(&id).await;
    report(&board);
    let state = result?.ok_or_else(|| anyhow::anyhow!("Job {} not found.", id))?;
    if let Err(e) = board.persist() {
        debug!(error = %e, "could not save job snapshot");
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!(
            "{} {} ({} likes)",
            if state.is_liked { "Liked" } else { "Unliked" },
            id,
            state.likes_count
        );
    }
    Ok(())
}
