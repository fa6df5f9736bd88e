//! `jobboard post`: create a posting and keep it in the snapshot cache.

use anyhow::Result;
use jobboard_core::{BoardError, JobForm, JobPosting, PostingStatus};

use super::{print_field_errors, report, Context};

pub fn create(ctx: &Context, form: &JobForm, draft: bool) -> Result<()> {
    let job = create_posting(ctx, form, draft)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&job)?);
    } else {
        println!("Job {} saved ({}).", job.id, job.status);
        println!("  {} at {}", job.title, job.company);
        println!("  {} · {} · {}", job.location, job.job_type, job.compensation.display());
    }
    Ok(())
}

fn create_posting(ctx: &Context, form: &JobForm, draft: bool) -> Result<JobPosting> {
    let board = ctx.board()?;
    let status = if draft {
        PostingStatus::Draft
    } else {
        PostingStatus::Published
    };

    let result = board.create_posting(form, status);
    report(&board);
    let job = match result {
        Ok(job) => job,
        Err(BoardError::Validation(errs)) => {
            print_field_errors(&errs);
            anyhow::bail!("Job posting is incomplete.");
        }
        Err(e) => return Err(e.into()),
    };
    board.persist()?;
    Ok(job)
}
