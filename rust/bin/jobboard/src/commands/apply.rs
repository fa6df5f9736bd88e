//! `jobboard apply`: validate and submit an application.

use std::path::Path;

use anyhow::{Context as _, Result};
use jobboard_core::{ApplicationForm, BoardError, Resume};

use super::{find_job, print_field_errors, report, Context};

/// Read the resume file; the content type follows the extension.
pub fn read_resume(path: &Path) -> Result<Resume> {
    let bytes = std::fs::read(path).with_context(|| format!("reading resume {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    Ok(Resume::new(name, bytes))
}

pub async fn submit(ctx: &Context, id: &str, form: ApplicationForm) -> Result<()> {
    let board = ctx.board()?;
    let job = find_job(ctx, &board, id).await?;

    let result = board.apply(&job.id, form).await;
    report(&board);
    let receipt = match result {
        Ok(receipt) => receipt,
        Err(BoardError::Validation(errs)) => {
            print_field_errors(&errs);
            anyhow::bail!("Application is incomplete.");
        }
        Err(e) => return Err(e.into()),
    };

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        println!("Applied to {} at {}.", job.title, job.company);
        if let Some(app_id) = &receipt.application_id {
            println!("  Application: {}", app_id);
        }
    }
    Ok(())
}
