//! `jobboard`: command-line front end for the job board.
//!
//! Lists and filters postings, toggles likes, posts jobs and submits
//! applications against the configured backend, falling back to the local
//! snapshot cache when the backend is unreachable.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::Context;

/// Job board CLI tool.
#[derive(Parser, Debug)]
#[command(name = "jobboard", about = "Job board CLI client")]
struct Cli {
    /// Path to client config file (default: ~/.jobboard/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Backend URL, overriding the config file and JOBBOARD_API_URL.
    #[arg(long = "server", global = true)]
    server: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    /// Log debug events to stderr.
    #[arg(long = "verbose", short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List published jobs matching the filters.
    Jobs {
        /// Search title or company.
        #[arg(long, short = 's', default_value = "")]
        search: String,
        /// Location substring, or "all".
        #[arg(long, default_value = "all")]
        location: String,
        /// Job type (e.g. "Full Time"), or "all".
        #[arg(long = "type", default_value = "all")]
        job_type: String,
        /// Minimum salary in LPA.
        #[arg(long, default_value_t = 0.0)]
        min: f64,
        /// Maximum salary in LPA.
        #[arg(long, default_value_t = jobboard_core::filter::DEFAULT_SALARY_MAX)]
        max: f64,
        /// Page to request from the backend.
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Skip the backend and use the cached snapshot.
        #[arg(long)]
        offline: bool,
    },

    /// Show one posting.
    Show {
        /// Job ID as shown by `jobboard jobs`.
        id: String,
    },

    /// Toggle the like on a posting.
    Like {
        /// Job ID.
        id: String,
    },

    /// Create a job posting locally.
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long = "type")]
        job_type: Option<String>,
        /// Minimum salary, rupees per annum.
        #[arg(long)]
        salary_min: Option<String>,
        /// Maximum salary, rupees per annum.
        #[arg(long)]
        salary_max: Option<String>,
        /// Application deadline (YYYY-MM-DD).
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        requirements: Option<String>,
        #[arg(long)]
        responsibilities: Option<String>,
        /// Save as draft instead of publishing.
        #[arg(long)]
        draft: bool,
    },

    /// Apply to a posting.
    Apply {
        /// Job ID.
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        /// Experience level (e.g. "3-5").
        #[arg(long)]
        experience: String,
        /// Notice period (e.g. "30 days").
        #[arg(long)]
        notice: String,
        #[arg(long)]
        expected_salary: String,
        /// Why you are interested in the role.
        #[arg(long)]
        why: String,
        /// Interview availability.
        #[arg(long)]
        availability: String,
        /// Resume file (PDF or DOC, max 5MB).
        #[arg(long)]
        resume: PathBuf,
        #[arg(long, default_value = "")]
        current_company: String,
        #[arg(long, default_value = "")]
        current_role: String,
        #[arg(long, default_value = "")]
        cover_letter: String,
        #[arg(long, default_value = "")]
        linkedin: String,
        #[arg(long, default_value = "")]
        portfolio: String,
    },

    /// Check backend status.
    Status,

    /// Show or edit the client config.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective config.
    Show,
    /// Set config values.
    Set {
        #[arg(long)]
        server: Option<String>,
        /// Bearer token; pass an empty string to clear.
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        cache_path: Option<PathBuf>,
        #[arg(long)]
        page_size: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);

    let json = match cli.output.as_str() {
        "table" => false,
        "json" => true,
        other => anyhow::bail!("Unknown output format: {} (use table or json)", other),
    };

    if let Commands::Config { action } = &cli.command {
        match action {
            ConfigAction::Show => commands::config::show(&config_path, json)?,
            ConfigAction::Set {
                server,
                token,
                cache_path,
                page_size,
            } => commands::config::set(
                &config_path,
                server.as_deref(),
                token.as_deref(),
                cache_path.clone(),
                *page_size,
            )?,
        }
        return Ok(());
    }

    let ctx = Context::load(&config_path, cli.server.as_deref(), json)?;

    match cli.command {
        Commands::Jobs {
            search,
            location,
            job_type,
            min,
            max,
            page,
            offline,
        } => {
            let filter = commands::jobs::filter_from_args(&search, &location, &job_type, min, max);
            commands::jobs::list(&ctx, filter, page, offline).await?;
        }

        Commands::Show { id } => {
            commands::jobs::show(&ctx, &id).await?;
        }

        Commands::Like { id } => {
            commands::jobs::like(&ctx, &id).await?;
        }

        Commands::Post {
            title,
            company,
            location,
            job_type,
            salary_min,
            salary_max,
            deadline,
            description,
            requirements,
            responsibilities,
            draft,
        } => {
            let form = jobboard_core::JobForm {
                title,
                company,
                location: location.unwrap_or_default(),
                job_type: job_type.unwrap_or_default(),
                salary_min: salary_min.unwrap_or_default(),
                salary_max: salary_max.unwrap_or_default(),
                application_deadline: deadline.unwrap_or_default(),
                description: description.unwrap_or_default(),
                requirements: requirements.unwrap_or_default(),
                responsibilities: responsibilities.unwrap_or_default(),
            };
            commands::post::create(&ctx, &form, draft)?;
        }

        Commands::Apply {
            id,
            name,
            email,
            phone,
            experience,
            notice,
            expected_salary,
            why,
            availability,
            resume,
            current_company,
            current_role,
            cover_letter,
            linkedin,
            portfolio,
        } => {
            let resume = commands::apply::read_resume(&resume)?;
            let form = jobboard_core::ApplicationForm {
                full_name: name,
                email,
                phone,
                experience,
                current_company,
                current_role,
                notice_period: notice,
                expected_salary,
                cover_letter,
                linkedin_profile: linkedin,
                portfolio_website: portfolio,
                why_interested: why,
                available_for_interview: availability,
                resume: Some(resume),
            };
            commands::apply::submit(&ctx, &id, form).await?;
        }

        Commands::Status => {
            commands::status::status(&ctx).await?;
        }

        Commands::Version => {
            println!("jobboard cli v{}", env!("CARGO_PKG_VERSION"));
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}
