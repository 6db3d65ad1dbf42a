//! Page-Audit main entry point
//!
//! This is the command-line interface for submitting pages for analysis and
//! querying the stored results.

use anyhow::Context;
use clap::{Parser, Subcommand};
use page_audit::config::{load_config_or_default, Config};
use page_audit::output::{load_statistics, print_job, print_job_list, print_statistics};
use page_audit::storage::{lock_store, open_store, SharedStore};
use page_audit::{JobId, Orchestrator};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Page-Audit: asynchronous web page analysis
///
/// Fetches pages, reports their title, heading structure, link counts,
/// broken links and login forms, and keeps every result in a local database.
#[derive(Parser, Debug)]
#[command(name = "page-audit")]
#[command(version)]
#[command(about = "Asynchronous web page analysis", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one or more URLs and wait for their analysis
    Submit {
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,
    },

    /// List all jobs in creation order
    List,

    /// Show one job with its full analysis
    Show {
        #[arg(value_name = "ID")]
        id: JobId,
    },

    /// Discard a job's result and analyze its URL again
    Reanalyze {
        #[arg(value_name = "ID")]
        id: JobId,
    },

    /// Delete a job (succeeds for unknown ids)
    Delete {
        #[arg(value_name = "ID")]
        id: JobId,
    },

    /// Show aggregate statistics over all jobs
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    let store = open_shared_store(&config)?;

    match cli.command {
        Command::Submit { urls } => handle_submit(&config, store, &urls).await?,
        Command::List => {
            let jobs = lock_store(&store)?.list_all()?;
            print_job_list(&jobs);
        }
        Command::Show { id } => {
            let orchestrator = Orchestrator::from_config(&config, store)?;
            print_job(&orchestrator.get(id)?);
        }
        Command::Reanalyze { id } => {
            let orchestrator = Orchestrator::from_config(&config, store)?;
            let job = orchestrator.reanalyze(id).await?;
            orchestrator.drain().await;
            print_job(&orchestrator.get(job.id)?);
        }
        Command::Delete { id } => {
            let orchestrator = Orchestrator::from_config(&config, store)?;
            orchestrator.delete(id).await?;
            println!("Deleted job {}", id);
        }
        Command::Stats => {
            println!("Database: {}\n", config.storage.database_path);
            let stats = load_statistics(&*lock_store(&store)?)?;
            print_statistics(&stats);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_audit=info,warn"),
            1 => EnvFilter::new("page_audit=debug,info"),
            2 => EnvFilter::new("page_audit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn open_shared_store(config: &Config) -> anyhow::Result<SharedStore> {
    let path = Path::new(&config.storage.database_path);
    let store = open_store(path)
        .with_context(|| format!("opening result store at {}", path.display()))?;
    let shared: SharedStore = Arc::new(Mutex::new(store));
    Ok(shared)
}

/// Submits every URL, waits for all runs and prints the final records
async fn handle_submit(config: &Config, store: SharedStore, urls: &[String]) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::from_config(config, store)?;

    let mut submitted = Vec::with_capacity(urls.len());
    for url in urls {
        match orchestrator.submit(url).await {
            Ok(job) => submitted.push(job.id),
            Err(e) => tracing::error!("Rejected {}: {}", url, e),
        }
    }

    tracing::info!("Waiting for {} analysis run(s)", submitted.len());
    orchestrator.drain().await;

    for id in &submitted {
        print_job(&orchestrator.get(*id)?);
        println!();
    }

    if submitted.len() < urls.len() {
        anyhow::bail!("{} URL(s) were rejected", urls.len() - submitted.len());
    }
    Ok(())
}
