use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::commands::CommandReport;

/// Antlog: miner log archive ingestion and per-user cache.
#[derive(Parser)]
#[command(name = "antlog", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest an uploaded .tar log archive for a user
    Ingest {
        /// Authenticated username owning the archive
        #[arg(long)]
        user: String,
        /// Uploaded .tar file; bare filenames resolve against the uploads dir
        #[arg(long)]
        archive: PathBuf,
    },
    /// Print a user's cached collection
    Fetch {
        /// Username whose collection to load
        #[arg(long)]
        user: String,
        /// Emit the raw collection as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Report resolved paths, store population, and active env overrides
    Status,
}

fn print_report(report: &CommandReport) {
    for detail in &report.details {
        println!("{}: {detail}", report.command);
    }
    for issue in &report.issues {
        eprintln!("{}: {issue}", report.command);
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let report = match cli.command {
        Commands::Ingest { user, archive } => {
            commands::ingest::run(&commands::ingest::IngestOptions { user, archive })?
        }
        Commands::Fetch { user, json } => {
            commands::fetch::run(&commands::fetch::FetchOptions { user, json })?
        }
        Commands::Status => commands::status::run()?,
    };

    print_report(&report);
    if !report.ok {
        anyhow::bail!("{} completed with issues", report.command);
    }
    Ok(())
}
