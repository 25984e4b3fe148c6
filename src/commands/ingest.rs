use anyhow::Result;
use std::path::PathBuf;

use crate::antlog::config::load_config;
use crate::antlog::ingest::ingest_archive;
use crate::antlog::paths::resolve_paths;
use crate::antlog::store::CacheStore;
use crate::commands::CommandReport;

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub user: String,
    pub archive: PathBuf,
}

pub fn run(opts: &IngestOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config()?;
    let mut report = CommandReport::new("ingest");

    // Bare filenames refer to the uploads dir, matching how archives arrive.
    let archive_path = if opts.archive.exists() {
        opts.archive.clone()
    } else {
        paths.uploads_dir.join(&opts.archive)
    };

    report.detail(format!("user={}", opts.user));
    report.detail(format!("archive={}", archive_path.display()));

    let store = CacheStore::new(&paths.store_dir);
    match ingest_archive(&paths, &cfg, &store, &opts.user, &archive_path) {
        Ok(outcome) => {
            report.detail(format!("canonical_key={}", outcome.canonical_key));
            report.detail(format!(
                "connection_devices={} connection_lines={}",
                outcome.connection_devices, outcome.connection_lines
            ));
            report.detail(format!(
                "power_devices={} power_lines={}",
                outcome.power_devices, outcome.power_lines
            ));
            report.detail(format!(
                "entries={} replaced={}",
                outcome.entries, outcome.replaced
            ));
            report.detail(format!("blob={}", outcome.blob_path.display()));
        }
        Err(err) => report.issue(format!("ingestion failed: {err}")),
    }

    Ok(report)
}
