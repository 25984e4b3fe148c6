use anyhow::Result;
use std::env;
use std::fs;
use std::path::Path;

use crate::antlog::config::load_config;
use crate::antlog::paths::resolve_paths;
use crate::commands::CommandReport;

include!(concat!(env!("OUT_DIR"), "/antlog_env_allowlist.rs"));

fn dir_summary(label: &str, path: &Path) -> String {
    let state = if path.is_dir() { "present" } else { "absent" };
    format!("{label}={} ({state})", path.display())
}

fn count_user_blobs(store_dir: &Path) -> Result<usize> {
    if !store_dir.is_dir() {
        return Ok(0);
    }
    let mut count = 0usize;
    for entry in fs::read_dir(store_dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            count += 1;
        }
    }
    Ok(count)
}

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config()?;
    let mut report = CommandReport::new("status");

    report.detail(dir_summary("antlog_home", &paths.antlog_home));
    report.detail(dir_summary("uploads_dir", &paths.uploads_dir));
    report.detail(dir_summary("scratch_dir", &paths.scratch_dir));
    report.detail(dir_summary("store_dir", &paths.store_dir));
    report.detail(dir_summary("logs_dir", &paths.logs_dir));

    report.detail(format!("users={}", count_user_blobs(&paths.store_dir)?));
    report.detail(format!(
        "cleanup.remove_archive={} cleanup.remove_extracted={}",
        cfg.cleanup.remove_archive, cfg.cleanup.remove_extracted
    ));
    report.detail(format!("extract.scratch_prefix={}", cfg.extract.scratch_prefix));

    for key in GENERATED_ANTLOG_ENV_ALLOWLIST {
        if let Ok(value) = env::var(key) {
            if !value.trim().is_empty() {
                report.detail(format!("env.{key}={}", value.trim()));
            }
        }
    }

    Ok(report)
}
