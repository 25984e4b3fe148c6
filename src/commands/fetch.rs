use anyhow::Result;

use crate::antlog::paths::resolve_paths;
use crate::antlog::store::CacheStore;
use crate::commands::CommandReport;

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user: String,
    pub json: bool,
}

pub fn run(opts: &FetchOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let store = CacheStore::new(&paths.store_dir);
    let mut report = CommandReport::new("fetch");

    let Some(collection) = store.fetch(&opts.user)? else {
        report.issue(format!("no data for user {}", opts.user));
        return Ok(report);
    };

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&collection)?);
        return Ok(report);
    }

    report.detail(format!("user={}", opts.user));
    report.detail(format!("entries={}", collection.len()));
    for (key, bundle) in &collection {
        report.detail(format!(
            "{key}: connection_devices={} connection_lines={} power_devices={} power_lines={}",
            bundle.connection_lines.len(),
            bundle.connection_line_count(),
            bundle.power_lines.len(),
            bundle.power_line_count(),
        ));
    }

    Ok(report)
}
