use crate::antlog::bundle::DeviceLines;
use crate::antlog::extract::ExtractedTree;
use crate::error::ScanError;
use std::fs;
use std::path::{Component, Path};
use walkdir::WalkDir;

const CONNECTION_FILE_MARKER: &str = "message";
const CONNECTION_LINE_MARKER: &str = "stratum+tcp";
const POWER_FILE_MARKER: &str = "miner.log";
const POWER_LINE_MARKERS: [&str; 2] = ["power on", "power off"];

/// Device attribution over the extraction layout contract: relative to the
/// tree root, component 0 is the archive's top-level directory and component 1
/// is the device subfolder. Matching files that sit shallower than that carry
/// no attributable device and are skipped.
fn device_for(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let comps: Vec<&str> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    if comps.len() < 3 {
        return None;
    }
    Some(comps[1].to_string())
}

fn scan_lines<F>(
    tree: &ExtractedTree,
    file_marker: &str,
    line_matches: F,
) -> Result<DeviceLines, ScanError>
where
    F: Fn(&str) -> bool,
{
    let mut results = DeviceLines::new();

    for entry in WalkDir::new(&tree.root).sort_by_file_name() {
        let entry = entry.map_err(|source| ScanError::Walk {
            root: tree.root.display().to_string(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().contains(file_marker) {
            continue;
        }
        let Some(device) = device_for(&tree.root, entry.path()) else {
            continue;
        };

        let raw = fs::read(entry.path()).map_err(|source| ScanError::ReadFile {
            path: entry.path().display().to_string(),
            source,
        })?;
        let text = String::from_utf8_lossy(&raw);
        let matched: Vec<String> = text
            .lines()
            .filter(|line| line_matches(line))
            .map(str::to_string)
            .collect();
        if matched.is_empty() {
            continue;
        }

        results.entry(device).or_default().extend(matched);
    }

    Ok(results)
}

/// Collect pool-connection lines: files whose name contains `message`, lines
/// containing `stratum+tcp`, in file-read order.
pub fn scan_connection_lines(tree: &ExtractedTree) -> Result<DeviceLines, ScanError> {
    scan_lines(tree, CONNECTION_FILE_MARKER, |line| {
        line.contains(CONNECTION_LINE_MARKER)
    })
}

/// Collect power events: files whose name contains `miner.log`, lines
/// containing `power on` or `power off`, in file-read order.
pub fn scan_power_lines(tree: &ExtractedTree) -> Result<DeviceLines, ScanError> {
    scan_lines(tree, POWER_FILE_MARKER, |line| {
        POWER_LINE_MARKERS.iter().any(|marker| line.contains(marker))
    })
}
