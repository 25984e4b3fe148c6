use crate::antlog::bundle::LogBundle;
use crate::antlog::canonical::canonical_key;
use crate::antlog::config::AntlogConfig;
use crate::antlog::extract::extract_archive;
use crate::antlog::order::sort_connection_lines;
use crate::antlog::paths::AntlogPaths;
use crate::antlog::scan::{scan_connection_lines, scan_power_lines};
use crate::antlog::store::CacheStore;
use crate::antlog::{audit, warn};
use crate::error::{ExtractionError, IngestError};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub canonical_key: String,
    pub blob_path: PathBuf,
    pub connection_devices: usize,
    pub connection_lines: usize,
    pub power_devices: usize,
    pub power_lines: usize,
    pub entries: usize,
    pub replaced: bool,
}

fn archive_file_name(archive_path: &Path) -> String {
    archive_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn archive_stem(file_name: &str) -> String {
    file_name
        .strip_suffix(".tar")
        .unwrap_or(file_name)
        .to_string()
}

fn record(paths: &AntlogPaths, user: &str, archive: &str, phase: &str, outcome: &str, detail: &str) {
    let log = audit::AuditLog::for_paths(paths);
    if let Err(err) = log.append(user, archive, phase, outcome, detail) {
        warn::emit(warn::WarnEvent {
            code: "AUDIT_APPEND_FAILED",
            stage: phase,
            action: "append-audit-event",
            user,
            archive,
            reason: "audit-log-unwritable",
            err: &format!("{err:#}"),
        });
    }
}

fn run_pipeline(
    paths: &AntlogPaths,
    store: &CacheStore,
    username: &str,
    archive_path: &Path,
    file_name: &str,
    scratch_root: &Path,
) -> Result<IngestOutcome, IngestError> {
    let dest_root = scratch_root.join(archive_stem(file_name));
    let tree = extract_archive(archive_path, &dest_root)?;
    record(
        paths,
        username,
        file_name,
        "extract",
        "ok",
        &format!("files={} dirs={}", tree.files, tree.dirs),
    );

    let mut connection_lines = scan_connection_lines(&tree)?;
    sort_connection_lines(&mut connection_lines);
    let power_lines = scan_power_lines(&tree)?;
    record(
        paths,
        username,
        file_name,
        "scan",
        "ok",
        &format!(
            "connection_devices={} power_devices={}",
            connection_lines.len(),
            power_lines.len()
        ),
    );

    let key = canonical_key(file_name)?;
    record(paths, username, file_name, "canonicalize", "ok", &key);

    let bundle = LogBundle {
        connection_lines,
        power_lines,
    };
    let connection_devices = bundle.connection_lines.len();
    let connection_line_count = bundle.connection_line_count();
    let power_devices = bundle.power_lines.len();
    let power_line_count = bundle.power_line_count();

    let merged = store.merge(username, &key, bundle)?;
    record(
        paths,
        username,
        file_name,
        "merge",
        "ok",
        &format!("key={key} entries={}", merged.entries),
    );

    Ok(IngestOutcome {
        canonical_key: key,
        blob_path: merged.blob_path,
        connection_devices,
        connection_lines: connection_line_count,
        power_devices,
        power_lines: power_line_count,
        entries: merged.entries,
        replaced: merged.replaced,
    })
}

fn cleanup(
    paths: &AntlogPaths,
    cfg: &AntlogConfig,
    username: &str,
    archive_path: &Path,
    file_name: &str,
    scratch_root: &Path,
) {
    if cfg.cleanup.remove_archive {
        if let Err(err) = fs::remove_file(archive_path) {
            warn::emit(warn::WarnEvent {
                code: "CLEANUP_ARCHIVE_FAILED",
                stage: "cleanup",
                action: "remove-source-archive",
                user: username,
                archive: file_name,
                reason: "source-archive-not-removed",
                err: &err.to_string(),
            });
        }
    }
    if cfg.cleanup.remove_extracted {
        if let Err(err) = fs::remove_dir_all(scratch_root) {
            warn::emit(warn::WarnEvent {
                code: "CLEANUP_SCRATCH_FAILED",
                stage: "cleanup",
                action: "remove-scratch-tree",
                user: username,
                archive: file_name,
                reason: "scratch-tree-not-removed",
                err: &err.to_string(),
            });
        }
    }
    record(paths, username, file_name, "cleanup", "ok", "best-effort");
}

/// Run the full ingestion state machine for one uploaded archive:
/// validate extension, extract, scan both line classes, order connection
/// lines, derive the canonical key, merge into the user's collection, then
/// best-effort cleanup. The first failing step decides the outcome; cleanup
/// runs on both paths and only ever warns.
pub fn ingest_archive(
    paths: &AntlogPaths,
    cfg: &AntlogConfig,
    store: &CacheStore,
    username: &str,
    archive_path: &Path,
) -> Result<IngestOutcome, IngestError> {
    let file_name = archive_file_name(archive_path);
    if !file_name.ends_with(".tar") || archive_stem(&file_name).is_empty() {
        return Err(IngestError::UnsupportedArchive(file_name));
    }

    // Unique per-request scratch root; concurrent uploads of a same-named
    // archive never share an extraction path.
    fs::create_dir_all(&paths.scratch_dir).map_err(|source| {
        IngestError::Extraction(ExtractionError::Scratch {
            path: paths.scratch_dir.display().to_string(),
            source,
        })
    })?;
    let scratch_root = tempfile::Builder::new()
        .prefix(&format!("{}-", cfg.extract.scratch_prefix))
        .tempdir_in(&paths.scratch_dir)
        .map_err(|source| {
            IngestError::Extraction(ExtractionError::Scratch {
                path: paths.scratch_dir.display().to_string(),
                source,
            })
        })?
        .into_path();

    let result = run_pipeline(paths, store, username, archive_path, &file_name, &scratch_root);
    match &result {
        Ok(outcome) => record(
            paths,
            username,
            &file_name,
            "ingest",
            "ok",
            &format!("key={}", outcome.canonical_key),
        ),
        Err(err) => record(paths, username, &file_name, "ingest", "failed", &err.to_string()),
    }

    cleanup(paths, cfg, username, archive_path, &file_name, &scratch_root);

    result
}
