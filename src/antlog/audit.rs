use crate::antlog::paths::AntlogPaths;
use crate::antlog::util::now_epoch_secs;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// One line of the ingest audit trail, scoped to a single upload.
#[derive(Debug, Clone, Serialize)]
struct IngestAuditEvent<'a> {
    at_epoch_secs: u64,
    user: &'a str,
    archive: &'a str,
    phase: &'a str,
    outcome: &'a str,
    detail: &'a str,
}

/// Append-only JSONL trail of ingest pipeline phases.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn for_paths(paths: &AntlogPaths) -> Self {
        Self {
            path: paths.logs_dir.join("ingest-audit.jsonl"),
        }
    }

    pub fn append(
        &self,
        user: &str,
        archive: &str,
        phase: &str,
        outcome: &str,
        detail: &str,
    ) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let event = IngestAuditEvent {
            at_epoch_secs: now_epoch_secs()?,
            user,
            archive,
            phase,
            outcome,
            detail,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        writeln!(file, "{}", serde_json::to_string(&event)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AuditLog;
    use crate::antlog::paths::AntlogPaths;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn append_writes_one_json_line_per_event() {
        let tmp = tempdir().expect("tempdir");
        let paths = AntlogPaths {
            antlog_home: tmp.path().to_path_buf(),
            uploads_dir: tmp.path().join("uploads"),
            scratch_dir: tmp.path().join("extracted"),
            store_dir: tmp.path().join("store"),
            logs_dir: tmp.path().join("logs"),
        };

        let log = AuditLog::for_paths(&paths);
        log.append("alice", "a.tar", "extract", "ok", "files=2 dirs=1")
            .expect("append");
        log.append("alice", "a.tar", "merge", "ok", "entries=1")
            .expect("append");

        let raw = fs::read_to_string(paths.logs_dir.join("ingest-audit.jsonl")).expect("read");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).expect("parse");
        assert_eq!(first["user"], "alice");
        assert_eq!(first["archive"], "a.tar");
        assert_eq!(first["phase"], "extract");
        assert_eq!(first["outcome"], "ok");
    }
}
