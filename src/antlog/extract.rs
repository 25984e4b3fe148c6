use crate::error::ExtractionError;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tar::Archive;

/// The typed layout contract between extraction and scanning: paths handed to
/// the scanner are always expressed relative to `root`, where the first
/// component is the archive's own top-level directory and the second is the
/// device subfolder.
#[derive(Debug, Clone)]
pub struct ExtractedTree {
    pub root: PathBuf,
    pub files: usize,
    pub dirs: usize,
}

fn safe_entry_path(raw: &Path) -> Result<PathBuf, ExtractionError> {
    let mut out = PathBuf::new();
    for comp in raw.components() {
        match comp {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => {
                return Err(ExtractionError::UnsafeEntryPath(
                    raw.display().to_string(),
                ));
            }
        }
    }
    Ok(out)
}

fn reset_dest(dest_root: &Path) -> Result<(), ExtractionError> {
    let as_string = || dest_root.display().to_string();
    if dest_root.exists() {
        fs::remove_dir_all(dest_root).map_err(|source| ExtractionError::ResetDest {
            path: as_string(),
            source,
        })?;
    }
    fs::create_dir_all(dest_root).map_err(|source| ExtractionError::ResetDest {
        path: as_string(),
        source,
    })
}

/// Mirror the archive's regular files and directories under `dest_root`.
///
/// Any previous tree at `dest_root` is removed first so a re-upload can never
/// inherit stale files. Entry types other than directories and regular files
/// (symlinks, devices, ...) are skipped without error.
pub fn extract_archive(
    archive_path: &Path,
    dest_root: &Path,
) -> Result<ExtractedTree, ExtractionError> {
    reset_dest(dest_root)?;

    let file = File::open(archive_path).map_err(|source| ExtractionError::OpenArchive {
        path: archive_path.display().to_string(),
        source,
    })?;

    let mut archive = Archive::new(file);
    let mut files = 0usize;
    let mut dirs = 0usize;

    let entries = archive
        .entries()
        .map_err(|source| ExtractionError::CorruptEntry(source.to_string()))?;
    for entry in entries {
        let mut entry = entry.map_err(|source| ExtractionError::CorruptEntry(source.to_string()))?;
        let raw_path = entry
            .path()
            .map_err(|source| ExtractionError::CorruptEntry(source.to_string()))?
            .into_owned();
        let rel = safe_entry_path(&raw_path)?;
        if rel.as_os_str().is_empty() {
            continue;
        }

        let target = dest_root.join(&rel);
        let entry_type = entry.header().entry_type();
        if entry_type.is_dir() {
            fs::create_dir_all(&target).map_err(|source| ExtractionError::WriteTarget {
                path: target.display().to_string(),
                source,
            })?;
            dirs += 1;
        } else if entry_type.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|source| ExtractionError::WriteTarget {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
            let mut out = File::create(&target).map_err(|source| ExtractionError::WriteTarget {
                path: target.display().to_string(),
                source,
            })?;
            io::copy(&mut entry, &mut out).map_err(|source| ExtractionError::WriteTarget {
                path: target.display().to_string(),
                source,
            })?;
            files += 1;
        }
    }

    Ok(ExtractedTree {
        root: dest_root.to_path_buf(),
        files,
        dirs,
    })
}
