use crate::antlog::bundle::{Collection, LogBundle};
use crate::antlog::util::sanitize_slug;
use crate::error::StoreError;
use fs2::FileExt;
use sha2::{Digest, Sha256};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Per-user cache of ingested archives. Each user's whole collection is one
/// opaque JSON blob on disk; merge and fetch (de)serialize it in full.
#[derive(Debug, Clone)]
pub struct CacheStore {
    store_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub blob_path: PathBuf,
    pub entries: usize,
    pub replaced: bool,
}

fn user_stem(username: &str) -> String {
    let slug = sanitize_slug(username);
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    if slug.is_empty() {
        format!("user-{}", &digest[..12])
    } else {
        format!("{slug}-{}", &digest[..12])
    }
}

impl CacheStore {
    pub fn new(store_dir: &Path) -> Self {
        Self {
            store_dir: store_dir.to_path_buf(),
        }
    }

    fn blob_path(&self, username: &str) -> PathBuf {
        self.store_dir.join(format!("{}.json", user_stem(username)))
    }

    fn lock_path(&self, username: &str) -> PathBuf {
        self.store_dir.join(format!("{}.lock", user_stem(username)))
    }

    fn ensure_store_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.store_dir).map_err(|source| StoreError::WriteBlob {
            path: self.store_dir.display().to_string(),
            source,
        })
    }

    /// Take the per-user exclusive lock; concurrent merges for one user are
    /// serialized on it. The flock is released when the handle drops.
    fn acquire_user_lock(&self, username: &str) -> Result<File, StoreError> {
        self.ensure_store_dir()?;
        let path = self.lock_path(username);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&path)
            .map_err(|source| StoreError::Lock {
                path: path.display().to_string(),
                source,
            })?;
        file.lock_exclusive().map_err(|source| StoreError::Lock {
            path: path.display().to_string(),
            source,
        })?;
        Ok(file)
    }

    // The persistence boundary proper: one opaque string per user.

    fn read_blob(&self, username: &str) -> Result<Option<String>, StoreError> {
        let path = self.blob_path(username);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StoreError::ReadBlob {
                path: path.display().to_string(),
                source,
            })
    }

    fn write_blob(&self, username: &str, blob: &str) -> Result<PathBuf, StoreError> {
        self.ensure_store_dir()?;
        let path = self.blob_path(username);
        fs::write(&path, format!("{blob}\n")).map_err(|source| StoreError::WriteBlob {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }

    fn decode(&self, username: &str, blob: &str) -> Result<Collection, StoreError> {
        serde_json::from_str(blob).map_err(|source| StoreError::Deserialize {
            path: self.blob_path(username).display().to_string(),
            source,
        })
    }

    /// Set `collection[key] = bundle` for the user, creating the collection on
    /// first write. Re-ingesting a key overwrites its bundle (last-write-wins).
    pub fn merge(
        &self,
        username: &str,
        key: &str,
        bundle: LogBundle,
    ) -> Result<MergeOutcome, StoreError> {
        let _lock = self.acquire_user_lock(username)?;

        let mut collection = match self.read_blob(username)? {
            Some(blob) => self.decode(username, &blob)?,
            None => Collection::new(),
        };
        let replaced = collection.insert(key.to_string(), bundle).is_some();

        let blob =
            serde_json::to_string_pretty(&collection).map_err(|source| StoreError::Serialize {
                user: username.to_string(),
                source,
            })?;
        let blob_path = self.write_blob(username, &blob)?;

        Ok(MergeOutcome {
            blob_path,
            entries: collection.len(),
            replaced,
        })
    }

    /// Load the user's full collection. `None` means the user has never
    /// ingested anything, which is distinct from an existing empty collection.
    pub fn fetch(&self, username: &str) -> Result<Option<Collection>, StoreError> {
        let Some(blob) = self.read_blob(username)? else {
            return Ok(None);
        };
        Ok(Some(self.decode(username, &blob)?))
    }
}
