use thiserror::Error;

/// Archive unpacking failures.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to open archive {path}: {source}")]
    OpenArchive {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to reset extraction dir {path}: {source}")]
    ResetDest {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to prepare scratch dir {path}: {source}")]
    Scratch {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt archive entry: {0}")]
    CorruptEntry(String),
    #[error("archive entry escapes extraction root: {0}")]
    UnsafeEntryPath(String),
    #[error("failed to write {path}: {source}")]
    WriteTarget {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Filesystem walk/read failures while scanning an extracted tree.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("walk failed under {root}: {source}")]
    Walk {
        root: String,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The uploaded filename matches neither recognized naming pattern.
#[derive(Debug, Error)]
#[error("archive name matches no known naming pattern: {0}")]
pub struct CanonicalizationError(pub String);

/// Cache store serialization or persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize collection for user {user}: {source}")]
    Serialize {
        user: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse cached collection {path}: {source}")]
    Deserialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read {path}: {source}")]
    ReadBlob {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    WriteBlob {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to lock {path}: {source}")]
    Lock {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level ingestion error: the first failing pipeline step wins.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("archive is not a .tar file: {0}")]
    UnsupportedArchive(String),
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("log scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("cache key derivation failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    #[error("cache store failed: {0}")]
    Store(#[from] StoreError),
}
