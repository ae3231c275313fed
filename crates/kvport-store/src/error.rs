use std::path::PathBuf;

/// Errors from host store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Writing the entry would push the store past its byte quota.
    #[error("quota exceeded writing {key}: {required} bytes needed, {quota} allowed")]
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },

    /// The backing file exists but does not hold a JSON object of strings.
    #[error("corrupt store file {path}: {reason}")]
    CorruptFile { path: PathBuf, reason: String },

    /// Serialization failure while persisting the store.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding the store contents was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
