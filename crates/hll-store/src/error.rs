use std::path::PathBuf;

/// Errors from line store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored bytes are not valid UTF-8.
    #[error("log file {path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },

    /// A line to append contains a line terminator.
    #[error("line contains a line terminator and cannot be stored as one line")]
    EmbeddedNewline,

    /// An internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
