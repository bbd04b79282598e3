//! Error types for the watcher

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by [`crate::watch`] and the classified event stream
///
/// Metadata lookups never produce an error: a failed lookup is treated as
/// the path being absent and folded into classification.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The OS-level watcher failed
    #[error("file watcher error: {0}")]
    Notify(#[from] notify::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The include pattern is not a valid glob
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// An exclusion rule or .gitignore file could not be parsed
    #[error("invalid exclusion rule: {0}")]
    Ignore(#[from] ignore::Error),

    #[error("watch root is not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),
}

pub type Result<T> = std::result::Result<T, WatchError>;
