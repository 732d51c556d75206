//! Error types for `vfolder-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

use std::path::PathBuf;

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to display
/// a meaningful message or take corrective action.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The tree document is unreadable as a virtual folder tree.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A file was added under an entity that is not a directory.
    #[error("invalid parent: {0}")]
    InvalidParent(String),

    /// The file path given to an add operation is empty.
    #[error("invalid path: file path must not be empty")]
    InvalidPath,

    /// The parent directory exists in memory but not in the document.
    #[error("parent not found in document: key {0}")]
    ParentNotFound(String),

    /// A remove was requested for an entity that is not a file.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// An entity with this key already exists in the tree.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Writing the document back to disk failed.
    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `vfolder-core`.
pub type CoreResult<T> = Result<T, CoreError>;
