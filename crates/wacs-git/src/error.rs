//! Error types for wacs-git

use std::path::PathBuf;

/// Result type for wacs-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wacs-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] wacs_fs::Error),

    #[error("Not a git working copy: {path}")]
    NotARepository { path: PathBuf },

    #[error("Clone target {path} exists and is not empty")]
    DirectoryNotEmpty { path: PathBuf },

    #[error("HEAD is detached; cannot determine the branch to push")]
    DetachedHead,

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Push of '{branch}' rejected: {message}")]
    PushRejected { branch: String, message: String },

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("Pull failed: {message}")]
    PullFailed { message: String },

    #[error("Merge left unresolved conflicts in: {}", paths.join(", "))]
    UnresolvedConflicts { paths: Vec<String> },
}

impl Error {
    /// Whether retrying after integrating the remote branch may succeed.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::PushRejected { .. })
    }
}
