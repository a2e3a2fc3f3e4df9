//! Error types for wacs-client

use reqwest::StatusCode;

/// Result type for wacs-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the hosting service or the local clone
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Endpoint {endpoint} cannot be used as a base URL")]
    InvalidEndpoint { endpoint: String },

    #[error("Malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication rejected: {message}")]
    Unauthorized { message: String },

    #[error("Repository '{name}' already exists")]
    RepoExists { name: String },

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error(transparent)]
    Git(#[from] wacs_git::Error),

    #[error(transparent)]
    Fs(#[from] wacs_fs::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
