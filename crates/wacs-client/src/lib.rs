//! Client for a WACS (Gitea-compatible) hosting service
//!
//! Log in with account credentials, create and list repositories, then
//! clone them and push local edits back. Pushes that race with another
//! contributor are merged keeping the local side ("mine").
//!
//! ```no_run
//! # async fn run() -> wacs_client::Result<()> {
//! use wacs_client::{Credentials, clone, commit_and_push, create, login};
//!
//! let endpoint = "https://git.example.org/api/v1";
//! let user = login(&Credentials::new("alice", "secret"), endpoint, "wacs").await?;
//! let repo = create(&user, "notes", endpoint).await?;
//! clone(&user, "/tmp/notes", &repo.clone_url).await?;
//! std::fs::write("/tmp/notes/README.md", "# Notes\n").ok();
//! commit_and_push(&user, "/tmp/notes", "Add readme").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod host;
pub mod models;
pub mod ops;

pub use client::WacsClient;
pub use config::TestConfig;
pub use error::{Error, Result};
pub use host::RepoHost;
pub use models::{AccessToken, Account, Credentials, Owner, Repo, User};
pub use ops::{clone, commit_and_push, commit_and_push_with, create, list_my_repos, login};
pub use wacs_git::{PublishReport, PullOutcome, PushPolicy};
