//! Git operations for wacs working copies
//!
//! Clone a hosted repository, commit local edits and push them back,
//! merging remote changes with a "keep mine" policy when a push is
//! rejected.

pub mod auth;
pub mod error;
pub mod helpers;
pub mod publish;
pub mod working_copy;

pub use auth::Auth;
pub use error::{Error, Result};
pub use helpers::PullOutcome;
pub use publish::{PublishReport, PushPolicy};
pub use working_copy::{DEFAULT_REMOTE, WorkingCopy};

/// Build a commit signature stamped with the current time.
pub fn signature(name: &str, email: &str) -> Result<git2::Signature<'static>> {
    Ok(git2::Signature::now(name, email)?)
}
