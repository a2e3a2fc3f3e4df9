//! One-call operations: log in, create, list, clone, commit and push
//!
//! Each function stands alone and takes the endpoint or directory it
//! needs, so callers can chain them without holding a client.

use std::path::Path;

use wacs_fs::NormalizedPath;
use wacs_git::{PublishReport, PushPolicy, WorkingCopy};

use crate::{Credentials, Repo, Result, User, WacsClient};

/// Log in to the service at `endpoint`, issuing a token named `token_name`.
///
/// Fails with [`crate::Error::Unauthorized`] for bad credentials.
pub async fn login(credentials: &Credentials, endpoint: &str, token_name: &str) -> Result<User> {
    WacsClient::new(endpoint)?
        .login(credentials, token_name)
        .await
}

/// Create a repository named `repo_name` owned by `user`.
pub async fn create(user: &User, repo_name: &str, endpoint: &str) -> Result<Repo> {
    WacsClient::new(endpoint)?
        .create_repo(user, repo_name)
        .await
}

/// List the repositories `user` can access.
pub async fn list_my_repos(user: &User, endpoint: &str) -> Result<Vec<Repo>> {
    WacsClient::new(endpoint)?.list_my_repos(user).await
}

/// Clone `clone_url` into `local_dir`, authenticating as `user`.
///
/// `local_dir` may exist but must be empty.
pub async fn clone(user: &User, local_dir: impl AsRef<Path>, clone_url: &str) -> Result<()> {
    let auth = user.git_auth();
    let dir = NormalizedPath::new(local_dir.as_ref());
    let url = clone_url.to_string();

    tokio::task::spawn_blocking(move || WorkingCopy::clone_remote(&url, &dir, &auth).map(|_| ()))
        .await??;
    Ok(())
}

/// Commit everything in `local_dir` as `user` and push it.
///
/// A rejected push is retried after merging the remote branch, keeping
/// the local version of conflicting changes.
pub async fn commit_and_push(user: &User, local_dir: impl AsRef<Path>, message: &str) -> Result<()> {
    commit_and_push_with(user, local_dir, message, PushPolicy::default()).await?;
    Ok(())
}

/// [`commit_and_push`] with an explicit retry policy, returning what happened.
pub async fn commit_and_push_with(
    user: &User,
    local_dir: impl AsRef<Path>,
    message: &str,
    policy: PushPolicy,
) -> Result<PublishReport> {
    let auth = user.git_auth();
    let author = user.author_name().to_string();
    let email = user.author_email();
    let dir = NormalizedPath::new(local_dir.as_ref());
    let message = message.to_string();

    let report = tokio::task::spawn_blocking(move || {
        let copy = WorkingCopy::open(&dir)?;
        let signature = wacs_git::signature(&author, &email)?;
        copy.commit_and_push(&message, &signature, &auth, &policy)
    })
    .await??;

    tracing::info!(
        commit = ?report.commit,
        attempts = report.attempts,
        merges = report.integrations.len(),
        "Committed and pushed"
    );
    Ok(report)
}
