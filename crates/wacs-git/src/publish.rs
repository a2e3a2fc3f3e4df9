//! Commit local changes and get them onto the remote

use std::time::Duration;

use backoff::ExponentialBackoff;
use git2::{Oid, Signature};

use crate::{Auth, Result, WorkingCopy, helpers::PullOutcome};

/// How hard to try before giving up on a rejected push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushPolicy {
    /// Total push attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_interval: Duration,
    /// Upper bound for the delay between retries.
    pub max_interval: Duration,
}

impl Default for PushPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval: Duration::from_millis(200),
            max_interval: Duration::from_secs(2),
        }
    }
}

impl PushPolicy {
    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_interval,
            current_interval: self.initial_interval,
            max_interval: self.max_interval,
            max_elapsed_time: None,
            ..ExponentialBackoff::default()
        }
    }
}

/// What [`WorkingCopy::commit_and_push`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Commit created from the working tree, if anything changed.
    pub commit: Option<Oid>,
    /// Push attempts made.
    pub attempts: u32,
    /// Remote integrations performed after rejected pushes.
    pub integrations: Vec<PullOutcome>,
}

impl WorkingCopy {
    /// Stage everything, commit it and push the current branch.
    ///
    /// When the remote has moved on, the remote branch is merged keeping
    /// the local side of every conflict and the push is retried, up to
    /// `policy.max_attempts` pushes in total.
    ///
    /// A fresh clone of an empty remote with nothing to commit has no branch
    /// to push; that is reported with zero attempts.
    pub fn commit_and_push(
        &self,
        message: &str,
        signature: &Signature<'_>,
        auth: &Auth,
        policy: &PushPolicy,
    ) -> Result<PublishReport> {
        self.stage_all()?;
        let commit = self.commit(message, signature)?;

        if commit.is_none() && self.head_commit()?.is_none() {
            tracing::debug!(dir = %self.root(), "Nothing to commit on an unborn branch, not pushing");
            return Ok(PublishReport {
                commit,
                attempts: 0,
                integrations: Vec::new(),
            });
        }

        let mut attempts = 0;
        let mut integrations = Vec::new();

        let outcome = backoff::retry(policy.backoff(), || {
            attempts += 1;
            match self.push(auth) {
                Ok(()) => Ok(()),
                Err(err) if err.is_rejection() && attempts < policy.max_attempts => {
                    tracing::warn!(attempt = attempts, error = %err, "Push rejected, merging remote");
                    let pulled = self
                        .pull_mine(auth, signature)
                        .map_err(backoff::Error::permanent)?;
                    integrations.push(pulled);
                    Err(backoff::Error::transient(err))
                }
                Err(err) => Err(backoff::Error::permanent(err)),
            }
        });

        outcome.map_err(|e| match e {
            backoff::Error::Permanent(err) => err,
            backoff::Error::Transient { err, .. } => err,
        })?;

        Ok(PublishReport {
            commit,
            attempts,
            integrations,
        })
    }
}
