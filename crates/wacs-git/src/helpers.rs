//! Shared git2 helpers for integrating a remote branch
//!
//! The merge policy here always keeps the local ("mine") side of a
//! conflict so that a contributor's push can go through unattended.

use std::path::Path;

use git2::{Commit, ErrorCode, FileFavor, Index, MergeOptions, Repository, build::CheckoutBuilder};

use crate::{Error, Result};

/// Stage bits of `IndexEntry::flags`.
const STAGE_MASK: u16 = 0x3000;

/// Outcome of integrating a fetched branch into the local one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// Local branch already contains the remote commit.
    UpToDate,
    /// Local branch moved forward to the remote commit.
    FastForward,
    /// A merge commit was created; `resolved` conflicts kept the local side.
    Merged { resolved: usize },
}

/// Whether a push error means the remote has commits we do not.
pub fn is_non_fast_forward(err: &git2::Error) -> bool {
    if err.code() == ErrorCode::NotFastForward {
        return true;
    }
    let message = err.message().to_lowercase();
    message.contains("non-fast-forward")
        || message.contains("non-fastforwardable")
        || message.contains("not present locally")
        || message.contains("fetch first")
}

/// Move `branch` to `target` and check it out.
///
/// Works for unborn branches as well, where there is no ref to update yet.
pub fn fast_forward(repo: &Repository, branch: &str, target: &Commit<'_>) -> Result<()> {
    let refname = format!("refs/heads/{branch}");
    let log_message = format!("pull: fast-forward to {}", target.id());

    match repo.find_reference(&refname) {
        Ok(mut reference) => {
            reference.set_target(target.id(), &log_message)?;
        }
        Err(e) if e.code() == ErrorCode::NotFound => {
            repo.reference(&refname, target.id(), true, &log_message)?;
            repo.set_head(&refname)?;
        }
        Err(e) => return Err(e.into()),
    }

    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;
    Ok(())
}

/// Merge `theirs` into HEAD, preferring our side of every conflict.
///
/// Content conflicts are settled by libgit2's `FileFavor::Ours`. Conflicts
/// it cannot settle (add/add of binaries, modify/delete) are resolved by
/// keeping our index entry, or dropping the path when we deleted it.
pub fn merge_mine(
    repo: &Repository,
    theirs: &Commit<'_>,
    signature: &git2::Signature<'_>,
    message: &str,
) -> Result<usize> {
    let annotated = repo.find_annotated_commit(theirs.id())?;

    let mut merge_opts = MergeOptions::new();
    merge_opts.file_favor(FileFavor::Ours);
    let mut checkout = CheckoutBuilder::new();
    checkout.allow_conflicts(true);

    repo.merge(&[&annotated], Some(&mut merge_opts), Some(&mut checkout))?;

    let mut index = repo.index()?;
    let resolved = if index.has_conflicts() {
        resolve_conflicts_mine(repo, &mut index)?
    } else {
        0
    };

    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;
    let head_commit = repo.head()?.peel_to_commit()?;

    repo.commit(
        Some("HEAD"),
        signature,
        signature,
        message,
        &tree,
        &[&head_commit, theirs],
    )?;
    repo.cleanup_state()?;

    // Bring the working tree in line with the resolved index
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;

    Ok(resolved)
}

/// Resolve every conflict in `index` in favour of our side.
///
/// Returns the number of conflicted paths.
pub fn resolve_conflicts_mine(repo: &Repository, index: &mut Index) -> Result<usize> {
    let conflicts = index
        .conflicts()?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let count = conflicts.len();

    for conflict in conflicts {
        let Some(path_bytes) = conflict
            .our
            .as_ref()
            .or(conflict.their.as_ref())
            .or(conflict.ancestor.as_ref())
            .map(|entry| entry.path.clone())
        else {
            continue;
        };
        let path_str = String::from_utf8_lossy(&path_bytes).into_owned();
        let path = Path::new(&path_str);

        index.conflict_remove(path)?;

        match conflict.our {
            Some(mut ours) => {
                ours.flags &= !STAGE_MASK;
                index.add(&ours)?;
            }
            None => {
                if let Some(workdir) = repo.workdir() {
                    let stale = workdir.join(path);
                    if stale.exists() {
                        std::fs::remove_file(&stale)
                            .map_err(|e| wacs_fs::Error::io(&stale, e))?;
                    }
                }
            }
        }

        tracing::debug!(path = %path_str, "Resolved conflict with local version");
    }

    if index.has_conflicts() {
        let remaining = index
            .conflicts()?
            .filter_map(|c| c.ok())
            .filter_map(|c| c.our.or(c.their).or(c.ancestor))
            .map(|entry| String::from_utf8_lossy(&entry.path).into_owned())
            .collect();
        return Err(Error::UnresolvedConflicts { paths: remaining });
    }

    index.write()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_fast_forward_code_is_detected() {
        let err = git2::Error::new(
            ErrorCode::NotFastForward,
            git2::ErrorClass::Reference,
            "cannot push non-fastforwardable reference",
        );
        assert!(is_non_fast_forward(&err));
    }

    #[test]
    fn test_server_side_rejection_message_is_detected() {
        let err = git2::Error::from_str("! [rejected] master -> master (fetch first)");
        assert!(is_non_fast_forward(&err));
    }

    #[test]
    fn test_auth_failure_is_not_a_rejection() {
        let err = git2::Error::new(
            ErrorCode::Auth,
            git2::ErrorClass::Http,
            "authentication required",
        );
        assert!(!is_non_fast_forward(&err));
    }
}
