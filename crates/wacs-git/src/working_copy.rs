//! A contributor's local clone of a hosted repository

use std::fs;

use git2::{
    Commit, ErrorCode, FetchOptions, IndexAddOption, Oid, PushOptions, Repository, Signature,
    build::RepoBuilder,
};
use wacs_fs::NormalizedPath;

use crate::{
    Auth, Error, Result,
    helpers::{self, PullOutcome},
};

/// Remote every working copy pushes to.
pub const DEFAULT_REMOTE: &str = "origin";

/// Single-checkout working copy with an `origin` remote.
pub struct WorkingCopy {
    root: NormalizedPath,
    repo: Repository,
}

impl WorkingCopy {
    /// Clone `url` into `dir`.
    ///
    /// `dir` may already exist as long as it is empty. Cloning an empty
    /// remote is allowed and leaves HEAD unborn.
    pub fn clone_remote(url: &str, dir: &NormalizedPath, auth: &Auth) -> Result<Self> {
        if !dir.is_empty_or_missing() {
            return Err(Error::DirectoryNotEmpty {
                path: dir.to_native(),
            });
        }
        fs::create_dir_all(dir.to_native()).map_err(|e| wacs_fs::Error::io(dir.to_native(), e))?;

        let mut fetch_opts = FetchOptions::new();
        fetch_opts.remote_callbacks(auth.remote_callbacks());

        let repo = RepoBuilder::new()
            .fetch_options(fetch_opts)
            .clone(url, &dir.to_native())?;

        tracing::info!(url, dir = %dir, "Cloned repository");
        Ok(Self {
            root: dir.clone(),
            repo,
        })
    }

    /// Open an existing working copy rooted at `dir`.
    pub fn open(dir: &NormalizedPath) -> Result<Self> {
        if !dir.join(".git").exists() {
            return Err(Error::NotARepository {
                path: dir.to_native(),
            });
        }
        let repo = Repository::open(dir.to_native())?;
        Ok(Self {
            root: dir.clone(),
            repo,
        })
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Name of the branch HEAD points at.
    ///
    /// Reads the symbolic target directly so an unborn branch (fresh clone
    /// of an empty remote) still has a name.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.find_reference("HEAD")?;
        head.symbolic_target()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(str::to_string)
            .ok_or(Error::DetachedHead)
    }

    /// Commit HEAD points at, or `None` while the branch is unborn.
    pub fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stage every new, modified and deleted file.
    pub fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        Ok(())
    }

    /// Commit the index on the current branch.
    ///
    /// Returns `None` without committing when the index matches HEAD, or
    /// when there is no history and nothing staged.
    pub fn commit(&self, message: &str, signature: &Signature<'_>) -> Result<Option<Oid>> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parent = self.head_commit()?;

        match &parent {
            Some(p) if p.tree_id() == tree_id => return Ok(None),
            None if tree.is_empty() => return Ok(None),
            _ => {}
        }

        let parents: Vec<&Commit<'_>> = parent.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), signature, signature, message, &tree, &parents)?;

        tracing::debug!(commit = %oid, dir = %self.root, "Created commit");
        Ok(Some(oid))
    }

    /// Push the current branch to `origin`.
    ///
    /// A non-fast-forward push, whether refused locally by libgit2 or by
    /// the server, is reported as [`Error::PushRejected`].
    pub fn push(&self, auth: &Auth) -> Result<()> {
        let branch = self.current_branch()?;
        let mut remote = self
            .repo
            .find_remote(DEFAULT_REMOTE)
            .map_err(|_| Error::RemoteNotFound {
                name: DEFAULT_REMOTE.to_string(),
            })?;

        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        let mut rejected: Vec<String> = Vec::new();

        let outcome = {
            let mut callbacks = auth.remote_callbacks();
            callbacks.push_update_reference(|refname, status| {
                if let Some(status) = status {
                    rejected.push(format!("{refname}: {status}"));
                }
                Ok(())
            });
            let mut push_opts = PushOptions::new();
            push_opts.remote_callbacks(callbacks);
            remote.push(&[&refspec], Some(&mut push_opts))
        };

        match outcome {
            Err(e) if helpers::is_non_fast_forward(&e) => Err(Error::PushRejected {
                branch,
                message: e.message().to_string(),
            }),
            Err(e) => Err(Error::PushFailed {
                message: e.message().to_string(),
            }),
            Ok(()) if !rejected.is_empty() => Err(Error::PushRejected {
                branch,
                message: rejected.join("; "),
            }),
            Ok(()) => {
                tracing::info!(branch = %branch, dir = %self.root, "Pushed branch");
                Ok(())
            }
        }
    }

    /// Fetch the current branch from `origin` and integrate it, keeping the
    /// local side of any conflict.
    pub fn pull_mine(&self, auth: &Auth, signature: &Signature<'_>) -> Result<PullOutcome> {
        let branch = self.current_branch()?;
        let mut remote = self
            .repo
            .find_remote(DEFAULT_REMOTE)
            .map_err(|_| Error::RemoteNotFound {
                name: DEFAULT_REMOTE.to_string(),
            })?;

        let tracking = format!("refs/remotes/{DEFAULT_REMOTE}/{branch}");
        let refspec = format!("+refs/heads/{branch}:{tracking}");

        let mut fetch_opts = FetchOptions::new();
        fetch_opts.remote_callbacks(auth.remote_callbacks());
        remote
            .fetch(&[&refspec], Some(&mut fetch_opts), None)
            .map_err(|e| Error::PullFailed {
                message: format!("Fetch failed: {}", e.message()),
            })?;

        let fetched = self
            .repo
            .find_reference(&tracking)
            .map_err(|e| Error::PullFailed {
                message: format!("Could not find {tracking}: {}", e.message()),
            })?;
        let theirs = fetched.peel_to_commit().map_err(|e| Error::PullFailed {
            message: format!("Could not resolve {tracking}: {}", e.message()),
        })?;

        let annotated = self.repo.find_annotated_commit(theirs.id())?;
        let (analysis, _) = self.repo.merge_analysis(&[&annotated])?;

        if analysis.is_up_to_date() {
            return Ok(PullOutcome::UpToDate);
        }

        if analysis.is_fast_forward() || analysis.is_unborn() {
            helpers::fast_forward(&self.repo, &branch, &theirs)?;
            tracing::debug!(branch = %branch, target = %theirs.id(), "Fast-forwarded");
            return Ok(PullOutcome::FastForward);
        }

        let message = format!("Merge remote-tracking branch '{DEFAULT_REMOTE}/{branch}'");
        let resolved = helpers::merge_mine(&self.repo, &theirs, signature, &message)?;
        tracing::info!(
            branch = %branch,
            resolved,
            "Merged remote changes keeping local side"
        );
        Ok(PullOutcome::Merged { resolved })
    }
}
