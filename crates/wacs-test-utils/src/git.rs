//! Git remotes and inspection helpers for tests.
//!
//! Remotes are local bare repositories, so clone and push run over the
//! file transport without a server.

use std::path::{Path, PathBuf};

/// Initialises an empty bare repository named `{name}.git` under `parent`.
///
/// Returns its path, which doubles as a clone URL.
///
/// # Panics
/// Panics if `git2::Repository::init_bare` fails.
pub fn bare_remote(parent: &Path, name: &str) -> PathBuf {
    let path = parent.join(format!("{name}.git"));
    git2::Repository::init_bare(&path).unwrap_or_else(|e| {
        panic!(
            "bare_remote: failed to init bare repository at {}: {e}",
            path.display()
        )
    });
    path
}

/// Reads `file` from the tip of the branch HEAD points to in `repo_path`.
///
/// Returns `None` if the branch is unborn or the file is absent.
pub fn read_head_file(repo_path: &Path, file: &str) -> Option<String> {
    let repo = git2::Repository::open(repo_path).ok()?;
    let commit = repo.head().ok()?.peel_to_commit().ok()?;
    let entry = commit.tree().ok()?.get_path(Path::new(file)).ok()?;
    let blob = repo.find_blob(entry.id()).ok()?;
    Some(String::from_utf8_lossy(blob.content()).into_owned())
}

/// Commit summaries reachable from HEAD, newest first.
///
/// # Panics
/// Panics if the repository cannot be opened or walked.
pub fn head_history(repo_path: &Path) -> Vec<String> {
    let repo = git2::Repository::open(repo_path)
        .unwrap_or_else(|e| panic!("head_history: cannot open {}: {e}", repo_path.display()));
    let mut walk = repo.revwalk().expect("head_history: revwalk");
    if walk.push_head().is_err() {
        return Vec::new();
    }
    walk.filter_map(|oid| oid.ok())
        .filter_map(|oid| repo.find_commit(oid).ok())
        .map(|commit| commit.summary().unwrap_or_default().to_string())
        .collect()
}

/// Parent count of the commit at HEAD; 2 for a merge commit.
///
/// # Panics
/// Panics if HEAD cannot be resolved.
pub fn head_parent_count(repo_path: &Path) -> usize {
    let repo = git2::Repository::open(repo_path).expect("head_parent_count: open");
    let head = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .expect("head_parent_count: resolve HEAD");
    head.parent_count()
}
