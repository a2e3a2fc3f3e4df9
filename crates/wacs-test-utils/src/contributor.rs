//! [`ContributorDir`]: a scratch working directory for one contributor.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory standing in for one contributor's checkout.
///
/// The directory is created empty with a `wacs-` prefix and removed on drop.
///
/// # Example
///
/// ```rust,no_run
/// use wacs_test_utils::contributor::ContributorDir;
///
/// let dir = ContributorDir::new();
/// assert!(!dir.git_dir().exists());
/// ```
pub struct ContributorDir {
    temp_dir: TempDir,
}

impl Default for ContributorDir {
    fn default() -> Self {
        Self::new()
    }
}

impl ContributorDir {
    pub fn new() -> Self {
        Self {
            temp_dir: tempfile::Builder::new()
                .prefix("wacs-")
                .tempdir()
                .expect("ContributorDir::new: failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the `.git` directory a clone would create.
    pub fn git_dir(&self) -> PathBuf {
        self.root().join(".git")
    }

    /// Read a file relative to the root.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert that a clone has populated this directory.
    ///
    /// # Panics
    /// Panics if `.git` is missing or not a directory.
    pub fn assert_is_clone(&self) {
        let git_dir = self.git_dir();
        assert!(git_dir.is_dir(), "isDirectory: {}", git_dir.display());
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}
