//! Normalized path handling for cross-platform compatibility

use std::fs;
use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Working directories and file locations are passed around in this form
/// and converted to a platform-native `PathBuf` only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a relative segment.
    ///
    /// Leading separators on `segment` are ignored, so the result always
    /// stays below `self`.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let segment = segment.trim_start_matches('/');
        if segment.is_empty() {
            return self.clone();
        }
        let inner = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            None => None,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present. Dotfiles such as `.gitignore` have none.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// True when the path is missing or is a directory with no entries.
    ///
    /// Clone targets must satisfy this.
    pub fn is_empty_or_missing(&self) -> bool {
        match fs::read_dir(self.to_native()) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => !self.exists(),
        }
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
