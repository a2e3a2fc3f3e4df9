//! File I/O for working directories: locked appends and atomic writes

use std::fs::{self, OpenOptions};
use std::io::Write;

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Append `text` to `dir/filename`, creating the file if needed.
///
/// Returns the full path of the file. The containing directory must
/// already exist; a missing directory or an unwritable file is reported
/// as [`Error::Io`].
pub fn append_file_text(
    dir: &NormalizedPath,
    filename: &str,
    text: &str,
) -> Result<NormalizedPath> {
    let full_path = dir.join(filename);
    append_text(&full_path, text)?;
    Ok(full_path)
}

/// Append `text` to the file at `path`, creating it if needed.
pub fn append_text(path: &NormalizedPath, text: &str) -> Result<()> {
    let native_path = path.to_native();

    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&native_path)
        .map_err(|e| Error::io(&native_path, e))?;

    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    file.write_all(text.as_bytes())
        .map_err(|e| Error::io(&native_path, e))?;
    file.sync_all().map_err(|e| Error::io(&native_path, e))?;

    FileExt::unlock(&file).map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    tracing::trace!(path = %path, bytes = text.len(), "Appended text");
    Ok(())
}

/// Write content atomically to a file with locking.
///
/// Writes to a temp file in the same directory, then renames over the
/// target so readers never observe a partial write.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
