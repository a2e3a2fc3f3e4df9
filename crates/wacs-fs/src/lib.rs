//! Filesystem helpers for wacs working directories
//!
//! Normalized paths, locked appends, atomic writes and config loading.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigStore, Format};
pub use error::{Error, Result};
pub use io::append_file_text;
pub use path::NormalizedPath;
