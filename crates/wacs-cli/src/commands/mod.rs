//! Command implementations for wacs-cli

pub mod git;
pub mod repo;
pub mod session;

pub use git::{run_clone, run_push};
pub use repo::{run_create, run_list};
pub use session::{run_login, session_path};
