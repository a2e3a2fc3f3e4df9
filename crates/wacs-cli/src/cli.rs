//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// wacs - Work with repositories on a WACS hosting service
#[derive(Parser, Debug)]
#[command(name = "wacs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Session file holding the endpoint and token from `wacs login`
    #[arg(long, global = true, env = "WACS_SESSION")]
    pub session: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Log in and store an access token for later commands
    Login {
        /// API base URL, e.g. https://git.example.org/api/v1
        #[arg(long, env = "WACS_ENDPOINT")]
        endpoint: String,

        /// Account name
        #[arg(short, long, env = "WACS_USERNAME")]
        username: String,

        /// Account password
        #[arg(short, long, env = "WACS_PASSWORD", hide_env_values = true)]
        password: String,

        /// Name of the access token to issue
        #[arg(long, default_value = "wacs-cli")]
        token_name: String,
    },

    /// Create a repository
    Create {
        /// Repository name
        name: String,
    },

    /// List your repositories
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Clone a repository into a directory
    Clone {
        /// Clone URL, as printed by `wacs create` or `wacs list`
        url: String,

        /// Target directory (must be empty or absent)
        dir: PathBuf,
    },

    /// Commit all changes in a clone and push them
    ///
    /// Conflicting remote changes are merged keeping your version.
    Push {
        /// Working copy directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Commit message
        #[arg(short, long)]
        message: String,
    },
}
