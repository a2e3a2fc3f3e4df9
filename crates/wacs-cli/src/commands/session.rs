//! `wacs login` and the session file other commands read

use std::path::Path;

use colored::Colorize;
use serde::{Deserialize, Serialize};
use wacs_client::{Credentials, User};
use wacs_fs::{ConfigStore, NormalizedPath};

use crate::error::{CliError, Result};

/// What `wacs login` leaves behind for later commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub endpoint: String,
    pub user: User,
}

/// Resolve the session file: the explicit path, or `<config dir>/wacs/session.json`.
pub fn session_path(explicit: Option<&Path>) -> Result<NormalizedPath> {
    match explicit {
        Some(path) => Ok(NormalizedPath::new(path)),
        None => dirs::config_dir()
            .map(|dir| NormalizedPath::new(dir.join("wacs").join("session.json")))
            .ok_or_else(|| CliError::user("Cannot determine a config directory; pass --session")),
    }
}

/// Load the session saved by `wacs login`.
pub fn load_session(path: &NormalizedPath) -> Result<Session> {
    if !path.exists() {
        return Err(CliError::user(format!(
            "Not logged in (no session at {path}). Run `wacs login` first."
        )));
    }
    Ok(ConfigStore::new().load(path)?)
}

/// Log in and persist the session.
pub async fn run_login(
    session: &NormalizedPath,
    endpoint: &str,
    username: &str,
    password: &str,
    token_name: &str,
) -> Result<()> {
    let credentials = Credentials::new(username, password);
    let user = wacs_client::login(&credentials, endpoint, token_name).await?;

    ConfigStore::new().save(
        session,
        &Session {
            endpoint: endpoint.to_string(),
            user: user.clone(),
        },
    )?;
    tracing::debug!(session = %session, "Saved session");

    println!(
        "{} Logged in as {} (token '{}')",
        "OK".green().bold(),
        user.login.cyan(),
        user.token.name
    );
    Ok(())
}
