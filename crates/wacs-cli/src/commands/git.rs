//! `wacs clone` and `wacs push`

use std::path::Path;

use colored::Colorize;
use wacs_client::{PullOutcome, PushPolicy};
use wacs_fs::NormalizedPath;

use super::session::load_session;
use crate::error::Result;

pub async fn run_clone(session: &NormalizedPath, url: &str, dir: &Path) -> Result<()> {
    let session = load_session(session)?;
    wacs_client::clone(&session.user, dir, url).await?;

    println!("{} Cloned into {}", "OK".green().bold(), dir.display());
    Ok(())
}

pub async fn run_push(session: &NormalizedPath, dir: &Path, message: &str) -> Result<()> {
    let session = load_session(session)?;
    let report =
        wacs_client::commit_and_push_with(&session.user, dir, message, PushPolicy::default())
            .await?;

    match report.commit {
        Some(oid) => println!("{} Committed {}", "OK".green().bold(), oid),
        None => println!("{} Nothing to commit", "--".dimmed()),
    }
    for outcome in &report.integrations {
        if let PullOutcome::Merged { resolved } = outcome {
            println!(
                "{} Merged remote changes ({} conflict(s) kept as yours)",
                "!!".yellow().bold(),
                resolved
            );
        }
    }
    println!("{} Pushed", "OK".green().bold());
    Ok(())
}
