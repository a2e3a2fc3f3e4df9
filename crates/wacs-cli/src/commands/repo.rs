//! `wacs create` and `wacs list`

use colored::Colorize;
use wacs_fs::NormalizedPath;

use super::session::load_session;
use crate::error::Result;

pub async fn run_create(session: &NormalizedPath, name: &str) -> Result<()> {
    let session = load_session(session)?;
    let repo = wacs_client::create(&session.user, name, &session.endpoint).await?;

    println!("{} Created {}", "OK".green().bold(), repo.full_name.cyan());
    println!("   clone: {}", repo.clone_url);
    Ok(())
}

pub async fn run_list(session: &NormalizedPath, json: bool) -> Result<()> {
    let session = load_session(session)?;
    let repos = wacs_client::list_my_repos(&session.user, &session.endpoint).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&repos)?);
        return Ok(());
    }

    if repos.is_empty() {
        println!("No repositories.");
        return Ok(());
    }
    for repo in &repos {
        let visibility = if repo.private { "private" } else { "public" };
        println!(
            "{}  {}  {}",
            repo.name.bold(),
            visibility.dimmed(),
            repo.clone_url
        );
    }
    Ok(())
}
