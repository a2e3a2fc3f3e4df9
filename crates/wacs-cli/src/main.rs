//! wacs CLI
//!
//! Log in to a WACS hosting service, manage repositories, and push work.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    let Some(command) = cli.command else {
        println!("{} WACS client", "wacs".green().bold());
        println!();
        println!("Run {} for available commands.", "wacs --help".cyan());
        return Ok(());
    };

    let session = commands::session_path(cli.session.as_deref())?;

    match command {
        Commands::Login {
            endpoint,
            username,
            password,
            token_name,
        } => commands::run_login(&session, &endpoint, &username, &password, &token_name).await,
        Commands::Create { name } => commands::run_create(&session, &name).await,
        Commands::List { json } => commands::run_list(&session, json).await,
        Commands::Clone { url, dir } => commands::run_clone(&session, &url, &dir).await,
        Commands::Push { dir, message } => commands::run_push(&session, &dir, &message).await,
    }
}
