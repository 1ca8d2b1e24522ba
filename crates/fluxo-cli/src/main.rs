//! Fluxo CLI - Smart statement for personal finances
//!
//! Usage:
//!   fluxo init                Initialize database
//!   fluxo seed                Populate an empty account with demo records
//!   fluxo sync --once         Enrich pending transactions and exit
//!   fluxo transactions        Show the statement feed
//!   fluxo analyze             Expense chart and recommendations
//!   fluxo classify TEXT       Test the classifier on one description

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db = commands::resolve_db_path(cli.db.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&db),
        Commands::Seed => commands::cmd_seed(&db, &cli.user),
        Commands::Sync { once } => commands::cmd_sync(&db, &cli.user, once).await,
        Commands::Transactions { limit } => commands::cmd_transactions(&db, &cli.user, limit),
        Commands::Analyze => commands::cmd_analyze(&db, &cli.user).await,
        Commands::Classify { description } => commands::cmd_classify(&description).await,
        Commands::Status => commands::cmd_status(&db, &cli.user).await,
    }
}
