//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fluxo - Smart statement for personal finances
#[derive(Parser)]
#[command(name = "fluxo")]
#[command(about = "Categorize, aggregate and analyze your statement", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Account identifier to operate on
    #[arg(short, long, default_value = "demo", global = true)]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Populate an empty account with the demonstration records
    Seed,

    /// Enrich pending transactions through the classifier
    Sync {
        /// Settle the current set and exit instead of following the feed
        #[arg(long)]
        once: bool,
    },

    /// Show the statement feed
    Transactions {
        /// Maximum number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Expense chart by category plus recommendations
    Analyze,

    /// Test the classifier on a single description
    Classify {
        /// Raw statement description, e.g. "PGTO *UBER DO BRASIL TEC"
        description: String,
    },

    /// Show account and backend status
    Status,
}
