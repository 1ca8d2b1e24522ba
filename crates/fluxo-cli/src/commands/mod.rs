//! Command implementations
//!
//! Each subcommand maps to one `cmd_*` function. Backend objects (store and
//! classifier client) are constructed here and injected into the pipeline.

mod analyze;
mod core;
mod sync;
mod transactions;

pub use analyze::cmd_analyze;
pub use core::{cmd_classify, cmd_init, cmd_seed, cmd_status};
pub use sync::cmd_sync;
pub use transactions::cmd_transactions;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fluxo_core::{ClassifierClient, TransactionStore};

/// Resolve the database path: explicit flag, or the platform data directory.
pub fn resolve_db_path(db: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = db {
        return Ok(path.to_path_buf());
    }

    let dir = dirs::data_dir()
        .map(|d| d.join("fluxo"))
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    Ok(dir.join("fluxo.db"))
}

/// Open the transaction store at the given path.
pub fn open_store(db: &Path) -> Result<TransactionStore> {
    TransactionStore::open(&db.to_string_lossy())
        .with_context(|| format!("Failed to open database {}", db.display()))
}

/// Build the classifier from the environment, defaulting to the in-process
/// rule table so the demo works without a remote service.
pub fn classifier_from_env() -> ClassifierClient {
    match ClassifierClient::from_env() {
        Some(client) => client,
        None => {
            tracing::debug!("No classifier configured, using the in-process rule table");
            ClassifierClient::rules()
        }
    }
}

/// Format an amount the way the statement renders it: "R$ 1234,56".
pub fn format_amount(amount: f64) -> String {
    format!("R$ {:.2}", amount.abs()).replace('.', ",")
}
