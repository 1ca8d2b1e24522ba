//! Enrichment sync loop

use std::path::Path;

use anyhow::{Context, Result};
use fluxo_core::{Pipeline, Transaction};

use super::{classifier_from_env, open_store};

/// Drive the enrichment pipeline for one account
///
/// With `--once`, settles the current set and exits. Otherwise follows the
/// live feed until Ctrl-C; a lost subscription surfaces as a generic
/// unavailable state rather than a stack trace.
pub async fn cmd_sync(db: &Path, user: &str, once: bool) -> Result<()> {
    let store = open_store(db)?;
    let pipeline = Pipeline::new(store, classifier_from_env());

    if once {
        let view = pipeline.run_until_settled(user).await?;
        let enriched = view.iter().filter(|t| t.is_enriched()).count();
        println!(
            "Settled {} transaction(s) for account '{}' ({} categorized)",
            view.len(),
            user,
            enriched
        );
        return Ok(());
    }

    println!("Following the feed for account '{}' (Ctrl-C to stop)...", user);

    let result = tokio::select! {
        res = pipeline.run(user, print_emission) => res,
        _ = tokio::signal::ctrl_c() => {
            pipeline.shutdown();
            println!("\nStopped.");
            return Ok(());
        }
    };

    result.context("The transaction feed is temporarily unavailable")
}

fn print_emission(view: &[Transaction], report: &fluxo_core::EnrichmentReport) {
    let pending = view.len() - view.iter().filter(|t| t.is_enriched()).count();
    println!(
        "feed: {} transaction(s), {} pending, {} classification(s) scheduled",
        view.len(),
        pending,
        report.scheduled
    );
}
