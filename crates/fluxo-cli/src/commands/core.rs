//! init, seed, status and classify commands

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use fluxo_core::{seed_catalog, Classifier};

use super::{classifier_from_env, format_amount, open_store};

pub fn cmd_init(db: &Path) -> Result<()> {
    let store = open_store(db)?;
    println!("Database initialized at {}", store.path());
    Ok(())
}

/// Seed the demonstration records into an empty account
///
/// Refuses to seed a non-empty account: the seed exists only to populate an
/// empty feed for demonstration. Failures surface to the user.
pub fn cmd_seed(db: &Path, user: &str) -> Result<()> {
    let store = open_store(db)?;

    let existing = store.count(user).context("Failed to inspect the account")?;
    if existing > 0 {
        bail!(
            "Account '{}' already has {} transaction(s); seed only populates an empty account",
            user,
            existing
        );
    }

    let ids = store
        .seed(user, &seed_catalog(Utc::now()))
        .context("Seeding failed, no records were created")?;
    println!("Seeded {} transactions for account '{}'", ids.len(), user);
    println!("Run `fluxo sync --once` to categorize them.");
    Ok(())
}

/// One-off classifier test, bypassing the store entirely
pub async fn cmd_classify(description: &str) -> Result<()> {
    let classifier = classifier_from_env();
    println!("Backend: {}", classifier.host());

    let classification = classifier
        .classify(description)
        .await
        .context("Classification failed")?;

    println!("Category:    {}", classification.category);
    println!("Description: {}", classification.clean_description);
    Ok(())
}

pub async fn cmd_status(db: &Path, user: &str) -> Result<()> {
    let store = open_store(db)?;
    let transactions = store.list(user)?;
    let enriched = transactions.iter().filter(|t| t.is_enriched()).count();

    println!("Database:  {}", store.path());
    println!("Account:   {}", user);
    println!("Records:   {} ({} categorized, {} pending)",
        transactions.len(),
        enriched,
        transactions.len() - enriched
    );
    println!("Balance:   {}", format_amount(store.balance(user)?));

    let classifier = classifier_from_env();
    let healthy = classifier.health_check().await;
    println!(
        "Classifier: {} ({})",
        classifier.host(),
        if healthy { "reachable" } else { "unreachable" }
    );
    Ok(())
}
