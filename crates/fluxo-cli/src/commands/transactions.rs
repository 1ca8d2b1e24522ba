//! Statement feed listing

use std::path::Path;

use anyhow::Result;
use fluxo_core::{category_meta, TransactionKind};

use super::{format_amount, open_store};

pub fn cmd_transactions(db: &Path, user: &str, limit: usize) -> Result<()> {
    let store = open_store(db)?;
    let mut transactions = store.list(user)?;

    if transactions.is_empty() {
        println!("No transactions recorded for account '{}'.", user);
        println!("Run `fluxo seed` to load the demonstration records.");
        return Ok(());
    }

    // Feed order is the adapter's business; the display sorts by date.
    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    for tx in transactions.iter().take(limit) {
        let meta = category_meta(tx.category.as_deref(), tx.kind);
        let description = tx
            .clean_description
            .as_deref()
            .unwrap_or("Processando...");
        let sign = match tx.kind {
            TransactionKind::In => '+',
            TransactionKind::Out => '-',
        };

        println!(
            "{} {:<28} {:<12} {} {} {}",
            meta.symbol,
            description,
            meta.label,
            tx.date.format("%d/%m/%Y"),
            sign,
            format_amount(tx.amount)
        );
    }

    if transactions.len() > limit {
        println!("... and {} more (use --limit)", transactions.len() - limit);
    }

    Ok(())
}
