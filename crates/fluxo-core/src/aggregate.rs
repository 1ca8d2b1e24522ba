//! Expense aggregation
//!
//! Groups outbound transactions by category and sums absolute amounts for
//! chart rendering. Recomputed from scratch on every pass; nothing here is
//! persisted or incrementally maintained.

use crate::models::{CategoryTotal, Transaction, TransactionKind, FALLBACK_CATEGORY};

/// Aggregate outbound spending by category
///
/// Transactions without a recognized category are folded into the sentinel
/// category so totals are never silently incomplete. Output is sorted by
/// descending total; ties keep first-encountered order (stable sort). An
/// empty input yields an empty output, not an error.
pub fn aggregate(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for tx in transactions {
        if tx.kind != TransactionKind::Out {
            continue;
        }
        let name = tx.category.as_deref().unwrap_or(FALLBACK_CATEGORY);
        match totals.iter_mut().find(|t| t.name == name) {
            Some(total) => total.value += tx.amount.abs(),
            None => totals.push(CategoryTotal {
                name: name.to_string(),
                value: tx.amount.abs(),
            }),
        }
    }

    totals.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    totals
}

/// Total outbound spend across all categories
pub fn total_expenses(totals: &[CategoryTotal]) -> f64 {
    totals.iter().map(|t| t.value).sum()
}
