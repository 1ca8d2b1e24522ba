//! Fluxo Core Library
//!
//! Shared functionality for the Fluxo smart-statement tool:
//! - Transaction store with per-user live feeds
//! - Pluggable classification backends (remote HTTP service, in-process rules)
//! - Incremental enrichment engine with in-flight deduplication
//! - Expense aggregation by category
//! - Rule-based spending recommendations

pub mod aggregate;
pub mod category;
pub mod classifier;
pub mod enrich;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod recommend;
pub mod store;

/// Test utilities including the mock classification server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{aggregate, total_expenses};
pub use category::{category_meta, CategoryMeta};
pub use classifier::{Classifier, ClassifierClient, HttpClassifier, RuleClassifier};
pub use enrich::{EnrichmentEngine, EnrichmentReport};
pub use error::{Error, Result};
pub use models::{
    seed_catalog, CategoryTotal, Classification, Recommendation, RecommendationKind, Transaction,
    TransactionKind, TransactionSeed, FALLBACK_CATEGORY, OPENING_BALANCE,
};
pub use pipeline::Pipeline;
pub use recommend::{auto_insurance_offer, insurance_offer_recommendation, recommend};
pub use store::{TransactionFeed, TransactionStore};
