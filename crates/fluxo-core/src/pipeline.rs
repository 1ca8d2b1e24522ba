//! Pipeline driver
//!
//! Ties the store feed and the enrichment engine together for one user
//! session. The backend clients are constructed by the process entry point
//! and injected here; the pipeline owns the session lifecycle, including the
//! liveness flag consulted by late enrichment completions.

use tracing::info;

use crate::classifier::ClassifierClient;
use crate::enrich::{EnrichmentEngine, EnrichmentReport};
use crate::error::Result;
use crate::models::Transaction;
use crate::store::TransactionStore;

/// One user session over the enrichment pipeline
pub struct Pipeline {
    store: TransactionStore,
    engine: EnrichmentEngine,
}

impl Pipeline {
    /// Create a pipeline from injected backend objects
    pub fn new(store: TransactionStore, classifier: ClassifierClient) -> Self {
        let engine = EnrichmentEngine::new(store.clone(), classifier);
        Self { store, engine }
    }

    /// The store this pipeline reads and writes
    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    /// The enrichment engine owned by this session
    pub fn engine(&self) -> &EnrichmentEngine {
        &self.engine
    }

    /// End the session; in-flight completions become no-ops
    pub fn shutdown(&self) {
        info!("Pipeline session ending");
        self.engine.shutdown();
    }

    /// Run the reconcile loop over live feed emissions
    ///
    /// Every emission is enriched and handed to the callback as the
    /// fallback-applied display view. Returns when the session is shut down
    /// or the subscription fails (surfaced to the caller as a generic
    /// unavailable state).
    pub async fn run<F>(&self, user_id: &str, mut on_emission: F) -> Result<()>
    where
        F: FnMut(&[Transaction], &EnrichmentReport),
    {
        let mut feed = self.store.subscribe(user_id)?;

        while self.engine.is_alive() {
            let set = feed.recv().await?;
            let report = self.engine.enrich_snapshot(&set);
            let view = self.engine.with_fallbacks(set);
            on_emission(&view, &report);
        }

        Ok(())
    }

    /// Drive enrichment until every transaction is enriched or carries a
    /// failure fallback, then return the display view
    ///
    /// One-shot variant for batch callers: failed classifications are not
    /// retried within a single call (they stay pending in the store and are
    /// retried by later sessions).
    pub async fn run_until_settled(&self, user_id: &str) -> Result<Vec<Transaction>> {
        loop {
            let set = self.store.list(user_id)?;
            let settled = set
                .iter()
                .all(|tx| tx.is_enriched() || self.engine.has_fallback(tx.id));

            if settled && self.engine.is_idle() {
                return Ok(self.engine.with_fallbacks(set));
            }

            self.engine.enrich_snapshot(&set);
            self.engine.wait_idle().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::classifier::RuleClassifier;
    use crate::models::{seed_catalog, TransactionKind};

    #[tokio::test]
    async fn test_run_until_settled_enriches_everything() {
        let store = TransactionStore::in_memory().unwrap();
        store.seed("u1", &seed_catalog(Utc::now())).unwrap();

        let pipeline = Pipeline::new(store.clone(), ClassifierClient::rules());
        let view = pipeline.run_until_settled("u1").await.unwrap();

        assert_eq!(view.len(), 7);
        assert!(view.iter().all(Transaction::is_enriched));
        // Results are persisted, not just applied to the view.
        assert!(store.list("u1").unwrap().iter().all(Transaction::is_enriched));
    }

    #[tokio::test]
    async fn test_run_until_settled_with_failing_classifier() {
        let store = TransactionStore::in_memory().unwrap();
        store.seed("u1", &seed_catalog(Utc::now())).unwrap();

        let backend = RuleClassifier::failing();
        let pipeline = Pipeline::new(
            store.clone(),
            ClassifierClient::Rules(backend.clone()),
        );
        let view = pipeline.run_until_settled("u1").await.unwrap();

        // Every transaction got exactly one attempt and a display fallback.
        assert_eq!(backend.calls(), 7);
        assert!(view
            .iter()
            .all(|tx| tx.category.as_deref() == Some("Outros")));
        // The store keeps them pending for a later session.
        assert!(store.list("u1").unwrap().iter().all(|tx| !tx.is_enriched()));
    }

    #[tokio::test]
    async fn test_run_until_settled_empty_feed() {
        let store = TransactionStore::in_memory().unwrap();
        let pipeline = Pipeline::new(store, ClassifierClient::rules());

        let view = pipeline.run_until_settled("u1").await.unwrap();
        assert!(view.is_empty());
    }

    #[tokio::test]
    async fn test_run_processes_emissions_until_shutdown() {
        let store = TransactionStore::in_memory().unwrap();
        store
            .seed(
                "u1",
                &[crate::models::TransactionSeed {
                    raw_description: "NETFLIX streaming".to_string(),
                    amount: -39.90,
                    date: Utc::now(),
                    kind: TransactionKind::Out,
                }],
            )
            .unwrap();

        let pipeline = Pipeline::new(store.clone(), ClassifierClient::rules());
        let engine = pipeline.engine().clone();

        let mut emissions = 0;
        pipeline
            .run("u1", |view, _report| {
                emissions += 1;
                // Stop once the write-back emission shows everything enriched.
                if view.iter().all(Transaction::is_enriched) {
                    engine.shutdown();
                }
            })
            .await
            .unwrap();

        // Initial emission plus at least the write-back one.
        assert!(emissions >= 2);
    }
}
