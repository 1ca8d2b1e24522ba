//! Incremental enrichment engine
//!
//! Drives every not-yet-enriched transaction in an emitted set through the
//! classifier and persists successful results. Because write-backs re-trigger
//! feed emissions before in-flight calls resolve, the engine tracks in-flight
//! transaction ids and skips them on re-emission: at most one outstanding
//! classification call per transaction id at any time.
//!
//! Classification failures are not persisted. The failed transaction gets a
//! transient fallback (sentinel category plus a truncated description) that
//! is only applied to the display view; the stored row stays pending and is
//! retried naturally on the next emission.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::classifier::{Classifier, ClassifierClient};
use crate::models::{Classification, Transaction, FALLBACK_CATEGORY};
use crate::store::TransactionStore;

/// Characters of the raw description kept by the failure fallback.
const FALLBACK_PREFIX_LEN: usize = 25;

/// Outcome of one reconcile pass over an emitted set
#[derive(Debug, Clone, Default)]
pub struct EnrichmentReport {
    /// Transactions already enriched in this emission
    pub enriched: usize,
    /// Classification tasks spawned by this pass
    pub scheduled: usize,
    /// Pending transactions skipped because a call was already in flight
    pub skipped_in_flight: usize,
}

/// Reconciles emitted transaction sets against the classifier
///
/// The in-flight set is the only shared mutable state in the pipeline core
/// and is owned exclusively by this engine.
#[derive(Clone)]
pub struct EnrichmentEngine {
    store: TransactionStore,
    classifier: ClassifierClient,
    in_flight: Arc<Mutex<HashSet<i64>>>,
    fallbacks: Arc<Mutex<HashMap<i64, Classification>>>,
    alive: Arc<AtomicBool>,
    idle_notify: Arc<Notify>,
}

impl EnrichmentEngine {
    /// Create an engine for the given store and classifier backend
    pub fn new(store: TransactionStore, classifier: ClassifierClient) -> Self {
        Self {
            store,
            classifier,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            fallbacks: Arc::new(Mutex::new(HashMap::new())),
            alive: Arc::new(AtomicBool::new(true)),
            idle_notify: Arc::new(Notify::new()),
        }
    }

    /// Whether no classification calls are outstanding
    pub fn is_idle(&self) -> bool {
        self.in_flight.lock().map(|s| s.is_empty()).unwrap_or(true)
    }

    /// Wait until every outstanding classification call has completed
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle_notify.notified();
            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }

    /// Whether a transient failure fallback is recorded for a transaction
    pub fn has_fallback(&self, transaction_id: i64) -> bool {
        self.fallbacks
            .lock()
            .map(|f| f.contains_key(&transaction_id))
            .unwrap_or(false)
    }

    /// Whether the owning session is still live
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// End the owning session: completions arriving after this skip their
    /// write-back.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Reconcile one emitted set
    ///
    /// Spawns one classification task per eligible pending transaction and
    /// returns immediately; completions persist their own results. Calling
    /// this again with the same set while calls are outstanding schedules
    /// nothing new.
    pub fn enrich_snapshot(&self, snapshot: &[Transaction]) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();

        for tx in snapshot {
            if tx.is_enriched() {
                report.enriched += 1;
                // The store caught up; the transient fallback is obsolete.
                if let Ok(mut fallbacks) = self.fallbacks.lock() {
                    fallbacks.remove(&tx.id);
                }
                continue;
            }

            let scheduled = {
                let mut in_flight = match self.in_flight.lock() {
                    Ok(guard) => guard,
                    Err(_) => {
                        warn!(id = tx.id, "In-flight registry poisoned, skipping");
                        continue;
                    }
                };
                in_flight.insert(tx.id)
            };

            if !scheduled {
                debug!(id = tx.id, "Classification already in flight, skipping");
                report.skipped_in_flight += 1;
                continue;
            }

            report.scheduled += 1;
            let engine = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                engine.enrich_one(tx).await;
            });
        }

        report
    }

    /// Apply transient failure fallbacks to an emitted set for display
    ///
    /// Pending transactions with a recorded fallback appear enriched in the
    /// returned view; the stored rows are untouched.
    pub fn with_fallbacks(&self, mut snapshot: Vec<Transaction>) -> Vec<Transaction> {
        if let Ok(fallbacks) = self.fallbacks.lock() {
            for tx in snapshot.iter_mut().filter(|tx| !tx.is_enriched()) {
                if let Some(fallback) = fallbacks.get(&tx.id) {
                    tx.category = Some(fallback.category.clone());
                    tx.clean_description = Some(fallback.clean_description.clone());
                }
            }
        }
        snapshot
    }

    /// Classify one pending transaction and persist or fall back
    async fn enrich_one(&self, tx: Transaction) {
        let result = self.classifier.classify(&tx.raw_description).await;

        match result {
            Ok(classification) => {
                if !self.is_alive() {
                    debug!(id = tx.id, "Session ended, dropping enrichment result");
                } else {
                    match self.store.write_enrichment(
                        &tx.user_id,
                        tx.id,
                        &classification.category,
                        &classification.clean_description,
                    ) {
                        Ok(()) => {
                            if let Ok(mut fallbacks) = self.fallbacks.lock() {
                                fallbacks.remove(&tx.id);
                            }
                            debug!(
                                id = tx.id,
                                category = %classification.category,
                                "Enrichment persisted"
                            );
                        }
                        // Row stays pending; the next emission retries it.
                        Err(e) => warn!(id = tx.id, error = %e, "Enrichment write failed"),
                    }
                }
            }
            Err(e) => {
                warn!(id = tx.id, error = %e, "Classification failed, applying fallback");
                let fallback = Classification {
                    category: FALLBACK_CATEGORY.to_string(),
                    clean_description: tx
                        .raw_description
                        .chars()
                        .take(FALLBACK_PREFIX_LEN)
                        .collect(),
                };
                if let Ok(mut fallbacks) = self.fallbacks.lock() {
                    fallbacks.insert(tx.id, fallback);
                }
            }
        }

        let drained = match self.in_flight.lock() {
            Ok(mut in_flight) => {
                in_flight.remove(&tx.id);
                in_flight.is_empty()
            }
            Err(_) => true,
        };
        if drained {
            self.idle_notify.notify_waiters();
        }
    }
}
