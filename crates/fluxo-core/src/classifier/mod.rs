//! Pluggable classification backend abstraction
//!
//! The enrichment engine talks to the classification service through a
//! backend-agnostic interface:
//!
//! - `Classifier` trait: the single `classify` operation plus health probing
//! - `ClassifierClient` enum: concrete wrapper providing Clone + compile-time
//!   dispatch
//! - Backend implementations: `HttpClassifier` (remote service),
//!   `RuleClassifier` (in-process rule table, also used as the test mock)
//!
//! # Configuration
//!
//! Environment variables:
//! - `FLUXO_CLASSIFIER`: Backend to use (`http`, `rules`). Default: http
//! - `CLASSIFIER_HOST`: Classification service URL (required for http)

mod http;
mod rules;

pub use http::HttpClassifier;
pub use rules::RuleClassifier;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Classification;

/// Trait defining the interface for classification backends
///
/// Backends must be Send + Sync so classify calls can run on spawned tasks.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a raw statement description into a category and a cleaned
    /// description. Empty input is still submitted; the backend decides.
    async fn classify(&self, raw_description: &str) -> Result<Classification>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the backend host (for logging)
    fn host(&self) -> &str;
}

/// Concrete classifier client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum ClassifierClient {
    /// Remote classification service over HTTP
    Http(HttpClassifier),
    /// In-process rule table
    Rules(RuleClassifier),
}

impl ClassifierClient {
    /// Create a classifier client from environment variables
    ///
    /// Checks `FLUXO_CLASSIFIER` to determine which backend to use:
    /// - `http` (default): Uses `CLASSIFIER_HOST`
    /// - `rules`: In-process rule table, no network
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("FLUXO_CLASSIFIER").unwrap_or_else(|_| "http".to_string());

        match backend.to_lowercase().as_str() {
            "http" => HttpClassifier::from_env().map(ClassifierClient::Http),
            "rules" | "mock" => Some(ClassifierClient::Rules(RuleClassifier::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown FLUXO_CLASSIFIER, falling back to http");
                HttpClassifier::from_env().map(ClassifierClient::Http)
            }
        }
    }

    /// Create an HTTP backend directly
    pub fn http(host: &str) -> Self {
        ClassifierClient::Http(HttpClassifier::new(host))
    }

    /// Create a rule-table backend
    pub fn rules() -> Self {
        ClassifierClient::Rules(RuleClassifier::new())
    }
}

#[async_trait]
impl Classifier for ClassifierClient {
    async fn classify(&self, raw_description: &str) -> Result<Classification> {
        match self {
            ClassifierClient::Http(b) => b.classify(raw_description).await,
            ClassifierClient::Rules(b) => b.classify(raw_description).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            ClassifierClient::Http(b) => b.health_check().await,
            ClassifierClient::Rules(b) => b.health_check().await,
        }
    }

    fn host(&self) -> &str {
        match self {
            ClassifierClient::Http(b) => b.host(),
            ClassifierClient::Rules(b) => b.host(),
        }
    }
}
