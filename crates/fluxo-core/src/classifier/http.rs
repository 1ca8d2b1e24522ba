//! HTTP classifier backend
//!
//! Thin client for the hosted classification service. One endpoint, no
//! retries, no caching; the enrichment engine decides fallback behavior.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Classification;

use super::Classifier;

/// Client for the remote classification service
///
/// Wire contract: `POST {host}/api/classify` with `{"raw_description": ...}`
/// returns `{"category": ..., "clean_description": ...}`. Health is probed
/// via `GET {host}/api/health`.
pub struct HttpClassifier {
    http_client: Client,
    base_url: String,
}

impl Clone for HttpClassifier {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl HttpClassifier {
    /// Create a new HTTP classifier backend
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("CLASSIFIER_HOST").ok()?;
        Some(Self::new(&host))
    }
}

/// Request to the classification service
#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    raw_description: &'a str,
}

/// Response from the classification service
#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    category: String,
    clean_description: String,
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, raw_description: &str) -> Result<Classification> {
        let request = ClassifyRequest { raw_description };

        let response = self
            .http_client
            .post(format!("{}/api/classify", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Http(response.error_for_status().unwrap_err()));
        }

        let body: ClassifyResponse = response.json().await?;
        debug!(
            category = %body.category,
            clean = %body.clean_description,
            "Classifier response"
        );

        if body.category.is_empty() {
            return Err(Error::Classification(
                "Classifier returned an empty category".to_string(),
            ));
        }

        Ok(Classification {
            category: body.category,
            clean_description: body.clean_description,
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trimmed() {
        let client = HttpClassifier::new("http://localhost:8080/");
        assert_eq!(client.host(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        // Nothing listens on this port; the probe must report unhealthy
        // rather than error out.
        let client = HttpClassifier::new("http://127.0.0.1:1");
        assert!(!client.health_check().await);
    }
}
