//! Test utilities for fluxo-core
//!
//! Provides a mock classification server implementing the remote service's
//! wire contract, so the HTTP backend can be exercised over a real socket in
//! development and integration tests.

use axum::{
    extract::Json,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::classifier::{Classifier, RuleClassifier};

/// Mock classification server for testing and development
pub struct MockClassifierServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockClassifierServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/api/health", get(handle_health))
            .route("/api/classify", post(handle_classify));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockClassifierServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Health endpoint response
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Classification endpoint
///
/// Delegates to the in-process rule table, so the server answers exactly
/// like the rules backend. Empty descriptions are rejected with 400, as the
/// hosted function does.
async fn handle_classify(
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, StatusCode> {
    match RuleClassifier::new().classify(&request.raw_description).await {
        Ok(classification) => Ok(Json(ClassifyResponse {
            category: classification.category,
            clean_description: classification.clean_description,
        })),
        Err(_) => Err(StatusCode::BAD_REQUEST),
    }
}

// Request/Response types for the mock server

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    raw_description: String,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    category: String,
    clean_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::HttpClassifier;

    #[tokio::test]
    async fn test_mock_server_health_check() {
        let server = MockClassifierServer::start().await;
        let client = HttpClassifier::new(&server.url());

        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_server_classify_netflix() {
        let server = MockClassifierServer::start().await;
        let client = HttpClassifier::new(&server.url());

        let result = client.classify("NETFLIX streaming").await.unwrap();
        assert_eq!(result.category, "Lazer");
    }

    #[tokio::test]
    async fn test_mock_server_classify_with_cleanup() {
        let server = MockClassifierServer::start().await;
        let client = HttpClassifier::new(&server.url());

        let result = client.classify("PGTO *UBER DO BRASIL TEC").await.unwrap();
        assert_eq!(result.category, "Transporte");
        assert_eq!(result.clean_description, "Uber Do Brasil Tec");
    }

    #[tokio::test]
    async fn test_mock_server_rejects_empty_description() {
        let server = MockClassifierServer::start().await;
        let client = HttpClassifier::new(&server.url());

        // The call is still attempted; the remote side decides.
        assert!(client.classify("").await.is_err());
    }

    #[tokio::test]
    async fn test_http_client_from_env_not_set() {
        std::env::remove_var("CLASSIFIER_HOST");
        assert!(HttpClassifier::from_env().is_none());
    }
}
