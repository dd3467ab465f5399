use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, Error as ReqwestError, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};

#[derive(Serialize)]
pub struct EmbeddingsRequest {
    pub text: TextInput,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Deserialize)]
pub struct EmbeddingsResponse {
    pub embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub service_url: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
    /// Delay before the first retry; later retries grow by `backoff_factor`.
    pub initial_backoff: Duration,
}

impl Default for EmbeddingsClientConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8080/embed".to_string(),
            max_retries: 3,
            timeout_secs: 30,
            backoff_factor: 1.5,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingsError {
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Embedding service returned {status}: {body}")]
    StatusError { status: StatusCode, body: String },
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl EmbeddingsError {
    /// Client errors will fail the same way on every attempt.
    fn is_retryable(&self) -> bool {
        match self {
            EmbeddingsError::StatusError { status, .. } => !status.is_client_error(),
            _ => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    config: EmbeddingsClientConfig,
}

impl InferenceClient {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn get_embedding(&self, text: &str) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let request = EmbeddingsRequest {
            text: TextInput::Single(text.to_string()),
        };

        self.send_request(request).await
    }

    pub async fn get_embeddings(&self, texts: &[String]) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let request = EmbeddingsRequest {
            text: TextInput::Multiple(texts.to_vec()),
        };

        self.send_request(request).await
    }

    async fn send_request(
        &self,
        request: EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_request(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if !e.is_retryable() || attempts > self.config.max_retries => {
                    return Err(e);
                }
                Err(e) => {
                    let backoff_time = self
                        .config
                        .initial_backoff
                        .mul_f64(self.config.backoff_factor.powi(attempts as i32 - 1));

                    tracing::warn!(
                        "Embedding request failed (attempt {}): {}, retrying in {:?}",
                        attempts,
                        e,
                        backoff_time
                    );
                    tokio::time::sleep(backoff_time).await;
                }
            }
        }
    }

    async fn execute_request(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let response = self
            .client
            .post(&self.config.service_url)
            .json(request)
            .send()
            .await
            .map_err(|e| EmbeddingsError::RequestError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingsError::StatusError { status, body });
        }

        response
            .json::<EmbeddingsResponse>()
            .await
            .map_err(|e| EmbeddingsError::ParseError(e.to_string()))
    }
}

/// [`EmbeddingProvider`] backed by the remote embedding service.
pub struct InferenceEmbeddingProvider {
    client: InferenceClient,
}

impl InferenceEmbeddingProvider {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }
}

impl From<EmbeddingsError> for EmbeddingProviderError {
    fn from(error: EmbeddingsError) -> Self {
        match error {
            EmbeddingsError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
            EmbeddingsError::StatusError { status, .. } if status.is_server_error() => {
                EmbeddingProviderError::ServiceUnavailable
            }
            other => EmbeddingProviderError::ApiError(other.to_string()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for InferenceEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vector, EmbeddingProviderError> {
        if text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "Cannot embed empty text".to_string(),
            ));
        }

        let response = self.client.get_embedding(text).await?;

        response
            .embeddings
            .into_iter()
            .next()
            .map(Vector::from)
            .ok_or_else(|| EmbeddingProviderError::ApiError("No embeddings returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self.client.get_embeddings(texts).await?;

        if response.embeddings.len() != texts.len() {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Expected {} embeddings, received {}",
                texts.len(),
                response.embeddings.len()
            )));
        }

        Ok(response.embeddings.into_iter().map(Vector::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode as HttpStatus, routing::post};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/embed", addr)
    }

    fn provider(service_url: String) -> InferenceEmbeddingProvider {
        let client = InferenceClient::new(EmbeddingsClientConfig {
            service_url,
            max_retries: 2,
            timeout_secs: 5,
            backoff_factor: 1.5,
            initial_backoff: Duration::from_millis(1),
        })
        .unwrap();
        InferenceEmbeddingProvider::new(client)
    }

    #[test]
    fn test_request_shape() {
        let single = serde_json::to_value(EmbeddingsRequest {
            text: TextInput::Single("Hello world".to_string()),
        })
        .unwrap();
        let multiple = serde_json::to_value(EmbeddingsRequest {
            text: TextInput::Multiple(vec!["Hello".to_string(), "World".to_string()]),
        })
        .unwrap();

        assert_eq!(single, serde_json::json!({ "text": "Hello world" }));
        assert_eq!(multiple, serde_json::json!({ "text": ["Hello", "World"] }));
    }

    #[tokio::test]
    async fn test_batch_embeddings() {
        let router = Router::new().route(
            "/embed",
            post(|Json(body): Json<serde_json::Value>| async move {
                let count = body["text"].as_array().map(Vec::len).unwrap_or(1);
                Json(serde_json::json!({ "embeddings": vec![vec![0.5, 0.5]; count] }))
            }),
        );
        let provider = provider(serve(router).await);

        let vectors = provider
            .embed_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].as_slice(), &[0.5, 0.5]);
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/embed",
            post(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(HttpStatus::SERVICE_UNAVAILABLE)
                    } else {
                        Ok(Json(serde_json::json!({ "embeddings": [[1.0, 0.0]] })))
                    }
                }
            }),
        );
        let provider = provider(serve(router).await);

        let vector = provider.embed("hello").await.unwrap();

        assert_eq!(vector.as_slice(), &[1.0, 0.0]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/embed",
            post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { HttpStatus::INTERNAL_SERVER_ERROR }
            }),
        );
        let provider = provider(serve(router).await);

        let result = provider.embed("hello").await;

        assert!(matches!(result, Err(EmbeddingProviderError::ServiceUnavailable)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/embed",
            post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { HttpStatus::BAD_REQUEST }
            }),
        );
        let provider = provider(serve(router).await);

        let result = provider.embed("hello").await;

        assert!(matches!(result, Err(EmbeddingProviderError::ApiError(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
