use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::completion_provider::{
    Completion, CompletionProvider, CompletionProviderError, Message, Usage,
};

#[derive(Debug, Clone)]
pub struct CompletionClientConfig {
    /// Full URL of an OpenAI-compatible `chat/completions` endpoint.
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for CompletionClientConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            timeout_secs: 60,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<UsageResponse>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct UsageResponse {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Chat completions over any OpenAI-compatible API (Groq by default).
pub struct ChatCompletionClient {
    client: Client,
    config: CompletionClientConfig,
}

impl ChatCompletionClient {
    pub fn new(config: CompletionClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    async fn complete(&self, messages: &[Message]) -> Result<Completion, CompletionProviderError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        };

        let mut builder = self.client.post(&self.config.api_url).json(&request);
        if !self.config.api_key.is_empty() {
            builder = builder.bearer_auth(&self.config.api_key);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| CompletionProviderError::NetworkError(e.without_url().to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("Completion API error ({}): {}", status, body);
            return Err(CompletionProviderError::ApiError { status, body });
        }

        let response: ChatResponse = resp
            .json()
            .await
            .map_err(|e| CompletionProviderError::MalformedResponse(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                CompletionProviderError::MalformedResponse("Response has no choices".to_string())
            })?;

        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(Completion { content, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode},
        routing::post,
    };

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    fn client(api_url: String) -> ChatCompletionClient {
        ChatCompletionClient::new(CompletionClientConfig {
            api_url,
            api_key: "secret".to_string(),
            model: "test-model".to_string(),
            ..CompletionClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_shape() {
        let messages = [Message::system("be brief"), Message::user("hi")];
        let request = ChatRequest {
            model: "m",
            messages: &messages,
            max_tokens: Some(10),
            temperature: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "model": "m",
                "messages": [
                    { "role": "system", "content": "be brief" },
                    { "role": "user", "content": "hi" }
                ],
                "max_tokens": 10
            })
        );
    }

    #[tokio::test]
    async fn test_returns_first_choice() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer secret");
                let reply = format!("{} {}", body["model"].as_str().unwrap_or(""), authorized);
                Json(serde_json::json!({
                    "choices": [{ "message": { "role": "assistant", "content": reply } }],
                    "usage": { "prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5 }
                }))
            }),
        );
        let client = client(serve(router).await);

        let completion = client.complete(&[Message::user("hi")]).await.unwrap();

        assert_eq!(completion.content, "test-model true");
        assert_eq!(completion.usage.map(|u| u.total_tokens), Some(5));
    }

    #[tokio::test]
    async fn test_error_status() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let client = client(serve(router).await);

        let result = client.complete(&[Message::user("hi")]).await;

        assert!(matches!(
            result,
            Err(CompletionProviderError::ApiError { status: 429, ref body }) if body == "slow down"
        ));
    }
}
