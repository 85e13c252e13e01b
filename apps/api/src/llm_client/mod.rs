/// LLM Client — the single point of entry for AI text-generation calls.
///
/// No other module may call the Anthropic API directly.
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One turn of a conversation as sent to the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API. Each call is a single attempt; failures
/// go straight back to the caller.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            api_url: ANTHROPIC_API_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_api_url(api_key: String, api_url: String) -> Result<Self, LlmError> {
        Ok(Self {
            api_url,
            ..Self::new(api_key)?
        })
    }

    /// Sends a conversation and returns the full response object.
    pub async fn call(&self, system: &str, messages: &[Message]) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }

    /// Sends a conversation and returns the reply text.
    pub async fn complete(&self, system: &str, messages: &[Message]) -> Result<String, LlmError> {
        let response = self.call(system, messages).await?;
        response
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{http::StatusCode, routing::post, Json, Router};

    /// Serves `status` + `body` on a random local port and counts hits.
    async fn upstream(status: StatusCode, body: serde_json::Value) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/v1/messages",
            post(move || {
                let counter = counter.clone();
                let body = body.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (status, Json(body))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1/messages"), hits)
    }

    fn hello() -> Vec<Message> {
        vec![Message {
            role: "user".to_string(),
            content: "hi".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let (url, hits) = upstream(
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({ "error": { "message": "overloaded" } }),
        )
        .await;
        let client = LlmClient::with_api_url("key".to_string(), url).unwrap();

        let err = client.complete("sys", &hello()).await.unwrap_err();
        assert!(matches!(
            err,
            LlmError::Api { status: 503, ref message } if message == "overloaded"
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let (url, hits) = upstream(
            StatusCode::TOO_MANY_REQUESTS,
            serde_json::json!({ "error": { "message": "slow down" } }),
        )
        .await;
        let client = LlmClient::with_api_url("key".to_string(), url).unwrap();

        assert!(client.complete("sys", &hello()).await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_complete_returns_trimmed_text() {
        let (url, _) = upstream(
            StatusCode::OK,
            serde_json::json!({
                "content": [{ "type": "text", "text": "  Hello!  " }],
                "usage": { "input_tokens": 1, "output_tokens": 1 }
            }),
        )
        .await;
        let client = LlmClient::with_api_url("key".to_string(), url).unwrap();
        assert_eq!(client.complete("sys", &hello()).await.unwrap(), "Hello!");
    }

    #[test]
    fn test_response_text_picks_first_text_block() {
        let response: LlmResponse = serde_json::from_value(serde_json::json!({
            "content": [
                { "type": "tool_use" },
                { "type": "text", "text": "Hello there" }
            ],
            "usage": { "input_tokens": 3, "output_tokens": 2 }
        }))
        .unwrap();
        assert_eq!(response.text(), Some("Hello there"));
    }

    #[test]
    fn test_request_serializes_messages() {
        let messages = vec![Message {
            role: "user".to_string(),
            content: "hi".to_string(),
        }];
        let body = serde_json::to_value(AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: "sys",
            messages: &messages,
        })
        .unwrap();
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["system"], "sys");
    }
}
