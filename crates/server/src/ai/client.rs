//! Claude API client for the Anthropic Messages API

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const MAX_TOKENS: u32 = 4096;

/// Client for the Anthropic Claude Messages API
#[derive(Clone)]
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    request_timeout: Duration,
}

/// Errors talking to the Messages API
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Claude API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("No text content in response")]
    NoText,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

/// Content block within a response; only text is used here
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Request body for the Messages API
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message>,
}

/// Response from the Messages API
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Error detail from the Messages API
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ClaudeClient {
    /// Create a new client with the given API key and model.
    ///
    /// `request_timeout` bounds a single HTTP exchange.
    pub fn new(api_key: String, model: String, request_timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self {
            http,
            api_key,
            model,
            request_timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Send a single user message with an optional system prompt, return the text response
    pub async fn message(
        &self,
        system: Option<&str>,
        user_message: &str,
    ) -> Result<String, ClientError> {
        let request = ApiRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![Message {
                role: "user",
                content: user_message.to_string(),
            }],
        };

        let response = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiError>(&body) {
                Ok(api_err) => api_err.error.message,
                Err(_) => body,
            };
            return Err(ClientError::Api { status, message });
        }

        let response = response.json::<ApiResponse>().await?;
        if response.stop_reason.as_deref() == Some("max_tokens") {
            tracing::warn!(model = %self.model, "Claude response truncated at max_tokens");
        }
        extract_text(&response)
    }
}

/// Extract the first text block from an API response
pub fn extract_text(response: &ApiResponse) -> Result<String, ClientError> {
    response
        .content
        .iter()
        .find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.clone()),
            ContentBlock::Other => None,
        })
        .ok_or(ClientError::NoText)
}
