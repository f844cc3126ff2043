// src/services/inference.rs
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const HF_ROUTER_URL: &str = "https://router.huggingface.co/v1";
pub const MODEL: &str = "Qwen/Qwen2.5-7B-Instruct:together";
pub const MAX_TOKENS: u32 = 200;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("missing inference credential (set HF_TOKEN)")]
    MissingCredential,

    #[error("inference request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("inference provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed inference response: {0}")]
    Malformed(String),

    #[error("inference response contained no choices")]
    NoChoices,
}

/// Something that turns a single user prompt into a completion.
///
/// `Ok(None)` means the provider answered but the first choice carried no
/// text content.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, InferenceError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [PromptMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct PromptMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the Hugging Face inference router's chat-completions route.
#[derive(Clone, Debug)]
pub struct HfInferenceClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HfInferenceClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, HF_ROUTER_URL)
    }

    pub fn with_base_url(token: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            // No timeout: a hung provider holds the request open.
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl InferenceProvider for HfInferenceClient {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, InferenceError> {
        let token = self.token.as_deref().ok_or(InferenceError::MissingCredential)?;

        let body = CompletionRequest {
            model: MODEL,
            messages: [PromptMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
        };

        debug!(model = MODEL, prompt_len = prompt.len(), "calling inference provider");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(InferenceError::Status { status, body: text });
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| InferenceError::Malformed(e.to_string()))?;

        let first = parsed.choices.into_iter().next().ok_or(InferenceError::NoChoices)?;
        Ok(first.message.and_then(|m| m.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_token_fails_before_network() {
        let client = HfInferenceClient::with_base_url(None, "http://127.0.0.1:1");
        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, InferenceError::MissingCredential));
    }

    #[test]
    fn request_body_shape() {
        let body = CompletionRequest {
            model: MODEL,
            messages: [PromptMessage {
                role: "user",
                content: "hello",
            }],
            max_tokens: MAX_TOKENS,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], MODEL);
        assert_eq!(value["max_tokens"], 200);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
    }
}
