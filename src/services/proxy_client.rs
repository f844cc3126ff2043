// src/services/proxy_client.rs
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::message::{ChatRequest, ChatResponse};

#[derive(Debug, Error)]
pub enum TransportError {
    /// The proxy could not be reached or the body could not be read.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// Non-success status; carries the raw response body.
    #[error("{0}")]
    Api(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

/// How the chat view reaches the proxy endpoint.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_prompt(&self, prompt: &str) -> Result<ChatResponse, TransportError>;
}

#[derive(Clone, Debug)]
pub struct ProxyClient {
    http: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatTransport for ProxyClient {
    async fn send_prompt(&self, prompt: &str) -> Result<ChatResponse, TransportError> {
        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&ChatRequest::new(prompt))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            if text.is_empty() {
                return Err(TransportError::Api("API error".to_string()));
            }
            return Err(TransportError::Api(text));
        }

        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
