// @zen-component: RELAY-ChatClient
//
//! Upstream chat API client.
//!
//! One POST per prompt, bearer-authenticated, bounded by a request timeout.
//! No retry: any failure ends the relay request.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RelayError, RelayResult};
use crate::models::{ChatRequest, ChatResponse};

pub const DEFAULT_API_URL: &str = "https://api.cohere.com/v2/chat";
pub const DEFAULT_MODEL: &str = "command-a-03-2025";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for [`ChatClient`].
#[derive(Clone, Debug)]
pub struct ChatClientConfig {
    /// Full chat endpoint URL.
    pub api_url: String,
    /// Bearer credential.
    pub api_key: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// System turn prepended to every prompt.
    pub system_prompt: String,
    /// Upper bound on a whole request, connect through body.
    pub timeout: Duration,
}

impl ChatClientConfig {
    /// Config with the given credential and defaults for everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChatClient {
    http: Client,
    config: ChatClientConfig,
}

impl ChatClient {
    pub fn new(config: ChatClientConfig) -> RelayResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RelayError::Request(format!("client build failed: {e}")))?;
        Ok(Self { http, config })
    }

    /// Sends `prompt` as the user turn and returns the normalised reply.
    pub async fn complete(&self, prompt: &str) -> RelayResult<ChatResponse> {
        let body = ChatRequest::new(&self.config.model, &self.config.system_prompt, prompt);

        debug!(url = %self.config.api_url, model = %self.config.model, "sending chat request");

        let resp = self
            .http
            .post(self.config.api_url.as_str())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            warn!(status = status.as_u16(), "chat API returned an error status");
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                RelayError::Timeout(self.config.timeout)
            } else {
                RelayError::Decode(e.to_string())
            }
        })?;

        Ok(ChatResponse::from_value(value))
    }

    fn transport_error(&self, e: reqwest::Error) -> RelayError {
        if e.is_timeout() {
            RelayError::Timeout(self.config.timeout)
        } else {
            RelayError::Request(e.to_string())
        }
    }
}
