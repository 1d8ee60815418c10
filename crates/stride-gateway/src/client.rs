//! Thin HTTP client for an OpenAI-compatible `/chat/completions` endpoint.

use reqwest::Client;
use tracing::debug;

use stride_contracts::error::{StrideError, StrideResult};

use crate::{
    config::GatewayConfig,
    wire::{ChatMessage, ChatRequest, ChatResponse},
};

fn unavailable(reason: impl Into<String>) -> StrideError {
    StrideError::ModelUnavailable {
        reason: reason.into(),
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ChatClient {
    http: Client,
    config: GatewayConfig,
    api_key: String,
}

impl ChatClient {
    pub fn new(config: &GatewayConfig) -> StrideResult<Self> {
        let api_key = config.api_key()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| StrideError::ConfigError {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            config: config.clone(),
            api_key,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Send one request and return the first choice's message.
    ///
    /// Transport, HTTP status and decoding failures are all
    /// `ModelUnavailable`.
    pub async fn complete(&self, request: &ChatRequest) -> StrideResult<ChatMessage> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "sending chat completion"
        );

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| unavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(unavailable(format!("HTTP {}: {}", status.as_u16(), body.trim())));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("undecodable response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| unavailable("response contained no choices"))
    }
}
