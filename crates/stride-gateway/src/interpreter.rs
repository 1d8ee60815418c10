//! A `QueryInterpreter` that asks the model for intent and constraints.
//!
//! The model replies with `{"intent": "...", "label": "...", "constraints": [...]}`
//! where `intent` describes the goal in plain words. When `label` is missing
//! it is derived from the description. Each constraint phrase goes through the same normalizer the rule-based
//! interpreter uses; phrases it does not recognize are dropped.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use stride_contracts::{
    error::{StrideError, StrideResult},
    query::{ConstraintSet, Intent, ParsedRequest},
};
use stride_core::traits::QueryInterpreter;
use stride_interpret::{normalize_constraint, snake_label};

use crate::{
    client::ChatClient,
    config::GatewayConfig,
    wire::{ChatMessage, ChatRequest},
};

const SYSTEM_PROMPT: &str = "You are a natural language compiler. Given a user request, extract \
the core intent as a short and clear description of the user's goal, keeping who, what and when \
but leaving out any constraints. Also give a short snake_case label for it (for example \
schedule_meeting or reply_email). List every constraint phrase exactly as the user wrote it \
(time limits, tool or step budgets, tools the user does not want used). Respond with JSON only, \
in this shape: {\"intent\": \"<description>\", \"label\": \"<label>\", \"constraints\": [\"<phrase>\", ...]}";

#[derive(Debug, Deserialize)]
struct Interpretation {
    #[serde(default)]
    intent: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    constraints: Vec<String>,
}

pub struct ModelInterpreter {
    client: ChatClient,
}

impl ModelInterpreter {
    pub fn new(config: &GatewayConfig) -> StrideResult<Self> {
        Ok(Self {
            client: ChatClient::new(config)?,
        })
    }
}

#[async_trait]
impl QueryInterpreter for ModelInterpreter {
    async fn parse(&self, raw_text: &str) -> StrideResult<ParsedRequest> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Err(StrideError::MalformedQuery {
                reason: "query is empty".to_string(),
            });
        }

        let config = self.client.config();
        let request = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(trimmed)],
            temperature: config.temperature,
            tools: Vec::new(),
            tool_choice: None,
        };

        let reply = self.client.complete(&request).await?;
        parse_interpretation(reply.content.as_deref().unwrap_or_default())
    }
}

/// Models often wrap JSON in a fenced code block.
fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Turn the model's JSON reply into a `ParsedRequest`.
pub(crate) fn parse_interpretation(content: &str) -> StrideResult<ParsedRequest> {
    let parsed: Interpretation =
        serde_json::from_str(strip_fences(content)).map_err(|e| StrideError::ModelUnavailable {
            reason: format!("interpretation is not valid JSON: {}", e),
        })?;

    let description = parsed.intent.trim();
    let label = parsed
        .label
        .as_deref()
        .and_then(snake_label)
        .or_else(|| snake_label(description));
    let Some(label) = label else {
        return Err(StrideError::MalformedQuery {
            reason: "model returned no intent".to_string(),
        });
    };
    let intent = if description.is_empty() {
        Intent::new(label)
    } else {
        Intent::with_description(label, description)
    };

    let mut constraints = ConstraintSet::default();
    for phrase in &parsed.constraints {
        match normalize_constraint(phrase) {
            Some(constraint) => constraints.insert(constraint),
            None => debug!(phrase = %phrase, "dropping unrecognized constraint phrase"),
        }
    }

    Ok(ParsedRequest {
        intent,
        constraints,
    })
}
