//! `ModelGateway` over OpenAI-compatible function calling.
//!
//! The trajectory is replayed as chat history: each tool step becomes an
//! assistant message carrying one tool call (`call_{index}`) followed by a
//! tool message with the observation. The reply's first tool call becomes
//! the next invocation; plain content becomes the final answer.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use stride_contracts::{
    error::{StrideError, StrideResult},
    query::Intent,
    tool::{ToolInvocation, ToolSpec},
    trajectory::{Action, Decision, Trajectory},
};
use stride_core::traits::ModelGateway;

use crate::{
    client::ChatClient,
    config::GatewayConfig,
    wire::{ChatMessage, ChatRequest, FunctionCall, FunctionDef, FunctionTool, ToolCall},
};

const SYSTEM_PROMPT: &str = "You are a task agent. Work toward the user's goal by calling the \
available tools, one call at a time, and read each tool result before deciding what to do next. \
If a tool fails, adjust the arguments or try another tool. When the goal is met, or cannot be \
met with the tools you have, reply with a short final answer in plain text and no tool call.";

pub struct OpenAiGateway {
    client: ChatClient,
    tools: Vec<FunctionTool>,
}

impl OpenAiGateway {
    /// Build a gateway advertising `tools` to the model.
    ///
    /// Fails with `ConfigError` if the API key variable is unset.
    pub fn new(config: &GatewayConfig, tools: Vec<ToolSpec>) -> StrideResult<Self> {
        Ok(Self {
            client: ChatClient::new(config)?,
            tools: tools.into_iter().map(function_tool).collect(),
        })
    }

    fn request(&self, intent: &Intent, trajectory: &Trajectory) -> ChatRequest {
        let config = self.client.config();
        ChatRequest {
            model: config.model.clone(),
            messages: build_messages(intent, trajectory),
            temperature: config.temperature,
            tools: self.tools.clone(),
            tool_choice: (!self.tools.is_empty()).then(|| json!("auto")),
        }
    }
}

#[async_trait]
impl ModelGateway for OpenAiGateway {
    async fn ask(&self, intent: &Intent, trajectory: &Trajectory) -> StrideResult<Decision> {
        let request = self.request(intent, trajectory);
        let message = self.client.complete(&request).await?;
        let decision = decision_from_message(message)?;

        debug!(
            intent = %intent,
            step = trajectory.len(),
            final_answer = matches!(decision.action, Action::FinalAnswer { .. }),
            "model decided"
        );
        Ok(decision)
    }
}

pub(crate) fn function_tool(spec: ToolSpec) -> FunctionTool {
    FunctionTool {
        kind: "function".to_string(),
        function: FunctionDef {
            name: spec.name,
            description: spec.description,
            parameters: spec.input_schema,
        },
    }
}

fn call_id(index: usize) -> String {
    format!("call_{index}")
}

/// Render the goal and the history as chat messages.
pub(crate) fn build_messages(intent: &Intent, trajectory: &Trajectory) -> Vec<ChatMessage> {
    let goal = if intent.description() == intent.as_str() {
        format!("Goal: {}", intent.description())
    } else {
        format!("Goal: {}\nIntent: {}", intent.description(), intent.as_str())
    };
    let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(goal)];

    for step in trajectory.steps() {
        match &step.action {
            Action::Invoke(invocation) => {
                let call = ToolCall {
                    id: call_id(step.index),
                    kind: "function".to_string(),
                    function: FunctionCall {
                        name: invocation.tool_name.clone(),
                        arguments: Value::Object(invocation.arguments.clone()).to_string(),
                    },
                };
                let observation = step
                    .observation
                    .as_ref()
                    .map(|result| result.observation())
                    .unwrap_or_else(|| "no result was recorded".to_string());

                messages.push(ChatMessage::assistant_call(&step.thought, call));
                messages.push(ChatMessage::tool_result(call_id(step.index), observation));
            }
            Action::FinalAnswer { text } => messages.push(ChatMessage::assistant(text.clone())),
        }
    }

    messages
}

/// Map a reply message to the loop's next decision.
pub(crate) fn decision_from_message(message: ChatMessage) -> StrideResult<Decision> {
    let thought = message.content.unwrap_or_default().trim().to_string();

    if let Some(call) = message.tool_calls.and_then(|calls| calls.into_iter().next()) {
        let arguments = parse_arguments(&call.function)?;
        let invocation = ToolInvocation::new(call.function.name, Value::Object(arguments));
        return Ok(Decision::invoke(thought, invocation));
    }

    if thought.is_empty() {
        return Err(StrideError::ModelUnavailable {
            reason: "reply had neither content nor a tool call".to_string(),
        });
    }
    Ok(Decision::finish(String::new(), thought))
}

fn parse_arguments(call: &FunctionCall) -> StrideResult<Map<String, Value>> {
    if call.arguments.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(&call.arguments) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StrideError::ModelUnavailable {
            reason: format!("arguments for '{}' are not an object: {}", call.name, other),
        }),
        Err(e) => Err(StrideError::ModelUnavailable {
            reason: format!("arguments for '{}' are not valid JSON: {}", call.name, e),
        }),
    }
}
