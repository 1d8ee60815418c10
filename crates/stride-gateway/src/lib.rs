//! # stride-gateway
//!
//! Model-facing adapters for the stride runtime.
//!
//! - [`OpenAiGateway`] implements
//!   [`ModelGateway`](stride_core::traits::ModelGateway) over any
//!   OpenAI-compatible chat-completions endpoint with function calling.
//! - [`ModelInterpreter`] implements
//!   [`QueryInterpreter`](stride_core::traits::QueryInterpreter) by asking
//!   the same endpoint for `{intent, constraints}`.
//!
//! Both read a [`GatewayConfig`]; the API key comes from the environment
//! variable it names.

mod client;
pub mod config;
pub mod interpreter;
pub mod openai;
mod wire;

pub use config::GatewayConfig;
pub use interpreter::ModelInterpreter;
pub use openai::OpenAiGateway;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use stride_contracts::{
        error::{ErrorKind, StrideError},
        query::Intent,
        tool::{ToolInvocation, ToolResult, ToolSpec},
        trajectory::{Action, Trajectory},
    };

    use crate::{
        config::GatewayConfig,
        interpreter::parse_interpretation,
        openai::{build_messages, decision_from_message},
        wire::{ChatMessage, ChatResponse},
        OpenAiGateway,
    };

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn reply(body: serde_json::Value) -> ChatMessage {
        let response: ChatResponse = serde_json::from_value(body).unwrap();
        response.choices.into_iter().next().unwrap().message
    }

    fn unset_config() -> GatewayConfig {
        GatewayConfig {
            api_key_env: "STRIDE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..GatewayConfig::default()
        }
    }

    // ── 1. config ─────────────────────────────────────────────────────────────

    #[test]
    fn test_config_defaults_and_partial_override() {
        let config: GatewayConfig = serde_json::from_value(json!({ "model": "gpt-4o" })).unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        match OpenAiGateway::new(&unset_config(), Vec::new()) {
            Err(StrideError::ConfigError { reason }) => {
                assert!(reason.contains("STRIDE_TEST_KEY_THAT_IS_NEVER_SET"), "got: {reason}");
            }
            Err(other) => panic!("expected ConfigError, got {:?}", other),
            Ok(_) => panic!("expected ConfigError, got a gateway"),
        }
    }

    #[test]
    fn test_completions_url_tolerates_trailing_slash() {
        let config = GatewayConfig {
            base_url: "http://localhost:11434/v1/".to_string(),
            ..GatewayConfig::default()
        };
        assert_eq!(config.completions_url(), "http://localhost:11434/v1/chat/completions");
    }

    // ── 2. message rendering ──────────────────────────────────────────────────

    #[test]
    fn test_empty_trajectory_renders_system_and_goal() {
        let messages = build_messages(&Intent::new("schedule_meeting"), &Trajectory::new());

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content.as_deref(), Some("Goal: schedule_meeting"));
    }

    #[test]
    fn test_goal_message_carries_the_description() {
        let intent =
            Intent::with_description("schedule_meeting", "Book a meeting with Dana tomorrow at 10");
        let messages = build_messages(&intent, &Trajectory::new());

        assert_eq!(
            messages[1].content.as_deref(),
            Some("Goal: Book a meeting with Dana tomorrow at 10\nIntent: schedule_meeting")
        );
    }

    #[test]
    fn test_tool_steps_render_as_call_and_result_pairs() {
        let mut trajectory = Trajectory::new();
        trajectory.append(
            "check the day first".to_string(),
            Action::Invoke(ToolInvocation::new("lookup_calendar", json!({ "date": "2026-10-19" }))),
            Some(ToolResult::ok(json!("free after 10:00"))),
        );
        trajectory.append(
            String::new(),
            Action::Invoke(ToolInvocation::new("create_event", json!({}))),
            Some(ToolResult::failed(ErrorKind::SchemaViolation, "\"title\" is a required property")),
        );

        let messages = build_messages(&Intent::new("schedule_meeting"), &trajectory);
        assert_eq!(messages.len(), 6);

        let call = &messages[2];
        assert_eq!(call.role, "assistant");
        assert_eq!(call.content.as_deref(), Some("check the day first"));
        let calls = call.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].id, "call_0");
        assert_eq!(calls[0].function.name, "lookup_calendar");
        let arguments: serde_json::Value = serde_json::from_str(&calls[0].function.arguments).unwrap();
        assert_eq!(arguments, json!({ "date": "2026-10-19" }));

        let result = &messages[3];
        assert_eq!(result.role, "tool");
        assert_eq!(result.tool_call_id.as_deref(), Some("call_0"));
        assert_eq!(result.content.as_deref(), Some("free after 10:00"));

        // An empty thought is omitted rather than sent as "".
        assert_eq!(messages[4].content, None);
        let failure = messages[5].content.as_deref().unwrap();
        assert!(failure.contains("schema_violation"), "got: {failure}");
    }

    // ── 3. reply parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_tool_call_reply_becomes_invocation() {
        let message = reply(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "Let me look at tomorrow.",
                    "tool_calls": [
                        {
                            "id": "call_abc",
                            "type": "function",
                            "function": { "name": "lookup_calendar", "arguments": "{\"date\":\"2026-10-19\"}" }
                        },
                        {
                            "id": "call_def",
                            "type": "function",
                            "function": { "name": "list_emails", "arguments": "{}" }
                        }
                    ]
                }
            }]
        }));

        let decision = decision_from_message(message).unwrap();
        assert_eq!(decision.thought, "Let me look at tomorrow.");
        match decision.action {
            Action::Invoke(invocation) => {
                assert_eq!(invocation.tool_name, "lookup_calendar");
                assert_eq!(invocation.arguments["date"], json!("2026-10-19"));
            }
            other => panic!("expected Invoke, got {:?}", other),
        }
    }

    #[test]
    fn test_content_reply_becomes_final_answer() {
        let message = reply(json!({
            "choices": [{ "message": { "role": "assistant", "content": "  Booked for 10:00.  " } }]
        }));

        match decision_from_message(message).unwrap().action {
            Action::FinalAnswer { text } => assert_eq!(text, "Booked for 10:00."),
            other => panic!("expected FinalAnswer, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_arguments_are_an_empty_object() {
        let message = reply(json!({
            "choices": [{ "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{ "id": "c", "type": "function", "function": { "name": "list_emails", "arguments": "" } }]
            } }]
        }));

        match decision_from_message(message).unwrap().action {
            Action::Invoke(invocation) => assert!(invocation.arguments.is_empty()),
            other => panic!("expected Invoke, got {:?}", other),
        }
    }

    #[test]
    fn test_unusable_replies_are_model_unavailable() {
        let empty = reply(json!({ "choices": [{ "message": { "role": "assistant", "content": "" } }] }));
        let bad_args = reply(json!({
            "choices": [{ "message": {
                "role": "assistant",
                "tool_calls": [{ "id": "c", "type": "function", "function": { "name": "x", "arguments": "{not json" } }]
            } }]
        }));

        for message in [empty, bad_args] {
            match decision_from_message(message) {
                Err(err) => assert_eq!(err.kind(), ErrorKind::ModelUnavailable),
                other => panic!("expected ModelUnavailable, got {:?}", other),
            }
        }
    }

    // ── 4. model interpretation ───────────────────────────────────────────────

    #[test]
    fn test_interpretation_normalizes_and_drops_phrases() {
        let parsed = parse_interpretation(
            r#"```json
            {"intent": "reply_email", "constraints": ["within 5 minutes", "only emails from last week", "without using send_email"]}
            ```"#,
        )
        .unwrap();

        assert_eq!(parsed.intent.as_str(), "reply_email");
        assert_eq!(parsed.constraints.len(), 2);
        assert_eq!(parsed.constraints.time_limit(), Some(Duration::from_secs(300)));
        assert!(parsed.constraints.disallows("send_email"));
    }

    #[test]
    fn test_interpretation_keeps_the_goal_description() {
        let parsed = parse_interpretation(
            r#"{"intent": "Book a meeting with Dana tomorrow at 10", "label": "schedule_meeting", "constraints": ["within 2 tool calls"]}"#,
        )
        .unwrap();

        assert_eq!(parsed.intent.as_str(), "schedule_meeting");
        assert_eq!(parsed.intent.description(), "Book a meeting with Dana tomorrow at 10");
        assert_eq!(parsed.constraints.tool_call_limit(), Some(2));
    }

    #[test]
    fn test_missing_label_is_derived_from_description() {
        let parsed = parse_interpretation(
            r#"{"intent": "Reply to Dana's email about the offsite", "constraints": []}"#,
        )
        .unwrap();

        assert_eq!(parsed.intent.as_str(), "reply_to_dana_s_email_about_the_offsite");
        assert_eq!(parsed.intent.description(), "Reply to Dana's email about the offsite");
    }

    #[test]
    fn test_interpretation_without_intent_is_malformed() {
        assert!(matches!(
            parse_interpretation(r#"{"intent": "  ", "constraints": []}"#),
            Err(StrideError::MalformedQuery { .. })
        ));
        assert!(matches!(
            parse_interpretation("Sure! The intent is scheduling."),
            Err(StrideError::ModelUnavailable { .. })
        ));
    }

    #[test]
    fn test_tool_specs_are_advertised_as_functions() {
        let spec = ToolSpec::new("lookup_calendar", "Look up events").with_input_schema(json!({
            "type": "object",
            "required": ["date"],
            "properties": { "date": { "type": "string" } }
        }));
        let tool = crate::openai::function_tool(spec);
        let rendered = serde_json::to_value(&tool).unwrap();

        assert_eq!(rendered["type"], json!("function"));
        assert_eq!(rendered["function"]["name"], json!("lookup_calendar"));
        assert_eq!(rendered["function"]["parameters"]["required"], json!(["date"]));
    }
}
