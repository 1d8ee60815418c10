//! # stride-ref-office
//!
//! Office-assistant reference runtime for the stride agent loop.
//!
//! Provides a small tool set over mock calendar and mailbox data, a scripted
//! model gateway, and five scenarios that exercise the loop end to end:
//!
//! 1. **Book a meeting**: two tool calls, then a final answer.
//! 2. **Tool-call budget**: the third call is refused and the run aborts
//!    with two steps recorded.
//! 3. **Tool failure recovery**: a schema violation is observed and the
//!    model corrects itself.
//! 4. **Scope restriction**: a tool the user ruled out aborts the run before
//!    dispatch.
//! 5. **Operator rule**: the deployment policy denies a tool for everyone.
//!
//! All data is hardcoded and fictional.

pub mod config;
pub mod gateway;
pub mod mock_data;
pub mod runtime;
pub mod scenarios;
pub mod tools;

pub use config::OfficeConfig;
pub use gateway::ScriptedGateway;
pub use runtime::{print_outcome, OfficeRuntime};
pub use tools::build_registry;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use stride_contracts::{
        error::ErrorKind,
        outcome::OutcomeStatus,
        tool::ToolInvocation,
        trajectory::{Action, Decision},
    };
    use stride_core::traits::ToolDispatcher;
    use stride_interpret::RuleInterpreter;
    use stride_policy::TomlConstraintGuard;

    use crate::{
        build_registry,
        scenarios::{
            book_meeting, operator_rule, scope_restriction, tool_budget, tool_failure,
            OFFICE_POLICY,
        },
        OfficeConfig, OfficeRuntime, ScriptedGateway,
    };

    // ── 1. tools ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_lookup_calendar_requires_date() {
        let registry = build_registry().unwrap();

        let missing = registry.invoke(&ToolInvocation::new("lookup_calendar", json!({}))).await;
        assert!(!missing.success);
        assert_eq!(missing.error_kind(), Some(ErrorKind::SchemaViolation));

        let found = registry
            .invoke(&ToolInvocation::new("lookup_calendar", json!({ "date": "2026-10-19" })))
            .await;
        assert!(found.success, "got: {}", found.observation());
        assert!(found.observation().contains("Design review"));
    }

    #[tokio::test]
    async fn test_create_event_conflict_is_tool_failure() {
        let registry = build_registry().unwrap();
        let result = registry
            .invoke(&ToolInvocation::new(
                "create_event",
                json!({ "title": "Clash", "date": "2026-10-19", "start": "09:00" }),
            ))
            .await;

        assert_eq!(result.error_kind(), Some(ErrorKind::ToolFailed));
        assert!(result.observation().contains("already booked"), "got: {}", result.observation());
    }

    #[tokio::test]
    async fn test_list_emails_filters() {
        let registry = build_registry().unwrap();
        let result = registry
            .invoke(&ToolInvocation::new(
                "list_emails",
                json!({ "unread_only": true, "from": "priya@example.com" }),
            ))
            .await;

        assert!(result.success);
        match result.output {
            stride_contracts::tool::ToolOutput::Value(value) => assert_eq!(value["count"], json!(1)),
            other => panic!("expected a value, got {:?}", other),
        }
    }

    #[test]
    fn test_registry_advertises_all_tools() {
        let registry = build_registry().unwrap();
        let names: Vec<_> = registry.specs().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["create_event", "list_emails", "lookup_calendar", "send_email"]);
    }

    // ── 2. scenarios ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_book_meeting_completes() {
        let outcome = book_meeting::run_scenario().await.unwrap();

        assert_eq!(outcome.status, OutcomeStatus::Completed);
        assert_eq!(outcome.intent.as_str(), "schedule_meeting");
        assert_eq!(outcome.trajectory.len(), 3);
        assert_eq!(outcome.trajectory.tool_calls(), 2);
        assert!(outcome.final_answer.unwrap().contains("10:00"));
    }

    #[tokio::test]
    async fn test_tool_budget_aborts_with_two_steps() {
        let outcome = tool_budget::run_scenario().await.unwrap();

        assert_eq!(outcome.status, OutcomeStatus::Aborted);
        assert_eq!(outcome.reason, Some(ErrorKind::ConstraintViolated));
        assert_eq!(outcome.trajectory.len(), 2);
        assert!(outcome
            .trajectory
            .steps()
            .iter()
            .all(|s| s.invocation().is_some_and(|i| i.tool_name == "lookup_calendar")));
    }

    #[tokio::test]
    async fn test_tool_failure_is_observed_and_recovered() {
        let outcome = tool_failure::run_scenario().await.unwrap();

        assert_eq!(outcome.status, OutcomeStatus::Completed);
        let steps = outcome.trajectory.steps();
        assert_eq!(steps.len(), 3);

        let first = steps[0].observation.as_ref().unwrap();
        assert!(!first.success);
        assert_eq!(first.error_kind(), Some(ErrorKind::SchemaViolation));
        assert!(steps[1].observation.as_ref().unwrap().success);
    }

    #[tokio::test]
    async fn test_scope_restriction_never_dispatches() {
        let outcome = scope_restriction::run_scenario().await.unwrap();

        assert_eq!(outcome.status, OutcomeStatus::Aborted);
        assert_eq!(outcome.reason, Some(ErrorKind::ConstraintViolated));
        assert_eq!(outcome.trajectory.len(), 1);
        assert!(outcome
            .trajectory
            .steps()
            .iter()
            .all(|s| s.invocation().map_or(true, |i| i.tool_name != "send_email")));
    }

    #[tokio::test]
    async fn test_operator_rule_denies_for_everyone() {
        let outcome = operator_rule::run_scenario().await.unwrap();

        assert_eq!(outcome.reason, Some(ErrorKind::ConstraintViolated));
        assert!(outcome.trajectory.is_empty());
        let detail = outcome.detail.unwrap();
        assert!(detail.contains("may read mail but not send it"), "got: {detail}");
    }

    // ── 3. runtime ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_trace_matches_trajectory() {
        let runtime = OfficeRuntime::scripted(book_meeting::script(), OFFICE_POLICY).unwrap();
        let outcome = runtime.run(book_meeting::QUERY).await.unwrap();

        let log = runtime.trace().export_log(&outcome.execution_id).unwrap();
        assert!(log.is_sealed());
        assert_eq!(log.events.len(), outcome.trajectory.len());
        assert!(runtime.trace().verify_integrity(&outcome.execution_id));

        match &log.events.last().unwrap().step.action {
            Action::FinalAnswer { .. } => {}
            other => panic!("expected the final answer last, got {:?}", other),
        }
    }

    /// office.toml caps runs at eight steps; asking for thirty does not lift it.
    #[tokio::test]
    async fn test_request_cannot_exceed_operator_step_cap() {
        let script: Vec<Decision> = (0..40)
            .map(|_| {
                Decision::invoke(
                    "Look again.",
                    ToolInvocation::new("lookup_calendar", json!({ "date": "2026-10-19" })),
                )
            })
            .collect();
        let runtime = OfficeRuntime::scripted(script, OFFICE_POLICY).unwrap();

        let outcome = runtime.run("Check my calendar in at most 30 steps").await.unwrap();

        assert_eq!(outcome.status, OutcomeStatus::Aborted);
        assert_eq!(outcome.reason, Some(ErrorKind::ConstraintViolated));
        assert_eq!(outcome.trajectory.len(), 8);
    }

    #[tokio::test]
    async fn test_empty_query_never_reaches_the_model() {
        let gateway = Arc::new(ScriptedGateway::new(book_meeting::script()));
        let policy = TomlConstraintGuard::from_toml_str(OFFICE_POLICY)
            .unwrap()
            .config()
            .clone();
        let runtime = OfficeRuntime::new(
            Arc::new(RuleInterpreter::new()),
            gateway.clone(),
            build_registry().unwrap(),
            policy,
        );

        let err = runtime.run("   ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedQuery);
        assert_eq!(gateway.calls(), 0);
    }

    #[test]
    fn test_office_config_combines_policy_and_gateway() {
        let toml = r#"
            [limits]
            default_max_steps = 5

            [[rules]]
            id = "mail-read-only"
            tool = "send_email"
            verdict = "deny"

            [gateway]
            model = "gpt-4o"
            base_url = "http://localhost:8080/v1"
        "#;

        let config = OfficeConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.policy.limits.default_max_steps, 5);
        assert_eq!(config.policy.rules.len(), 1);
        assert_eq!(config.gateway.model, "gpt-4o");
        assert_eq!(config.gateway.api_key_env, "OPENAI_API_KEY");

        let defaults = OfficeConfig::from_toml_str("").unwrap();
        assert_eq!(defaults.gateway.model, "gpt-4o-mini");
        assert!(defaults.policy.rules.is_empty());
    }
}
