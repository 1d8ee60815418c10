//! # stride-contracts
//!
//! Shared types and the error taxonomy for the stride agent runtime.
//!
//! Every crate in the workspace imports from here. No behavior lives in this
//! crate beyond small accessors on the data types.

pub mod config;
pub mod error;
pub mod guard;
pub mod outcome;
pub mod query;
pub mod tool;
pub mod trajectory;

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use error::{ErrorKind, StrideError};
    use query::{Constraint, ConstraintKind, ConstraintSet};
    use tool::{ToolInvocation, ToolResult};
    use trajectory::{Action, ExecutionId, Trajectory};

    // ── ConstraintSet ────────────────────────────────────────────────────────

    #[test]
    fn constraint_set_resolves_tightest_limits() {
        let set: ConstraintSet = [
            Constraint::TimeLimit { limit: Duration::from_secs(300) },
            Constraint::TimeLimit { limit: Duration::from_secs(60) },
            Constraint::StepLimit { max_steps: 8 },
            Constraint::ToolCallLimit { max_calls: 4 },
            Constraint::ToolCallLimit { max_calls: 2 },
        ]
        .into_iter()
        .collect();

        assert_eq!(set.time_limit(), Some(Duration::from_secs(60)));
        assert_eq!(set.step_limit(), Some(8));
        assert_eq!(set.tool_call_limit(), Some(2));
    }

    #[test]
    fn constraint_set_empty_has_no_limits() {
        let set = ConstraintSet::default();
        assert!(set.is_empty());
        assert_eq!(set.time_limit(), None);
        assert_eq!(set.step_limit(), None);
        assert_eq!(set.tool_call_limit(), None);
        assert!(!set.disallows("send_email"));
    }

    #[test]
    fn constraint_set_duplicate_insert_is_idempotent() {
        let mut set = ConstraintSet::default();
        set.insert(Constraint::StepLimit { max_steps: 3 });
        set.insert(Constraint::StepLimit { max_steps: 3 });
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn constraint_set_disallows_named_tools_exactly() {
        let mut set = ConstraintSet::default();
        set.insert(Constraint::DisallowedTools {
            tools: BTreeSet::from(["send_email".to_string()]),
        });

        assert!(set.disallows("send_email"));
        assert!(!set.disallows("send_emails"));
        assert!(!set.disallows("lookup_calendar"));
    }

    #[test]
    fn constraint_kinds() {
        assert_eq!(
            Constraint::TimeLimit { limit: Duration::from_secs(1) }.kind(),
            ConstraintKind::TimeLimit
        );
        assert_eq!(Constraint::StepLimit { max_steps: 1 }.kind(), ConstraintKind::ResourceLimit);
        assert_eq!(
            Constraint::ToolCallLimit { max_calls: 1 }.kind(),
            ConstraintKind::ResourceLimit
        );
        assert_eq!(
            Constraint::DisallowedTools { tools: BTreeSet::new() }.kind(),
            ConstraintKind::ScopeRestriction
        );
    }

    // ── Trajectory ───────────────────────────────────────────────────────────

    #[test]
    fn trajectory_append_assigns_sequential_indices() {
        let mut trajectory = Trajectory::new();
        trajectory.append(
            "check the calendar".to_string(),
            Action::Invoke(ToolInvocation::new("lookup_calendar", json!({ "date": "2026-10-19" }))),
            Some(ToolResult::ok(json!({ "events": [] }))),
        );
        trajectory.append(
            "done".to_string(),
            Action::FinalAnswer { text: "free all day".to_string() },
            None,
        );

        let indices: Vec<usize> = trajectory.steps().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(trajectory.tool_calls(), 1);
        assert!(!trajectory.last().unwrap().is_tool_call());
    }

    #[test]
    fn trajectory_prefix_copies_leading_steps() {
        let mut trajectory = Trajectory::new();
        for i in 0..3 {
            trajectory.append(
                format!("thought {i}"),
                Action::Invoke(ToolInvocation::new("noop", json!({}))),
                Some(ToolResult::ok(json!(i))),
            );
        }

        let prefix = trajectory.prefix(2);
        assert_eq!(prefix.len(), 2);
        assert_eq!(prefix.steps(), &trajectory.steps()[..2]);
    }

    // ── ToolInvocation / ToolResult ─────────────────────────────────────────

    #[test]
    fn invocation_from_non_object_wraps_value() {
        let inv = ToolInvocation::new("echo", json!("hi"));
        assert_eq!(inv.arguments.get("value"), Some(&json!("hi")));

        let inv = ToolInvocation::new("echo", serde_json::Value::Null);
        assert!(inv.arguments.is_empty());
    }

    #[test]
    fn tool_result_observation_text() {
        assert_eq!(ToolResult::ok(json!("plain")).observation(), "plain");
        assert_eq!(ToolResult::ok(json!({ "n": 1 })).observation(), r#"{"n":1}"#);

        let failed = ToolResult::failed(ErrorKind::SchemaViolation, "missing 'date'");
        assert!(!failed.success);
        assert_eq!(failed.error_kind(), Some(ErrorKind::SchemaViolation));
        assert_eq!(failed.observation(), "error (schema_violation): missing 'date'");
    }

    #[test]
    fn tool_result_round_trips() {
        let original = ToolResult::failed(ErrorKind::ToolFailed, "calendar offline");
        let encoded = serde_json::to_string(&original).unwrap();
        let decoded: ToolResult = serde_json::from_str(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    // ── LoopSettings ─────────────────────────────────────────────────────────

    #[test]
    fn step_budget_only_tightens() {
        let settings = config::LoopSettings { default_max_steps: 8, ..Default::default() };
        assert_eq!(settings.step_budget(None), 8);
        assert_eq!(settings.step_budget(Some(3)), 3);
        assert_eq!(settings.step_budget(Some(30)), 8);
    }

    #[test]
    fn model_attempts_are_capped() {
        let settings = config::LoopSettings { max_model_retries: u32::MAX, ..Default::default() };
        assert_eq!(settings.model_attempts(), 3);

        let settings = config::LoopSettings { max_model_retries: 0, ..Default::default() };
        assert_eq!(settings.model_attempts(), 1);
    }

    // ── ExecutionId ──────────────────────────────────────────────────────────

    #[test]
    fn execution_id_new_produces_unique_values() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| ExecutionId::new().to_string()).collect();
        assert_eq!(ids.len(), 100);
    }

    // ── Errors ───────────────────────────────────────────────────────────────

    #[test]
    fn error_kind_matches_variant() {
        assert_eq!(
            StrideError::MalformedQuery { reason: "empty".into() }.kind(),
            ErrorKind::MalformedQuery
        );
        assert_eq!(StrideError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            StrideError::ModelUnavailable { reason: "503".into() }.kind(),
            ErrorKind::ModelUnavailable
        );
    }

    #[test]
    fn error_display_messages() {
        let err = StrideError::SchemaViolation {
            tool: "lookup_calendar".to_string(),
            reason: "\"date\" is a required property".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("lookup_calendar"));
        assert!(msg.contains("required property"));

        let err = StrideError::ConstraintViolated { reason: "tool call limit of 2 reached".into() };
        assert!(err.to_string().contains("constraint violated"));
    }
}
