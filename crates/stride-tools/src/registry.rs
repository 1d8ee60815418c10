//! Schema-validated tool registry.
//!
//! `ToolRegistry` implements the `ToolDispatcher` trait from `stride-core`.
//! An invocation passes through three gates:
//!
//! 1. **Lookup**: exact name match, no fuzzy resolution.
//! 2. **Input validation**: the arguments object is checked against the
//!    tool's input JSON Schema with the `jsonschema` crate.
//! 3. **Execution**: the handler runs on its own task, so a panicking handler
//!    surfaces as a failed result instead of unwinding into the loop. The task
//!    is aborted if the `invoke` future is dropped, so a call the loop has
//!    timed out cannot finish its side effects later. The returned value is
//!    checked against the output schema when one is declared.
//!
//! Every failure is folded into `ToolResult { success: false, .. }`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use jsonschema::Validator;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use stride_contracts::{
    error::{ErrorKind, StrideError, StrideResult},
    tool::{ToolInvocation, ToolResult, ToolSpec},
};
use stride_core::traits::{ToolDispatcher, ToolHandler};
use tokio_util::task::AbortOnDropHandle;

/// Adapts a plain closure into a `ToolHandler`.
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(Map<String, Value>) -> anyhow::Result<Value> + Send + Sync,
{
    async fn execute(&self, arguments: Map<String, Value>) -> anyhow::Result<Value> {
        (self.0)(arguments)
    }
}

struct RegisteredTool {
    spec: ToolSpec,
    input: Validator,
    output: Option<Validator>,
    handler: Arc<dyn ToolHandler>,
}

/// The table of callable tools, keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `spec.name`.
    ///
    /// Both schemas are compiled up front; an invalid schema document is a
    /// `ConfigError`. Registering the same name twice replaces the earlier tool.
    pub fn register(&mut self, spec: ToolSpec, handler: Arc<dyn ToolHandler>) -> StrideResult<()> {
        let input = compile(&spec.name, "input", &spec.input_schema)?;
        let output = if spec.output_schema.is_null() {
            None
        } else {
            Some(compile(&spec.name, "output", &spec.output_schema)?)
        };

        debug!(tool = %spec.name, "registering tool");
        if self.tools.contains_key(&spec.name) {
            warn!(tool = %spec.name, "replacing previously registered tool");
        }

        self.tools.insert(
            spec.name.clone(),
            RegisteredTool {
                spec,
                input,
                output,
                handler,
            },
        );
        Ok(())
    }

    /// Register a synchronous closure as a tool.
    pub fn register_fn<F>(&mut self, spec: ToolSpec, f: F) -> StrideResult<()>
    where
        F: Fn(Map<String, Value>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.register(spec, Arc::new(FnHandler(f)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn spec(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name).map(|t| &t.spec)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Check that `invocation` names a registered tool and that its arguments
    /// satisfy the input schema.
    pub fn validate(&self, invocation: &ToolInvocation) -> StrideResult<()> {
        let tool = self
            .tools
            .get(&invocation.tool_name)
            .ok_or_else(|| StrideError::UnknownTool {
                name: invocation.tool_name.clone(),
            })?;

        let arguments = Value::Object(invocation.arguments.clone());
        match schema_errors(&tool.input, &arguments) {
            Some(reason) => Err(StrideError::SchemaViolation {
                tool: invocation.tool_name.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ToolDispatcher for ToolRegistry {
    async fn invoke(&self, invocation: &ToolInvocation) -> ToolResult {
        if let Err(e) = self.validate(invocation) {
            warn!(tool = %invocation.tool_name, error = %e, "tool invocation rejected");
            return ToolResult::failed(e.kind(), e.to_string());
        }

        // validate() has just confirmed the tool exists.
        let Some(tool) = self.tools.get(&invocation.tool_name) else {
            return ToolResult::failed(
                ErrorKind::UnknownTool,
                format!("unknown tool '{}'", invocation.tool_name),
            );
        };

        let handler = tool.handler.clone();
        let arguments = invocation.arguments.clone();
        let task = AbortOnDropHandle::new(tokio::spawn(async move {
            handler.execute(arguments).await
        }));
        let joined = task.await;

        let value = match joined {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                let err = StrideError::ToolFailed {
                    tool: invocation.tool_name.clone(),
                    reason: format!("{e:#}"),
                };
                return ToolResult::failed(err.kind(), err.to_string());
            }
            Err(join_error) => {
                let err = StrideError::ToolFailed {
                    tool: invocation.tool_name.clone(),
                    reason: format!("handler aborted: {join_error}"),
                };
                return ToolResult::failed(err.kind(), err.to_string());
            }
        };

        if let Some(output) = &tool.output {
            if let Some(reason) = schema_errors(output, &value) {
                let err = StrideError::SchemaViolation {
                    tool: invocation.tool_name.clone(),
                    reason: format!("output: {reason}"),
                };
                warn!(tool = %invocation.tool_name, error = %err, "tool output rejected");
                return ToolResult::failed(err.kind(), err.to_string());
            }
        }

        debug!(tool = %invocation.tool_name, "tool succeeded");
        ToolResult::ok(value)
    }

    /// Specs sorted by name, so the model sees a stable tool list.
    fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|t| t.spec.clone()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }
}

fn compile(tool: &str, which: &str, schema: &Value) -> StrideResult<Validator> {
    jsonschema::validator_for(schema).map_err(|e| StrideError::ConfigError {
        reason: format!("invalid {which} schema for tool '{tool}': {e}"),
    })
}

/// All validation errors for `instance`, joined, or `None` when it is valid.
fn schema_errors(validator: &Validator, instance: &Value) -> Option<String> {
    let messages: Vec<String> = validator
        .iter_errors(instance)
        .map(|error| {
            let path = error.instance_path.to_string();
            if path.is_empty() {
                error.to_string()
            } else {
                format!("at {path}: {error}")
            }
        })
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{json, Map, Value};

    use stride_contracts::{
        config::LoopSettings,
        error::{ErrorKind, StrideError, StrideResult},
        outcome::OutcomeStatus,
        query::{ConstraintSet, Intent, ParsedRequest},
        tool::{ToolInvocation, ToolOutput, ToolSpec},
        trajectory::{Decision, Trajectory},
    };
    use stride_core::traits::{ModelGateway, ToolDispatcher, ToolHandler};
    use stride_core::AgentLoop;

    use super::ToolRegistry;

    /// Sleeps, then records that the email went out.
    struct SlowSend {
        delay: Duration,
        sent: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ToolHandler for SlowSend {
        async fn execute(&self, _arguments: Map<String, Value>) -> anyhow::Result<Value> {
            tokio::time::sleep(self.delay).await;
            self.sent.store(true, Ordering::SeqCst);
            Ok(json!({ "sent": true }))
        }
    }

    fn slow_send_registry(sent: Arc<AtomicBool>) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolSpec::new("send_email", "Send an email"),
                Arc::new(SlowSend { delay: Duration::from_millis(1500), sent }),
            )
            .unwrap();
        registry
    }

    /// Sends once, then finishes.
    struct SendThenFinish;

    #[async_trait]
    impl ModelGateway for SendThenFinish {
        async fn ask(&self, _intent: &Intent, trajectory: &Trajectory) -> StrideResult<Decision> {
            if trajectory.is_empty() {
                Ok(Decision::invoke("send it", ToolInvocation::new("send_email", json!({}))))
            } else {
                Ok(Decision::finish("gave up", "the email could not be sent"))
            }
        }
    }

    fn calendar_spec() -> ToolSpec {
        ToolSpec::new("lookup_calendar", "List events on a date")
            .with_input_schema(json!({
                "type": "object",
                "properties": { "date": { "type": "string" } },
                "required": ["date"]
            }))
            .with_output_schema(json!({
                "type": "object",
                "properties": { "events": { "type": "array" } },
                "required": ["events"]
            }))
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn(calendar_spec(), |args| {
                let date = args["date"].as_str().unwrap_or_default().to_string();
                Ok(json!({ "events": [{ "date": date, "title": "standup" }] }))
            })
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn test_invoke_success() {
        let result = registry()
            .invoke(&ToolInvocation::new("lookup_calendar", json!({ "date": "2026-10-19" })))
            .await;

        assert!(result.success);
        match result.output {
            ToolOutput::Value(v) => assert_eq!(v["events"][0]["title"], "standup"),
            other => panic!("expected value, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_failed_result() {
        let result = registry()
            .invoke(&ToolInvocation::new("book_flight", json!({})))
            .await;

        assert!(!result.success);
        assert_eq!(result.error_kind(), Some(ErrorKind::UnknownTool));
    }

    /// Lookup is exact: no case folding or prefix matching.
    #[tokio::test]
    async fn test_lookup_is_exact_match() {
        let registry = registry();
        assert!(registry.contains("lookup_calendar"));
        assert!(!registry.contains("Lookup_Calendar"));
        assert!(!registry.contains("lookup_cal"));

        let result = registry
            .invoke(&ToolInvocation::new("Lookup_Calendar", json!({ "date": "x" })))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::UnknownTool));
    }

    #[tokio::test]
    async fn test_missing_required_field_is_schema_violation() {
        let result = registry()
            .invoke(&ToolInvocation::new("lookup_calendar", json!({ "day": "tomorrow" })))
            .await;

        assert!(!result.success);
        assert_eq!(result.error_kind(), Some(ErrorKind::SchemaViolation));
        assert!(result.observation().contains("date"), "got: {}", result.observation());
    }

    #[test]
    fn test_validate_reports_typed_errors() {
        let registry = registry();

        match registry.validate(&ToolInvocation::new("nope", json!({}))) {
            Err(StrideError::UnknownTool { name }) => assert_eq!(name, "nope"),
            other => panic!("expected UnknownTool, got {:?}", other),
        }

        match registry.validate(&ToolInvocation::new("lookup_calendar", json!({ "date": 7 }))) {
            Err(StrideError::SchemaViolation { tool, reason }) => {
                assert_eq!(tool, "lookup_calendar");
                assert!(reason.contains("/date"), "reason should point at the field: {reason}");
            }
            other => panic!("expected SchemaViolation, got {:?}", other),
        }

        assert!(registry
            .validate(&ToolInvocation::new("lookup_calendar", json!({ "date": "2026-10-19" })))
            .is_ok());
    }

    #[tokio::test]
    async fn test_handler_error_is_contained() {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn(ToolSpec::new("flaky", "always fails"), |_| {
                Err(anyhow::anyhow!("upstream returned 500"))
            })
            .unwrap();

        let result = registry.invoke(&ToolInvocation::new("flaky", json!({}))).await;

        assert!(!result.success);
        assert_eq!(result.error_kind(), Some(ErrorKind::ToolFailed));
        assert!(result.observation().contains("upstream returned 500"));
    }

    #[tokio::test]
    async fn test_handler_panic_is_contained() {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn(ToolSpec::new("explodes", "panics"), |_| panic!("boom"))
            .unwrap();

        let result = registry.invoke(&ToolInvocation::new("explodes", json!({}))).await;

        assert!(!result.success);
        assert_eq!(result.error_kind(), Some(ErrorKind::ToolFailed));
    }

    #[tokio::test]
    async fn test_output_schema_violation() {
        let mut registry = ToolRegistry::new();
        registry
            .register_fn(calendar_spec(), |_| Ok(json!({ "items": [] })))
            .unwrap();

        let result = registry
            .invoke(&ToolInvocation::new("lookup_calendar", json!({ "date": "2026-10-19" })))
            .await;

        assert_eq!(result.error_kind(), Some(ErrorKind::SchemaViolation));
        assert!(result.observation().contains("output"));
    }

    #[test]
    fn test_invalid_schema_is_config_error() {
        let mut registry = ToolRegistry::new();
        let spec = ToolSpec::new("broken", "bad schema")
            .with_input_schema(json!({ "type": "not-a-type" }));

        match registry.register_fn(spec, |_| Ok(json!(null))) {
            Err(StrideError::ConfigError { reason }) => assert!(reason.contains("broken")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_specs_sorted_by_name() {
        let mut registry = registry();
        registry
            .register_fn(ToolSpec::new("create_event", "Create an event"), |_| Ok(json!({})))
            .unwrap();

        let names: Vec<String> = registry.specs().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["create_event", "lookup_calendar"]);
    }

    // ── Timeouts ──────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_dropped_invoke_aborts_the_handler() {
        let sent = Arc::new(AtomicBool::new(false));
        let registry = slow_send_registry(sent.clone());

        let invocation = ToolInvocation::new("send_email", json!({}));
        let timed = tokio::time::timeout(Duration::from_secs(1), registry.invoke(&invocation)).await;
        assert!(timed.is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!sent.load(Ordering::SeqCst));
    }

    /// A tool the loop reports as timed out must never complete afterwards.
    #[tokio::test(start_paused = true)]
    async fn test_timed_out_tool_has_no_late_side_effect() {
        let sent = Arc::new(AtomicBool::new(false));
        let agent_loop = AgentLoop::new(
            Arc::new(SendThenFinish),
            Arc::new(slow_send_registry(sent.clone())),
        )
        .with_settings(LoopSettings { call_timeout_secs: 1, ..LoopSettings::default() });

        let outcome = agent_loop
            .execute(ParsedRequest {
                intent: Intent::new("send_email"),
                constraints: ConstraintSet::default(),
            })
            .await;

        assert_eq!(outcome.status, OutcomeStatus::Completed);
        let first = outcome.trajectory.steps()[0].observation.as_ref().unwrap();
        assert_eq!(first.error_kind(), Some(ErrorKind::Timeout));
        assert!(!sent.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!sent.load(Ordering::SeqCst));
    }
}
