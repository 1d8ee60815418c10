//! Wiring for the office reference runtime.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use stride_contracts::{
    error::StrideResult,
    outcome::AgentOutcome,
    trajectory::{Action, Decision},
};
use stride_audit::InMemoryTraceWriter;
use stride_core::{
    traits::{ModelGateway, QueryInterpreter},
    Agent, AgentLoop,
};
use stride_interpret::RuleInterpreter;
use stride_policy::{PolicyConfig, TomlConstraintGuard};
use stride_tools::ToolRegistry;

use crate::{gateway::ScriptedGateway, tools::build_registry};

/// An `Agent` over the office tools, with a hash-chained trace attached.
pub struct OfficeRuntime {
    agent: Agent,
    trace: Arc<InMemoryTraceWriter>,
}

impl OfficeRuntime {
    pub fn new(
        interpreter: Arc<dyn QueryInterpreter>,
        gateway: Arc<dyn ModelGateway>,
        registry: ToolRegistry,
        policy: PolicyConfig,
    ) -> Self {
        let trace = Arc::new(InMemoryTraceWriter::new());
        let agent_loop = AgentLoop::new(gateway, Arc::new(registry))
            .with_settings(policy.limits.clone())
            .with_guard(Arc::new(TomlConstraintGuard::new(policy)))
            .with_trace(trace.clone());

        Self {
            agent: Agent::new(interpreter, agent_loop),
            trace,
        }
    }

    /// Rule-based interpreter, scripted model, office tools, and the policy
    /// parsed from `policy_toml`.
    pub fn scripted(script: Vec<Decision>, policy_toml: &str) -> StrideResult<Self> {
        let policy = TomlConstraintGuard::from_toml_str(policy_toml)?.config().clone();
        Ok(Self::new(
            Arc::new(RuleInterpreter::new()),
            Arc::new(ScriptedGateway::new(script)),
            build_registry()?,
            policy,
        ))
    }

    pub async fn run(&self, raw_text: &str) -> StrideResult<AgentOutcome> {
        self.agent.run(raw_text).await
    }

    pub async fn run_with_cancel(
        &self,
        raw_text: &str,
        cancel: &CancellationToken,
    ) -> StrideResult<AgentOutcome> {
        self.agent.run_with_cancel(raw_text, cancel).await
    }

    pub fn trace(&self) -> &InMemoryTraceWriter {
        &self.trace
    }
}

/// Print an outcome the way the demo CLI shows it.
pub fn print_outcome(outcome: &AgentOutcome, trace: &InMemoryTraceWriter) {
    println!("  Intent:      {}", outcome.intent);
    println!("  Goal:        {}", outcome.intent.description());
    for step in outcome.trajectory.steps() {
        match &step.action {
            Action::Invoke(invocation) => {
                let observation = step
                    .observation
                    .as_ref()
                    .map(|r| r.observation())
                    .unwrap_or_default();
                println!(
                    "  Step {}:      {}({}) -> {}",
                    step.index,
                    invocation.tool_name,
                    serde_json::Value::Object(invocation.arguments.clone()),
                    truncate(&observation, 96)
                );
            }
            Action::FinalAnswer { .. } => println!("  Step {}:      final answer", step.index),
        }
    }

    match (&outcome.final_answer, outcome.reason) {
        (Some(answer), _) => println!("  Completed:   {}", answer),
        (None, Some(reason)) => println!(
            "  Aborted:     {} ({})",
            reason,
            outcome.detail.as_deref().unwrap_or("no detail")
        ),
        (None, None) => println!("  Aborted"),
    }

    let verified = trace.verify_integrity(&outcome.execution_id);
    let events = trace
        .export_log(&outcome.execution_id)
        .map_or(0, |log| log.events.len());
    println!(
        "  Trace:       {} ({} event(s), {:?} elapsed)",
        if verified { "VERIFIED" } else { "FAILED" },
        events,
        outcome.elapsed
    );
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max).collect();
    format!("{head}...")
}
