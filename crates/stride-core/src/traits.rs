//! Seam traits for the stride agent loop.
//!
//! - `QueryInterpreter` turns raw text into a `ParsedRequest`
//! - `ModelGateway`     asks the model for the next decision
//! - `ToolHandler`      executes one tool's side effect
//! - `ToolDispatcher`   looks tools up by name and validates their arguments
//! - `ConstraintGuard`  decides whether the loop may take its next transition
//! - `TraceWriter`      observes every appended step
//!
//! The loop only ever talks to these traits, so each collaborator can be
//! replaced by a deterministic stub in tests.

use async_trait::async_trait;
use serde_json::{Map, Value};

use stride_contracts::{
    error::StrideResult,
    guard::{LoopProgress, Verdict},
    outcome::AgentOutcome,
    query::{ConstraintSet, Intent, ParsedRequest},
    tool::{ToolInvocation, ToolResult, ToolSpec},
    trajectory::{Decision, ExecutionId, Step, Trajectory},
};

/// Extracts intent and constraints from a user's text.
#[async_trait]
pub trait QueryInterpreter: Send + Sync {
    /// Parse `raw_text`.
    ///
    /// Returns `StrideError::MalformedQuery` when no intent can be extracted.
    /// Unrecognized constraint phrases are dropped, never fatal.
    async fn parse(&self, raw_text: &str) -> StrideResult<ParsedRequest>;
}

/// The boundary to the language model.
///
/// Message formatting, provider selection and credentials live behind this
/// trait. The loop sees only decisions.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Ask for the next decision given the goal and the history so far.
    ///
    /// Fails with `StrideError::ModelUnavailable` on transport or parse errors.
    async fn ask(&self, intent: &Intent, trajectory: &Trajectory) -> StrideResult<Decision>;
}

/// The capability behind one registered tool.
///
/// Failures may be anything; the dispatcher normalizes them.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn execute(&self, arguments: Map<String, Value>) -> anyhow::Result<Value>;
}

/// Resolves tool invocations to handlers.
///
/// `invoke` never fails: unknown tools, schema violations and handler
/// failures all come back as `ToolResult { success: false, .. }`.
/// The loop drops the `invoke` future when a call times out; dropping it must
/// stop the call.
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    async fn invoke(&self, invocation: &ToolInvocation) -> ToolResult;

    /// Specs of every registered tool, for advertising to the model.
    fn specs(&self) -> Vec<ToolSpec>;
}

/// The transition guard evaluated by the loop.
///
/// Implementations must be deterministic and fast; they are called before
/// every reasoning call and before every tool dispatch.
pub trait ConstraintGuard: Send + Sync {
    /// Checked before asking the model for the next decision.
    fn before_reasoning(&self, constraints: &ConstraintSet, progress: &LoopProgress) -> Verdict;

    /// Checked once the model has chosen a tool, before it is dispatched.
    fn before_dispatch(
        &self,
        constraints: &ConstraintSet,
        progress: &LoopProgress,
        invocation: &ToolInvocation,
    ) -> Verdict;
}

/// An observer of the trajectory as it grows.
///
/// Trace failures are logged by the loop and never change the run's outcome.
pub trait TraceWriter: Send + Sync {
    /// Record a step that was just appended to the trajectory.
    fn record(&self, execution_id: &ExecutionId, step: &Step) -> StrideResult<()>;

    /// Record that the run reached its terminal state.
    fn finalize(&self, outcome: &AgentOutcome) -> StrideResult<()>;
}
