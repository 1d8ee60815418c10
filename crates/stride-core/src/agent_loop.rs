//! The agent loop: an explicit state machine over reasoning and tool use.
//!
//! ```text
//!   Init → Reasoning → (Acting → Observing → Reasoning)* → Terminal
//! ```
//!
//! - **Reasoning** asks the `ConstraintGuard` first, then the `ModelGateway`.
//!   A failed or timed-out model call is retried in place (no state change,
//!   no tool re-execution) up to `LoopSettings::max_model_retries` times,
//!   capped at two.
//! - **Acting** either completes the run with the model's final answer or
//!   asks the guard once more and dispatches the tool.
//! - **Observing** appends the step and loops back to Reasoning.
//!
//! A failed tool is never fatal: its result is the step's observation and the
//! model gets another turn. Only constraint violations, exhausted model
//! retries and cancellation abort a run. Cancellation is checked at every
//! state boundary and raced against the model call, but never interrupts a
//! tool that is already running.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stride_contracts::{
    config::LoopSettings,
    error::{ErrorKind, StrideError},
    guard::{LoopProgress, Verdict},
    outcome::{AgentOutcome, OutcomeStatus},
    query::ParsedRequest,
    tool::{ToolInvocation, ToolResult},
    trajectory::{Action, Decision, ExecutionId, Trajectory},
};

use crate::guard::BudgetGuard;
use crate::traits::{ConstraintGuard, ModelGateway, ToolDispatcher, TraceWriter};

/// The enumerated states of the loop, as reported in tracing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Reasoning,
    Acting,
    Observing,
    Terminal,
}

/// Loop state together with the data each transition carries.
enum State {
    Init,
    Reasoning,
    Acting(Decision),
    Observing {
        thought: String,
        invocation: ToolInvocation,
        result: ToolResult,
    },
    Terminal(Termination),
}

impl State {
    fn phase(&self) -> Phase {
        match self {
            State::Init => Phase::Init,
            State::Reasoning => Phase::Reasoning,
            State::Acting(_) => Phase::Acting,
            State::Observing { .. } => Phase::Observing,
            State::Terminal(_) => Phase::Terminal,
        }
    }
}

enum Termination {
    Completed(String),
    Aborted { reason: ErrorKind, detail: String },
}

impl Termination {
    fn aborted(reason: ErrorKind, detail: impl Into<String>) -> Self {
        Termination::Aborted {
            reason,
            detail: detail.into(),
        }
    }

    fn cancelled() -> Self {
        Self::aborted(ErrorKind::Cancelled, StrideError::Cancelled.to_string())
    }

    fn from_verdict(verdict: Verdict) -> Option<Self> {
        match verdict {
            Verdict::Allow => None,
            Verdict::Violated { reason } => {
                Some(Self::aborted(ErrorKind::ConstraintViolated, reason))
            }
        }
    }
}

/// Per-request state. Owned exclusively by one `execute` call.
struct Run {
    execution_id: ExecutionId,
    request: ParsedRequest,
    trajectory: Trajectory,
    started: Instant,
    step_budget: u32,
}

impl Run {
    fn new(request: ParsedRequest, settings: &LoopSettings) -> Self {
        let step_budget = settings.step_budget(request.constraints.step_limit());
        Self {
            execution_id: ExecutionId::new(),
            request,
            trajectory: Trajectory::new(),
            started: Instant::now(),
            step_budget,
        }
    }

    fn progress(&self) -> LoopProgress {
        LoopProgress {
            execution_id: self.execution_id.to_string(),
            steps: self.trajectory.len(),
            tool_calls: self.trajectory.tool_calls(),
            elapsed: self.started.elapsed(),
            step_budget: self.step_budget,
        }
    }

    /// The allowance for the next model or tool call: the configured cap,
    /// shortened to whatever remains of the request's time limit.
    fn call_timeout(&self, settings: &LoopSettings) -> Duration {
        let cap = settings.call_timeout();
        match self.request.constraints.time_limit() {
            Some(limit) => cap.min(limit.saturating_sub(self.started.elapsed())),
            None => cap,
        }
    }
}

/// Drives one request at a time through the reasoning/tool-use cycle.
///
/// Collaborators are shared behind `Arc`s and never mutated, so a single
/// `AgentLoop` can serve concurrent requests; every `execute` call owns its
/// own trajectory.
pub struct AgentLoop {
    gateway: Arc<dyn ModelGateway>,
    tools: Arc<dyn ToolDispatcher>,
    guard: Arc<dyn ConstraintGuard>,
    trace: Option<Arc<dyn TraceWriter>>,
    settings: LoopSettings,
}

impl AgentLoop {
    /// Create a loop enforcing only the request's own constraints, with
    /// default settings and no trace writer.
    pub fn new(gateway: Arc<dyn ModelGateway>, tools: Arc<dyn ToolDispatcher>) -> Self {
        Self {
            gateway,
            tools,
            guard: Arc::new(BudgetGuard),
            trace: None,
            settings: LoopSettings::default(),
        }
    }

    pub fn with_guard(mut self, guard: Arc<dyn ConstraintGuard>) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_trace(mut self, trace: Arc<dyn TraceWriter>) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn with_settings(mut self, settings: LoopSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &LoopSettings {
        &self.settings
    }

    /// Run `request` to a terminal state.
    pub async fn execute(&self, request: ParsedRequest) -> AgentOutcome {
        self.execute_with_cancel(request, &CancellationToken::new()).await
    }

    /// Run `request` to a terminal state, aborting with `Cancelled` once
    /// `cancel` fires.
    pub async fn execute_with_cancel(
        &self,
        request: ParsedRequest,
        cancel: &CancellationToken,
    ) -> AgentOutcome {
        let mut run = Run::new(request, &self.settings);
        let mut state = State::Init;

        let termination = loop {
            debug!(
                execution_id = %run.execution_id,
                step = run.trajectory.len(),
                phase = ?state.phase(),
                "loop transition"
            );

            state = match state {
                State::Terminal(termination) => break termination,

                // A tool that already ran is always recorded, even when the
                // caller cancelled while it was running.
                State::Observing {
                    thought,
                    invocation,
                    result,
                } => self.observe(&mut run, thought, invocation, result),

                _ if cancel.is_cancelled() => State::Terminal(Termination::cancelled()),

                State::Init => {
                    info!(
                        execution_id = %run.execution_id,
                        intent = %run.request.intent,
                        constraints = run.request.constraints.len(),
                        step_budget = run.step_budget,
                        "agent run starting"
                    );
                    State::Reasoning
                }

                State::Reasoning => self.reason(&run, cancel).await,

                State::Acting(decision) => self.act(&mut run, decision).await,
            };
        };

        self.finish(run, termination)
    }

    // ── Reasoning ────────────────────────────────────────────────────────────

    async fn reason(&self, run: &Run, cancel: &CancellationToken) -> State {
        let attempts = self.settings.model_attempts();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            // Constraints are evaluated against current state before every
            // model call, retries included.
            let verdict = self
                .guard
                .before_reasoning(&run.request.constraints, &run.progress());
            if let Some(termination) = Termination::from_verdict(verdict) {
                return State::Terminal(termination);
            }

            let timeout = run.call_timeout(&self.settings);
            let call = self.gateway.ask(&run.request.intent, &run.trajectory);

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return State::Terminal(Termination::cancelled()),
                result = tokio::time::timeout(timeout, call) => result,
            };

            let error = match result {
                Ok(Ok(decision)) => {
                    debug!(
                        execution_id = %run.execution_id,
                        step = run.trajectory.len(),
                        attempt,
                        "model decision received"
                    );
                    return State::Acting(decision);
                }
                Ok(Err(e)) => e,
                Err(_) => StrideError::Timeout {
                    millis: timeout.as_millis(),
                },
            };

            warn!(
                execution_id = %run.execution_id,
                step = run.trajectory.len(),
                attempt,
                max_attempts = attempts,
                error = %error,
                "model call failed"
            );
            last_error = error.to_string();
        }

        State::Terminal(Termination::aborted(
            ErrorKind::ModelUnavailable,
            format!("model call failed {attempts} times; last error: {last_error}"),
        ))
    }

    // ── Acting ───────────────────────────────────────────────────────────────

    async fn act(&self, run: &mut Run, decision: Decision) -> State {
        let Decision { thought, action } = decision;

        let invocation = match action {
            Action::FinalAnswer { text } => {
                self.append(
                    run,
                    thought,
                    Action::FinalAnswer { text: text.clone() },
                    None,
                );
                return State::Terminal(Termination::Completed(text));
            }
            Action::Invoke(invocation) => invocation,
        };

        let verdict =
            self.guard
                .before_dispatch(&run.request.constraints, &run.progress(), &invocation);
        if let Some(termination) = Termination::from_verdict(verdict) {
            return State::Terminal(termination);
        }

        debug!(
            execution_id = %run.execution_id,
            step = run.trajectory.len(),
            tool = %invocation.tool_name,
            "dispatching tool"
        );

        let timeout = run.call_timeout(&self.settings);
        let result = match tokio::time::timeout(timeout, self.tools.invoke(&invocation)).await {
            Ok(result) => result,
            Err(_) => ToolResult::failed(
                ErrorKind::Timeout,
                format!(
                    "tool '{}' did not finish within {}ms",
                    invocation.tool_name,
                    timeout.as_millis()
                ),
            ),
        };

        if !result.success {
            warn!(
                execution_id = %run.execution_id,
                step = run.trajectory.len(),
                tool = %invocation.tool_name,
                observation = %result.observation(),
                "tool failed; returning failure to the model"
            );
        }

        State::Observing {
            thought,
            invocation,
            result,
        }
    }

    // ── Observing ────────────────────────────────────────────────────────────

    fn observe(
        &self,
        run: &mut Run,
        thought: String,
        invocation: ToolInvocation,
        result: ToolResult,
    ) -> State {
        self.append(run, thought, Action::Invoke(invocation), Some(result));
        State::Reasoning
    }

    fn append(
        &self,
        run: &mut Run,
        thought: String,
        action: Action,
        observation: Option<ToolResult>,
    ) {
        let step = run.trajectory.append(thought, action, observation);
        if let Some(trace) = &self.trace {
            if let Err(e) = trace.record(&run.execution_id, step) {
                warn!(
                    execution_id = %run.execution_id,
                    step = step.index,
                    error = %e,
                    "trace write failed"
                );
            }
        }
    }

    // ── Terminal ─────────────────────────────────────────────────────────────

    fn finish(&self, run: Run, termination: Termination) -> AgentOutcome {
        let elapsed = run.started.elapsed();
        let (status, final_answer, reason, detail) = match termination {
            Termination::Completed(answer) => {
                (OutcomeStatus::Completed, Some(answer), None, None)
            }
            Termination::Aborted { reason, detail } => {
                (OutcomeStatus::Aborted, None, Some(reason), Some(detail))
            }
        };

        match (&reason, &detail) {
            (Some(reason), Some(detail)) => warn!(
                execution_id = %run.execution_id,
                steps = run.trajectory.len(),
                reason = %reason,
                detail = %detail,
                "agent run aborted"
            ),
            _ => info!(
                execution_id = %run.execution_id,
                steps = run.trajectory.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "agent run completed"
            ),
        }

        let outcome = AgentOutcome {
            execution_id: run.execution_id,
            intent: run.request.intent,
            status,
            final_answer,
            reason,
            detail,
            trajectory: run.trajectory,
            elapsed,
        };

        if let Some(trace) = &self.trace {
            if let Err(e) = trace.finalize(&outcome) {
                warn!(
                    execution_id = %outcome.execution_id,
                    error = %e,
                    "trace finalize failed"
                );
            }
        }

        outcome
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
