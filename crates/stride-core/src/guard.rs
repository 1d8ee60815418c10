//! The built-in constraint guard.
//!
//! `BudgetGuard` enforces exactly the constraints carried by the request:
//!
//! - before reasoning: step budget, then time limit
//! - before dispatch: scope restriction, then tool call limit, then time limit
//!
//! Operator-level rules are layered on top by other guard implementations.

use tracing::warn;

use stride_contracts::{
    guard::{LoopProgress, Verdict},
    query::ConstraintSet,
    tool::ToolInvocation,
};

use crate::traits::ConstraintGuard;

#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetGuard;

impl BudgetGuard {
    fn check_time(constraints: &ConstraintSet, progress: &LoopProgress) -> Verdict {
        match constraints.time_limit() {
            Some(limit) if progress.elapsed >= limit => Verdict::violated(format!(
                "time limit of {}ms exceeded after {}ms",
                limit.as_millis(),
                progress.elapsed.as_millis()
            )),
            _ => Verdict::Allow,
        }
    }
}

impl ConstraintGuard for BudgetGuard {
    fn before_reasoning(&self, constraints: &ConstraintSet, progress: &LoopProgress) -> Verdict {
        if progress.steps >= progress.step_budget as usize {
            warn!(
                execution_id = %progress.execution_id,
                steps = progress.steps,
                step_budget = progress.step_budget,
                "step budget exhausted"
            );
            return Verdict::violated(format!(
                "step budget of {} exhausted",
                progress.step_budget
            ));
        }
        Self::check_time(constraints, progress)
    }

    fn before_dispatch(
        &self,
        constraints: &ConstraintSet,
        progress: &LoopProgress,
        invocation: &ToolInvocation,
    ) -> Verdict {
        if constraints.disallows(&invocation.tool_name) {
            warn!(
                execution_id = %progress.execution_id,
                tool = %invocation.tool_name,
                "model requested a disallowed tool"
            );
            return Verdict::violated(format!(
                "tool '{}' is disallowed for this request",
                invocation.tool_name
            ));
        }

        if let Some(max_calls) = constraints.tool_call_limit() {
            if progress.tool_calls >= max_calls as usize {
                warn!(
                    execution_id = %progress.execution_id,
                    tool_calls = progress.tool_calls,
                    max_calls,
                    "tool call limit reached"
                );
                return Verdict::violated(format!(
                    "tool call limit of {max_calls} reached; '{}' would exceed it",
                    invocation.tool_name
                ));
            }
        }

        Self::check_time(constraints, progress)
    }
}
