//! Constraint evaluation context and verdict types.
//!
//! The loop builds a `LoopProgress` snapshot before every reasoning call and
//! before every tool dispatch; a constraint guard turns it into a `Verdict`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The guard's decision for the next transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The loop may proceed.
    Allow,
    /// A constraint forbids proceeding; the run aborts.
    Violated {
        /// Human-readable explanation, surfaced in the outcome detail.
        reason: String,
    },
}

impl Verdict {
    pub fn violated(reason: impl Into<String>) -> Self {
        Verdict::Violated {
            reason: reason.into(),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

/// A read-only snapshot of loop state at a decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopProgress {
    /// Execution id as a string, for logging in guard implementations.
    pub execution_id: String,
    /// Steps recorded in the trajectory so far.
    pub steps: usize,
    /// Tool invocations dispatched so far.
    pub tool_calls: usize,
    /// Time since the run started.
    pub elapsed: Duration,
    /// The effective step budget (explicit constraint or configured default).
    pub step_budget: u32,
}
