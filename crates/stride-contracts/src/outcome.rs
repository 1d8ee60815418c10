//! Terminal outcome of an agent run.
//!
//! `AgentOutcome` is created exactly once, when the loop reaches its terminal
//! state. It always carries the full trajectory, whether the run completed
//! or was aborted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::ErrorKind,
    query::Intent,
    trajectory::{ExecutionId, Trajectory},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Completed,
    Aborted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutcome {
    pub execution_id: ExecutionId,
    pub intent: Intent,
    pub status: OutcomeStatus,
    /// Present only when `status` is `Completed`.
    pub final_answer: Option<String>,
    /// Present only when `status` is `Aborted`.
    pub reason: Option<ErrorKind>,
    /// Human-readable explanation accompanying `reason`.
    pub detail: Option<String>,
    pub trajectory: Trajectory,
    pub elapsed: Duration,
}

impl AgentOutcome {
    pub fn is_completed(&self) -> bool {
        self.status == OutcomeStatus::Completed
    }

    pub fn is_aborted(&self) -> bool {
        self.status == OutcomeStatus::Aborted
    }
}
