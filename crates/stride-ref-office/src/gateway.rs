//! A deterministic stand-in for the model.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use stride_contracts::{
    error::StrideResult,
    query::Intent,
    trajectory::{Decision, Trajectory},
};
use stride_core::traits::ModelGateway;

/// Replays a fixed list of decisions, picking the one at the trajectory's
/// current length.
///
/// Because the choice depends only on the history, replaying a trajectory
/// prefix yields the same next decision. Once the script runs out the
/// gateway answers with a fixed final answer.
#[derive(Debug)]
pub struct ScriptedGateway {
    script: Vec<Decision>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new(script: Vec<Decision>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times the loop has asked for a decision.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn ask(&self, _intent: &Intent, trajectory: &Trajectory) -> StrideResult<Decision> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .script
            .get(trajectory.len())
            .cloned()
            .unwrap_or_else(|| Decision::finish("script exhausted", "I have nothing more to do.")))
    }
}
