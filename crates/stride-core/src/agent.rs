//! The single entry point: raw text in, `AgentOutcome` out.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use stride_contracts::{error::StrideResult, outcome::AgentOutcome};

use crate::agent_loop::AgentLoop;
use crate::traits::QueryInterpreter;

/// Composes the query interpreter with the agent loop.
pub struct Agent {
    interpreter: Arc<dyn QueryInterpreter>,
    agent_loop: AgentLoop,
}

impl Agent {
    pub fn new(interpreter: Arc<dyn QueryInterpreter>, agent_loop: AgentLoop) -> Self {
        Self {
            interpreter,
            agent_loop,
        }
    }

    /// Interpret `raw_text` and run it to completion.
    ///
    /// # Errors
    ///
    /// Interpretation failures (`MalformedQuery`, or a model-backed
    /// interpreter's `ModelUnavailable`) are returned before the loop starts;
    /// no trajectory exists in that case. Every loop outcome, including
    /// aborts, is `Ok`.
    pub async fn run(&self, raw_text: &str) -> StrideResult<AgentOutcome> {
        self.run_with_cancel(raw_text, &CancellationToken::new())
            .await
    }

    pub async fn run_with_cancel(
        &self,
        raw_text: &str,
        cancel: &CancellationToken,
    ) -> StrideResult<AgentOutcome> {
        debug!(chars = raw_text.len(), "interpreting query");
        let request = self.interpreter.parse(raw_text).await?;

        info!(
            intent = %request.intent,
            constraints = request.constraints.len(),
            "query interpreted"
        );

        Ok(self.agent_loop.execute_with_cancel(request, cancel).await)
    }
}
