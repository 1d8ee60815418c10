//! Steps and the append-only trajectory.
//!
//! The trajectory is the conversation history the model sees on every
//! reasoning call, so insertion order is significant. The only mutation the
//! type allows is appending a new step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tool::{ToolInvocation, ToolResult};

/// Unique identifier for one agent run.
///
/// Appears in every tracing event and trace record of the run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(pub uuid::Uuid);

impl ExecutionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What the model decided to do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Run a tool and report back.
    Invoke(ToolInvocation),
    /// Stop and answer the user.
    FinalAnswer { text: String },
}

/// One reply from the model gateway: its reasoning plus the chosen action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub thought: String,
    pub action: Action,
}

impl Decision {
    pub fn invoke(thought: impl Into<String>, invocation: ToolInvocation) -> Self {
        Self {
            thought: thought.into(),
            action: Action::Invoke(invocation),
        }
    }

    pub fn finish(thought: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            thought: thought.into(),
            action: Action::FinalAnswer {
                text: answer.into(),
            },
        }
    }
}

/// One completed loop iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Zero-based position in the trajectory.
    pub index: usize,
    pub thought: String,
    pub action: Action,
    /// The tool result for `Invoke` steps; absent for the final answer.
    pub observation: Option<ToolResult>,
    pub recorded_at: DateTime<Utc>,
}

impl Step {
    pub fn is_tool_call(&self) -> bool {
        matches!(self.action, Action::Invoke(_))
    }

    pub fn invocation(&self) -> Option<&ToolInvocation> {
        match &self.action {
            Action::Invoke(inv) => Some(inv),
            Action::FinalAnswer { .. } => None,
        }
    }
}

/// The ordered, append-only history of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    steps: Vec<Step>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step built from the given parts and return a reference to it.
    ///
    /// The index is assigned here so it always matches the step's position.
    pub fn append(
        &mut self,
        thought: String,
        action: Action,
        observation: Option<ToolResult>,
    ) -> &Step {
        let index = self.steps.len();
        self.steps.push(Step {
            index,
            thought,
            action,
            observation,
            recorded_at: Utc::now(),
        });
        &self.steps[index]
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Number of dispatched tool invocations so far.
    pub fn tool_calls(&self) -> usize {
        self.steps.iter().filter(|s| s.is_tool_call()).count()
    }

    /// A copy of the first `len` steps, for replaying history.
    pub fn prefix(&self, len: usize) -> Trajectory {
        Trajectory {
            steps: self.steps.iter().take(len).cloned().collect(),
        }
    }
}
