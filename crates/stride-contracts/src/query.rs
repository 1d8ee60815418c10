//! Parsed request types: the intent and the constraints extracted from a query.
//!
//! A `ParsedRequest` is produced once per user query and handed to the agent
//! loop by value. Nothing mutates it afterwards.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What the user wants.
///
/// `label` is a short symbolic name (e.g. `schedule_meeting`) used for logs
/// and routing. `description` keeps the goal in the user's own words, minus
/// any constraint phrases, and is what the model is shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Intent {
    pub label: String,
    pub description: String,
}

impl Intent {
    /// An intent whose description is just its label.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            description: label.clone(),
            label,
        }
    }

    pub fn with_description(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// The broad family a constraint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    TimeLimit,
    ResourceLimit,
    ScopeRestriction,
}

/// One normalized constraint extracted from the user's text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Maximum wall-clock time for the whole request.
    TimeLimit { limit: Duration },
    /// Maximum number of loop iterations (trajectory steps).
    StepLimit { max_steps: u32 },
    /// Maximum number of dispatched tool invocations.
    ToolCallLimit { max_calls: u32 },
    /// Tools the agent must never call for this request.
    DisallowedTools { tools: BTreeSet<String> },
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::TimeLimit { .. } => ConstraintKind::TimeLimit,
            Constraint::StepLimit { .. } | Constraint::ToolCallLimit { .. } => {
                ConstraintKind::ResourceLimit
            }
            Constraint::DisallowedTools { .. } => ConstraintKind::ScopeRestriction,
        }
    }
}

/// The set of constraints attached to one request.
///
/// Several constraints of the same kind may coexist; the accessors resolve
/// them to the tightest bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSet {
    inner: Vec<Constraint>,
}

impl ConstraintSet {
    /// Add a constraint. Exact duplicates are ignored.
    pub fn insert(&mut self, constraint: Constraint) {
        if !self.inner.contains(&constraint) {
            self.inner.push(constraint);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The smallest time limit present, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.inner
            .iter()
            .filter_map(|c| match c {
                Constraint::TimeLimit { limit } => Some(*limit),
                _ => None,
            })
            .min()
    }

    /// The smallest step limit present, if any.
    pub fn step_limit(&self) -> Option<u32> {
        self.inner
            .iter()
            .filter_map(|c| match c {
                Constraint::StepLimit { max_steps } => Some(*max_steps),
                _ => None,
            })
            .min()
    }

    /// The smallest tool call limit present, if any.
    pub fn tool_call_limit(&self) -> Option<u32> {
        self.inner
            .iter()
            .filter_map(|c| match c {
                Constraint::ToolCallLimit { max_calls } => Some(*max_calls),
                _ => None,
            })
            .min()
    }

    /// True if any scope restriction disallows `tool`.
    pub fn disallows(&self, tool: &str) -> bool {
        self.inner.iter().any(|c| match c {
            Constraint::DisallowedTools { tools } => tools.contains(tool),
            _ => false,
        })
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        let mut set = ConstraintSet::default();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

/// The structured form of a user query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRequest {
    pub intent: Intent,
    pub constraints: ConstraintSet,
}
