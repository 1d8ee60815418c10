//! Loop-wide limits shared by every request.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Step budget applied when a request carries no step limit, and the ceiling
/// for requests that do.
pub const DEFAULT_MAX_STEPS: u32 = 10;

/// Extra attempts for a failed model call before the run aborts. Also the
/// most retries any configuration can ask for.
pub const DEFAULT_MAX_MODEL_RETRIES: u32 = 2;

/// Upper bound on any single model or tool call.
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 60;

/// Limits that apply to every run of an `AgentLoop`.
///
/// Deserializes from a `[limits]` TOML table; every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopSettings {
    pub default_max_steps: u32,
    pub max_model_retries: u32,
    pub call_timeout_secs: u64,
}

impl LoopSettings {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Step budget for one request. A request may tighten the operator's
    /// budget but never raise it.
    pub fn step_budget(&self, requested: Option<u32>) -> u32 {
        requested.map_or(self.default_max_steps, |n| n.min(self.default_max_steps))
    }

    /// Model calls allowed per reasoning turn: one plus at most
    /// `DEFAULT_MAX_MODEL_RETRIES` retries.
    pub fn model_attempts(&self) -> u32 {
        self.max_model_retries.min(DEFAULT_MAX_MODEL_RETRIES) + 1
    }
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            default_max_steps: DEFAULT_MAX_STEPS,
            max_model_retries: DEFAULT_MAX_MODEL_RETRIES,
            call_timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
        }
    }
}
