//! TOML-driven constraint guard.
//!
//! `TomlConstraintGuard` loads a `PolicyConfig` and implements the
//! `ConstraintGuard` trait from stride-core.
//!
//! Evaluation:
//!
//! 1. The request's own constraints are checked first, exactly as
//!    `BudgetGuard` does.
//! 2. Before a dispatch, operator rules are tried in declaration order; the
//!    first rule whose `tool` pattern matches decides. A `deny` rule yields
//!    `Violated`.
//! 3. If no rule matched, the dispatch is allowed.

use std::path::Path;

use tracing::{debug, warn};

use stride_contracts::{
    config::LoopSettings,
    error::{StrideError, StrideResult},
    guard::{LoopProgress, Verdict},
    query::ConstraintSet,
    tool::ToolInvocation,
};
use stride_core::{traits::ConstraintGuard, BudgetGuard};

use crate::rule::{PolicyConfig, RuleVerdict};

/// A `ConstraintGuard` combining request constraints with operator rules.
///
/// ```rust,ignore
/// let guard = TomlConstraintGuard::from_file(Path::new("stride.toml"))?;
/// let agent_loop = AgentLoop::new(gateway, tools)
///     .with_settings(guard.settings().clone())
///     .with_guard(Arc::new(guard));
/// ```
#[derive(Debug)]
pub struct TomlConstraintGuard {
    config: PolicyConfig,
}

impl TomlConstraintGuard {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// Parse `s` as TOML and build a guard.
    ///
    /// Returns `StrideError::ConfigError` if the TOML is malformed or does not
    /// match `PolicyConfig`.
    pub fn from_toml_str(s: &str) -> StrideResult<Self> {
        let config: PolicyConfig = toml::from_str(s).map_err(|e| StrideError::ConfigError {
            reason: format!("failed to parse policy TOML: {}", e),
        })?;
        Ok(Self { config })
    }

    pub fn from_file(path: &Path) -> StrideResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| StrideError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loop-wide limits from the `[limits]` table.
    pub fn settings(&self) -> &LoopSettings {
        &self.config.limits
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }
}

impl ConstraintGuard for TomlConstraintGuard {
    fn before_reasoning(&self, constraints: &ConstraintSet, progress: &LoopProgress) -> Verdict {
        BudgetGuard.before_reasoning(constraints, progress)
    }

    fn before_dispatch(
        &self,
        constraints: &ConstraintSet,
        progress: &LoopProgress,
        invocation: &ToolInvocation,
    ) -> Verdict {
        let verdict = BudgetGuard.before_dispatch(constraints, progress, invocation);
        if !verdict.is_allow() {
            return verdict;
        }

        let tool = invocation.tool_name.as_str();
        let Some(rule) = self.config.rules.iter().find(|r| r.matches(tool)) else {
            debug!(tool, "no operator rule matched; allowing");
            return Verdict::Allow;
        };

        debug!(rule_id = %rule.id, tool, "operator rule matched");
        match rule.verdict {
            RuleVerdict::Allow => Verdict::Allow,
            RuleVerdict::Deny => {
                warn!(
                    execution_id = %progress.execution_id,
                    rule_id = %rule.id,
                    tool,
                    "operator rule denied tool"
                );
                Verdict::violated(
                    rule.deny_reason
                        .clone()
                        .unwrap_or_else(|| format!("tool '{tool}' denied by rule '{}'", rule.id)),
                )
            }
        }
    }
}
