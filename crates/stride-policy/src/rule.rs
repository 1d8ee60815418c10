//! Operator tool rules and the policy configuration schema.
//!
//! A `PolicyConfig` is deserialized from TOML. It carries loop-wide limits
//! and an ordered list of `ToolRule`s. Rules are evaluated in declaration
//! order and the first matching rule wins. If no rule matches, the tool is
//! allowed; per-request scope restrictions still apply on top.

use serde::{Deserialize, Serialize};

use stride_contracts::config::LoopSettings;

/// What a rule does when it matches.
///
/// ```toml
/// verdict = "allow"
/// verdict = "deny"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleVerdict {
    Allow,
    Deny,
}

/// A single operator rule loaded from TOML.
///
/// `tool` is matched exactly against the invocation's tool name, or `"*"`
/// for any tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRule {
    /// Stable identifier used in logs and abort details.
    pub id: String,

    #[serde(default)]
    pub description: String,

    /// Tool name pattern. `"*"` matches every tool.
    pub tool: String,

    pub verdict: RuleVerdict,

    /// Shown in the abort detail when `verdict = "deny"`.
    pub deny_reason: Option<String>,
}

impl ToolRule {
    pub fn matches(&self, tool: &str) -> bool {
        self.tool == "*" || self.tool == tool
    }
}

/// The top-level structure deserialized from a TOML policy file.
///
/// ```toml
/// [limits]
/// default_max_steps = 8
/// max_model_retries = 2
/// call_timeout_secs = 30
///
/// [[rules]]
/// id = "no-outbound-mail"
/// tool = "send_email"
/// verdict = "deny"
/// deny_reason = "outbound email is disabled on this deployment"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub limits: LoopSettings,

    /// Ordered list of rules. First match wins.
    #[serde(default)]
    pub rules: Vec<ToolRule>,
}
