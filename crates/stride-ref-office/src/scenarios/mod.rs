//! Office reference scenarios.
//!
//! Each scenario drives the real loop, registry, policy guard and trace
//! writer with a scripted model, so the run is deterministic and needs no
//! network access.

pub mod book_meeting;
pub mod operator_rule;
pub mod scope_restriction;
pub mod tool_budget;
pub mod tool_failure;

/// Limits plus a calendar allow rule.
pub const OFFICE_POLICY: &str = include_str!("../../policies/office.toml");

/// Denies `send_email` and `create_event` for every request.
pub const READ_ONLY_POLICY: &str = include_str!("../../policies/read_only.toml");
