//! # stride-policy
//!
//! A TOML-configured constraint guard for the stride runtime.
//!
//! ## Overview
//!
//! [`TomlConstraintGuard`] implements
//! [`ConstraintGuard`](stride_core::traits::ConstraintGuard). It enforces the
//! constraints each request carries (step budget, time limit, tool call
//! limit, disallowed tools) and adds operator rules that apply to every
//! request. The same document carries the loop-wide `[limits]`.
//!
//! ## Rule matching
//!
//! Each rule names a `tool`, or `"*"` for any tool. Rules are applied in
//! declaration order; the first match wins. Unmatched tools are allowed.

pub mod engine;
pub mod rule;

pub use engine::TomlConstraintGuard;
pub use rule::{PolicyConfig, RuleVerdict, ToolRule};

// ── Tests ─────────────────────────────────────────────────────────────────────
