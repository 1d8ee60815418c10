//! # stride-interpret
//!
//! Turns raw user text into a [`ParsedRequest`](stride_contracts::query::ParsedRequest).
//!
//! [`RuleInterpreter`] implements
//! [`QueryInterpreter`](stride_core::traits::QueryInterpreter) without any
//! network access: constraint phrases are recognized by
//! [`extract_constraints`], and the rest of the text is classified by an
//! ordered table of intent rules.
//!
//! [`normalize_constraint`] is exposed on its own so model-backed
//! interpreters can reuse the same phrase grammar.

pub mod constraints;
pub mod intent;

pub use constraints::{extract_constraints, normalize_constraint};
pub use intent::{snake_label, IntentRule, RuleInterpreter};

// ── Tests ─────────────────────────────────────────────────────────────────────
