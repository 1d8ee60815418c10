//! # stride-audit
//!
//! Append-only, SHA-256 hash-chained trajectory trace for the stride runtime.
//!
//! ## Overview
//!
//! [`InMemoryTraceWriter`] implements
//! [`TraceWriter`](stride_core::traits::TraceWriter). Every step the agent
//! loop appends is wrapped in a [`TraceEvent`] that links to the previous
//! event of the same execution by hash. Altering any recorded step breaks the
//! chain, which [`verify_chain`] detects.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let trace = Arc::new(InMemoryTraceWriter::new());
//! let agent_loop = AgentLoop::new(gateway, tools).with_trace(trace.clone());
//!
//! let outcome = agent_loop.execute(request).await;
//! assert!(trace.verify_integrity(&outcome.execution_id));
//! let log = trace.export_log(&outcome.execution_id);
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_step, verify_chain};
pub use event::{TraceEvent, TraceLog, TraceSeal};
pub use memory::InMemoryTraceWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────
