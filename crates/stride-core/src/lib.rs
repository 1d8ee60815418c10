//! # stride-core
//!
//! The constraint-bound reasoning and tool-use loop of the stride agent runtime.
//!
//! This crate provides:
//! - The seam traits (`QueryInterpreter`, `ModelGateway`, `ToolHandler`,
//!   `ToolDispatcher`, `ConstraintGuard`, `TraceWriter`)
//! - `BudgetGuard`, which enforces a request's own constraints
//! - `AgentLoop`, the explicit state machine
//! - `Agent`, the `run(raw_text)` entry point
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stride_core::{Agent, AgentLoop};
//!
//! let agent = Agent::new(interpreter, AgentLoop::new(gateway, registry));
//! let outcome = agent.run("Book a meeting tomorrow within 2 tool calls").await?;
//! ```

pub mod agent;
pub mod agent_loop;
pub mod guard;
pub mod traits;

pub use agent::Agent;
pub use agent_loop::{AgentLoop, Phase};
pub use guard::BudgetGuard;
