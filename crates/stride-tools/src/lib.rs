//! # stride-tools
//!
//! The tool registry for the stride runtime.
//!
//! [`ToolRegistry`] implements [`ToolDispatcher`](stride_core::traits::ToolDispatcher):
//! it maps exact tool names to handlers, validates arguments and outputs
//! against each tool's declared JSON Schemas, and turns every failure into a
//! failed `ToolResult` the model can read.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use stride_contracts::tool::ToolSpec;
//! use stride_tools::ToolRegistry;
//!
//! let mut registry = ToolRegistry::new();
//! registry.register_fn(
//!     ToolSpec::new("echo", "Return the arguments unchanged"),
//!     |args| Ok(serde_json::Value::Object(args)),
//! )?;
//! ```

pub mod registry;

pub use registry::{FnHandler, ToolRegistry};
