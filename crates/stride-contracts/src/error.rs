//! Error taxonomy for the stride agent runtime.
//!
//! `StrideError` is what fallible operations return. `ErrorKind` is the
//! plain, serializable discriminant that travels inside `ToolResult`s and
//! `AgentOutcome`s, where a full error value cannot be stored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The unified error type for the stride runtime.
#[derive(Debug, Error)]
pub enum StrideError {
    /// No intent could be extracted from the user's text.
    #[error("malformed query: {reason}")]
    MalformedQuery { reason: String },

    /// The requested tool is not registered.
    #[error("unknown tool '{name}'")]
    UnknownTool { name: String },

    /// Tool arguments (or a tool's output) do not satisfy the declared schema.
    #[error("schema violation for tool '{tool}': {reason}")]
    SchemaViolation { tool: String, reason: String },

    /// A tool handler reported a failure.
    #[error("tool '{tool}' failed: {reason}")]
    ToolFailed { tool: String, reason: String },

    /// A model or tool call did not finish within its time allowance.
    #[error("call timed out after {millis}ms")]
    Timeout { millis: u128 },

    /// A request constraint (or operator rule) forbids continuing.
    #[error("constraint violated: {reason}")]
    ConstraintViolated { reason: String },

    /// The model gateway failed on transport or produced an unusable reply.
    #[error("model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A trace writer could not record a step or outcome.
    #[error("trace write failed: {reason}")]
    TraceWriteFailed { reason: String },
}

impl StrideError {
    /// The serializable discriminant for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrideError::MalformedQuery { .. } => ErrorKind::MalformedQuery,
            StrideError::UnknownTool { .. } => ErrorKind::UnknownTool,
            StrideError::SchemaViolation { .. } => ErrorKind::SchemaViolation,
            StrideError::ToolFailed { .. } => ErrorKind::ToolFailed,
            StrideError::Timeout { .. } => ErrorKind::Timeout,
            StrideError::ConstraintViolated { .. } => ErrorKind::ConstraintViolated,
            StrideError::ModelUnavailable { .. } => ErrorKind::ModelUnavailable,
            StrideError::Cancelled => ErrorKind::Cancelled,
            StrideError::ConfigError { .. } => ErrorKind::ConfigError,
            StrideError::TraceWriteFailed { .. } => ErrorKind::TraceWriteFailed,
        }
    }
}

/// Plain error discriminant carried by tool results and outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedQuery,
    UnknownTool,
    SchemaViolation,
    ToolFailed,
    Timeout,
    ConstraintViolated,
    ModelUnavailable,
    Cancelled,
    ConfigError,
    TraceWriteFailed,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::MalformedQuery => "malformed_query",
            ErrorKind::UnknownTool => "unknown_tool",
            ErrorKind::SchemaViolation => "schema_violation",
            ErrorKind::ToolFailed => "tool_failed",
            ErrorKind::Timeout => "timeout",
            ErrorKind::ConstraintViolated => "constraint_violated",
            ErrorKind::ModelUnavailable => "model_unavailable",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::ConfigError => "config_error",
            ErrorKind::TraceWriteFailed => "trace_write_failed",
        };
        f.write_str(name)
    }
}

/// Convenience alias used throughout the stride crates.
pub type StrideResult<T> = Result<T, StrideError>;
