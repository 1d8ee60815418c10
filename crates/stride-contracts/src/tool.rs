//! Tool descriptors, invocations, and results.
//!
//! A tool is described by a `ToolSpec` carrying its input and output JSON
//! Schemas. The model asks for a tool by producing a `ToolInvocation`; the
//! registry answers with a `ToolResult`, which never represents a crash:
//! every failure is folded into `success = false` plus an `ErrorKind`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ErrorKind;

/// The declared shape of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Exact name the model must use.
    pub name: String,
    /// What the tool does, shown to the model.
    pub description: String,
    /// JSON Schema the invocation arguments must satisfy.
    pub input_schema: Value,
    /// JSON Schema the handler's output must satisfy. `Null` means unconstrained.
    pub output_schema: Value,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: serde_json::json!({ "type": "object" }),
            output_schema: Value::Null,
        }
    }

    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = schema;
        self
    }
}

/// A request from the model to run a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// What a tool produced: a value, or a normalized failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutput {
    Value(Value),
    Error { kind: ErrorKind, message: String },
}

/// The result of executing one `ToolInvocation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: ToolOutput,
}

impl ToolResult {
    pub fn ok(value: Value) -> Self {
        Self {
            success: true,
            output: ToolOutput::Value(value),
        }
    }

    pub fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: ToolOutput::Error {
                kind,
                message: message.into(),
            },
        }
    }

    /// The failure discriminant, if this result is a failure.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.output {
            ToolOutput::Error { kind, .. } => Some(*kind),
            ToolOutput::Value(_) => None,
        }
    }

    /// Render the result as the text observation fed back to the model.
    pub fn observation(&self) -> String {
        match &self.output {
            ToolOutput::Value(Value::String(s)) => s.clone(),
            ToolOutput::Value(v) => v.to_string(),
            ToolOutput::Error { kind, message } => format!("error ({kind}): {message}"),
        }
    }
}
