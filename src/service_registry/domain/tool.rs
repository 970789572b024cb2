//! Tool catalog value objects and structured tool-call errors.

use super::{ServiceDomainError, ServiceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Metadata for one tool a connector exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    name: String,
    description: String,
    input_schema: Value,
}

impl ToolDefinition {
    /// Creates a tool definition.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError`] when name or description is empty.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Result<Self, ServiceDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(ServiceDomainError::EmptyToolName);
        }

        let normalized_description = description.into().trim().to_owned();
        if normalized_description.is_empty() {
            return Err(ServiceDomainError::EmptyToolDescription);
        }

        Ok(Self {
            name: normalized_name,
            description: normalized_description,
            input_schema,
        })
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the JSON schema describing tool arguments.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Returns argument names listed under the schema's `required` array.
    pub fn required_arguments(&self) -> impl Iterator<Item = &str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    /// Checks that every required argument is present and not null.
    ///
    /// # Errors
    ///
    /// Returns [`ToolCallError::InvalidParams`] naming the first missing
    /// argument.
    pub fn validate_arguments(&self, arguments: &Map<String, Value>) -> Result<(), ToolCallError> {
        self.required_arguments()
            .find(|name| arguments.get(*name).is_none_or(Value::is_null))
            .map_or(Ok(()), |name| {
                Err(ToolCallError::InvalidParams(format!(
                    "missing required argument '{name}' for tool '{}'",
                    self.name
                )))
            })
    }
}

/// JSON-RPC error codes used by MCP tool calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolErrorCode {
    /// The requested tool does not exist.
    MethodNotFound,
    /// Arguments failed validation.
    InvalidParams,
    /// The tool failed while running.
    InternalError,
}

impl ToolErrorCode {
    /// Returns the numeric JSON-RPC code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }
}

/// Errors returned by connector tool calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolCallError {
    /// The connector has no live session.
    #[error("{0} connector is not connected")]
    NotConnected(ServiceKind),

    /// No tool with this name exists.
    #[error("unknown tool: {0}")]
    MethodNotFound(String),

    /// Arguments failed validation.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// The tool failed while running.
    #[error("tool execution failed: {0}")]
    Internal(String),
}

impl ToolCallError {
    /// Returns the structured error code, or `None` for the local
    /// not-connected check.
    #[must_use]
    pub const fn code(&self) -> Option<ToolErrorCode> {
        match self {
            Self::NotConnected(_) => None,
            Self::MethodNotFound(_) => Some(ToolErrorCode::MethodNotFound),
            Self::InvalidParams(_) => Some(ToolErrorCode::InvalidParams),
            Self::Internal(_) => Some(ToolErrorCode::InternalError),
        }
    }

    /// Wraps an execution failure.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}
