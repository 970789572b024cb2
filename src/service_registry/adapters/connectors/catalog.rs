//! Static tool tables shared by the built-in connectors.

use crate::service_registry::domain::{ToolCallError, ToolDefinition};
use serde_json::{Map, Value, json};

/// JSON type of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParamKind {
    Text,
    Integer,
    Object,
}

impl ParamKind {
    const fn schema_type(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Integer => "integer",
            Self::Object => "object",
        }
    }
}

/// One declared tool argument.
#[derive(Debug, Clone, Copy)]
pub(super) struct ToolParam {
    pub(super) name: &'static str,
    kind: ParamKind,
    required: bool,
}

impl ToolParam {
    pub(super) const fn required(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Text,
            required: true,
        }
    }

    pub(super) const fn optional(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Text,
            required: false,
        }
    }

    pub(super) const fn integer(self) -> Self {
        Self {
            kind: ParamKind::Integer,
            ..self
        }
    }

    pub(super) const fn object(self) -> Self {
        Self {
            kind: ParamKind::Object,
            ..self
        }
    }
}

/// Static description of one tool.
#[derive(Debug, Clone, Copy)]
pub(super) struct ToolSpec {
    pub(super) name: &'static str,
    pub(super) description: &'static str,
    pub(super) params: &'static [ToolParam],
}

impl ToolSpec {
    pub(super) const fn new(
        name: &'static str,
        description: &'static str,
        params: &'static [ToolParam],
    ) -> Self {
        Self {
            name,
            description,
            params,
        }
    }

    fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|param| {
                (
                    param.name.to_owned(),
                    json!({"type": param.kind.schema_type()}),
                )
            })
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|param| param.required)
            .map(|param| param.name)
            .collect();
        json!({"type": "object", "properties": properties, "required": required})
    }

    pub(super) fn definition(&self) -> Result<ToolDefinition, ToolCallError> {
        ToolDefinition::new(self.name, self.description, self.input_schema())
            .map_err(ToolCallError::internal)
    }

    /// Validates `arguments` and keeps only declared, non-null entries.
    pub(super) fn accept(
        &self,
        arguments: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ToolCallError> {
        self.definition()?.validate_arguments(arguments)?;
        Ok(self
            .params
            .iter()
            .filter_map(|param| {
                arguments
                    .get(param.name)
                    .filter(|value| !value.is_null())
                    .map(|value| (param.name.to_owned(), value.clone()))
            })
            .collect())
    }
}

/// Builds the published catalog for a static tool table.
pub(super) fn definitions<T: CatalogEntry>(table: &[T]) -> Vec<ToolDefinition> {
    table
        .iter()
        .filter_map(|entry| entry.spec().definition().ok())
        .collect()
}

/// Table row carrying a tool description.
pub(super) trait CatalogEntry {
    fn spec(&self) -> &ToolSpec;
}

impl CatalogEntry for ToolSpec {
    fn spec(&self) -> &ToolSpec {
        self
    }
}

/// Finds a tool by name.
pub(super) fn find<'a, T: CatalogEntry>(
    table: &'a [T],
    name: &str,
) -> Result<&'a T, ToolCallError> {
    table
        .iter()
        .find(|entry| entry.spec().name == name)
        .ok_or_else(|| ToolCallError::MethodNotFound(name.to_owned()))
}

/// Renders an argument as a path segment or query value.
pub(super) fn argument_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
