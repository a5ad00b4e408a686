//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::handler::ToolHandler;
use super::schema::SchemaConverter;

/// Arguments passed to a tool, keyed by parameter name.
///
/// Insertion order is preserved so that single-argument handlers can fall
/// back to "the first value" when the model used an unexpected key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Single-argument fallback used when a payload could not be parsed.
    pub fn fallback(raw: impl Into<String>) -> Self {
        Self::new().with("input", Value::String(raw.into()))
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string argument
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Get a required string argument or return an error message
    pub fn require_str(&self, key: &str) -> Result<&str, String> {
        self.get_str(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// The first value in insertion order.
    pub fn first_value(&self) -> Option<&Value> {
        self.0.values().next()
    }

    /// Look up `key`, falling back to the first value in insertion order.
    ///
    /// Non-string values are rendered as JSON text, so `{"expression": 4}`
    /// yields `"4"`.
    pub fn get_str_or_first(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .or_else(|| self.first_value())
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for ToolArguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl fmt::Display for ToolArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: ToolArguments,
    /// Backend-assigned ID when the call came from a native tool-call payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_id: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: ToolArguments::new(),
            native_id: None,
        }
    }

    /// Create a call from a structured (native) tool-call payload.
    pub fn from_native(
        id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: ToolArguments,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            native_id: Some(id.into()),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key, value);
        self
    }

    pub fn with_arguments(mut self, arguments: ToolArguments) -> Self {
        self.arguments = arguments;
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get_str(key)
    }

    /// Render the call in the ReAct text format.
    pub fn to_react_text(&self) -> String {
        format!(
            "Action: {}\nAction Input: {}",
            self.tool_name, self.arguments
        )
    }
}

/// Serializable description of a tool (no handler).
///
/// This is what the model sees in its catalogue and what protocol clients
/// receive from a tool listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// Canonical object schema
    pub parameters: Value,
}

impl ToolDescriptor {
    /// Render as an OpenAI-style function tool.
    pub fn to_function_tool(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// Definition of a tool that can be invoked by the agent or a protocol client.
#[derive(Clone)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "calculator")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Canonical parameter schema (output of [`SchemaConverter`])
    pub parameters: Value,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDefinition {
    /// Create a definition; `declaration` may be in either accepted shape.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        declaration: &Value,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: SchemaConverter::normalize(declaration),
            handler,
        }
    }

    pub fn handler(&self) -> Arc<dyn ToolHandler> {
        Arc::clone(&self.handler)
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.clone(),
        }
    }

    /// Parameter names in declaration order.
    pub fn parameter_names(&self) -> Vec<&str> {
        SchemaConverter::property_names(&self.parameters)
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::handler::FnHandler;
    use crate::tool::value_objects::ToolError;
    use serde_json::json;

    fn echo() -> Arc<dyn ToolHandler> {
        Arc::new(FnHandler::new(|args: ToolArguments| async move {
            Ok::<_, ToolError>(args.to_value())
        }))
    }

    #[test]
    fn test_arguments_preserve_insertion_order() {
        let args = ToolArguments::new()
            .with("zeta", "first")
            .with("alpha", "second");

        assert_eq!(args.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(args.first_value(), Some(&json!("first")));
    }

    #[test]
    fn test_get_str_or_first() {
        let args = ToolArguments::new().with("input", "2+2");
        assert_eq!(args.get_str_or_first("expression"), Some("2+2".to_string()));

        let args = ToolArguments::new()
            .with("other", "x")
            .with("expression", "1+1");
        assert_eq!(args.get_str_or_first("expression"), Some("1+1".to_string()));

        let args = ToolArguments::new().with("n", 4);
        assert_eq!(args.get_str_or_first("expression"), Some("4".to_string()));

        assert_eq!(ToolArguments::new().get_str_or_first("expression"), None);
    }

    #[test]
    fn test_fallback_arguments() {
        let args = ToolArguments::fallback("not json");
        assert_eq!(args.len(), 1);
        assert_eq!(args.get_str("input"), Some("not json"));
    }

    #[test]
    fn test_tool_call() {
        let call = ToolCall::new("get_weather").with_arg("location", "Tokyo");

        assert_eq!(call.tool_name, "get_weather");
        assert_eq!(call.get_string("location"), Some("Tokyo"));
        assert!(call.arguments.require_str("missing").is_err());
        assert!(call.native_id.is_none());
        assert_eq!(
            call.to_react_text(),
            "Action: get_weather\nAction Input: {\"location\":\"Tokyo\"}"
        );
    }

    #[test]
    fn test_from_native() {
        let call = ToolCall::from_native("call_1", "search", ToolArguments::new().with("query", "rust"));
        assert_eq!(call.native_id.as_deref(), Some("call_1"));
        assert_eq!(call.get_string("query"), Some("rust"));
    }

    #[test]
    fn test_definition_normalizes_declaration() {
        let definition = ToolDefinition::new(
            "calculator",
            "Evaluate arithmetic",
            &json!([{"name": "expression", "description": "Math expression"}]),
            echo(),
        );

        assert_eq!(definition.parameters["type"], "object");
        assert_eq!(definition.parameter_names(), vec!["expression"]);

        let descriptor = definition.descriptor();
        assert_eq!(descriptor.name, "calculator");
        assert_eq!(descriptor.parameters, definition.parameters);

        let function = descriptor.to_function_tool();
        assert_eq!(function["type"], "function");
        assert_eq!(function["function"]["name"], "calculator");
    }

    #[test]
    fn test_definition_debug_omits_handler() {
        let definition = ToolDefinition::new("t", "d", &Value::Null, echo());
        let debug = format!("{:?}", definition);
        assert!(debug.contains("ToolDefinition"));
        assert!(debug.contains("\"t\""));
    }
}
