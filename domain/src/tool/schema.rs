//! Canonical parameter schema conversion.
//!
//! Tool catalogues declare parameters in one of two shapes:
//!
//! ```text
//! (a) JSON Schema              (b) flat parameter records
//! {                            - name: location
//!   "type": "object",            type: string
//!   "properties": {...},         description: City name
//!   "required": [...]            required: true
//! }
//! ```
//!
//! [`SchemaConverter::normalize`] turns either into the canonical
//! `{type: "object", properties, required}` object used for prompts, backend
//! tool catalogues, and MCP `inputSchema`. Conversion never fails: anything
//! unrecognized degrades to the empty object schema, because schema quality
//! only affects how well the model is guided.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// A single flat parameter record (shape b).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter type hint (e.g. "string", "integer", "int")
    #[serde(rename = "type", default = "default_param_type")]
    pub param_type: String,
    /// Parameter description
    #[serde(default)]
    pub description: String,
    /// Whether this parameter is required
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_param_type() -> String {
    "string".to_string()
}

fn default_required() -> bool {
    true
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            param_type: default_param_type(),
            description: description.into(),
            required,
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    /// Convert this record into a flat-shape JSON value.
    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "type": self.param_type,
            "description": self.description,
            "required": self.required,
        })
    }
}

/// Normalizes heterogeneous parameter declarations into canonical JSON Schema.
///
/// Type hints from flat records are mapped onto JSON Schema types:
/// - `"string"`, `"str"`, `"path"` → `"string"`
/// - `"integer"`, `"int"` → `"integer"`
/// - `"number"`, `"float"`, `"double"` → `"number"`
/// - `"boolean"`, `"bool"` → `"boolean"`
/// - `"array"`, `"list"` → `"array"`
/// - `"object"`, `"dict"`, `"map"` → `"object"`
/// - anything else → `"string"`
pub struct SchemaConverter;

impl SchemaConverter {
    /// The schema used when nothing useful was declared.
    pub fn empty() -> Value {
        json!({ "type": "object", "properties": {} })
    }

    /// Normalize a parameter declaration into the canonical object schema.
    pub fn normalize(declaration: &Value) -> Value {
        match declaration {
            Value::Object(map) if map.contains_key("type") => Self::from_json_schema(map),
            Value::Array(records) => Self::from_records(records),
            _ => Self::empty(),
        }
    }

    /// Build a canonical schema from typed parameter records.
    pub fn from_parameters(parameters: &[ToolParameter]) -> Value {
        let mut properties = Map::new();
        let mut required: Vec<String> = Vec::new();

        for param in parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": Self::map_type(&param.param_type),
                    "description": param.description,
                }),
            );

            required.retain(|name| name != &param.name);
            if param.required {
                required.push(param.name.clone());
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Names of the declared properties, in declaration order.
    pub fn property_names(schema: &Value) -> Vec<&str> {
        schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Names listed under `required`.
    pub fn required_names(schema: &Value) -> Vec<&str> {
        schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    fn from_records(records: &[Value]) -> Value {
        let parameters: Vec<ToolParameter> = records
            .iter()
            .filter(|record| record.get("name").is_some_and(Value::is_string))
            .filter_map(|record| serde_json::from_value(record.clone()).ok())
            .collect();
        Self::from_parameters(&parameters)
    }

    /// Shape (a): kept as declared, except for the repairs needed to keep the
    /// canonical invariants (`type == "object"`, a `properties` object,
    /// `required ⊆ properties`).
    fn from_json_schema(map: &Map<String, Value>) -> Value {
        if map.get("type").and_then(Value::as_str) != Some("object") {
            return Self::empty();
        }

        let properties = match map.get("properties") {
            None => None,
            Some(Value::Object(props)) => Some(props),
            Some(_) => return Self::empty(),
        };

        let mut schema = map.clone();
        if properties.is_none() {
            schema.insert("properties".to_string(), Value::Object(Map::new()));
        }
        if let Some(Value::Array(required)) = map.get("required") {
            let kept: Vec<Value> = required
                .iter()
                .filter(|name| {
                    name.as_str()
                        .is_some_and(|n| properties.is_some_and(|p| p.contains_key(n)))
                })
                .cloned()
                .collect();
            if kept.len() != required.len() {
                schema.insert("required".to_string(), Value::Array(kept));
            }
        } else if map.contains_key("required") {
            schema.remove("required");
        }

        Value::Object(schema)
    }

    fn map_type(hint: &str) -> &'static str {
        match hint.to_ascii_lowercase().as_str() {
            "string" | "str" | "path" => "string",
            "integer" | "int" => "integer",
            "number" | "float" | "double" => "number",
            "boolean" | "bool" => "boolean",
            "array" | "list" => "array",
            "object" | "dict" | "map" => "object",
            _ => "string",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_canonical(schema: &Value) {
        assert_eq!(schema["type"], "object");
        let properties = SchemaConverter::property_names(schema);
        for name in SchemaConverter::required_names(schema) {
            assert!(properties.contains(&name), "required '{}' not in properties", name);
        }
    }

    #[test]
    fn test_json_schema_passes_through_unchanged() {
        let declared = json!({
            "type": "object",
            "properties": {
                "location": {"type": "string", "description": "City name"},
                "unit": {"type": "string", "enum": ["celsius", "fahrenheit"]}
            },
            "required": ["location"]
        });

        let schema = SchemaConverter::normalize(&declared);
        assert_eq!(schema, declared);
    }

    #[test]
    fn test_flat_records() {
        let declared = json!([
            {"name": "expression", "type": "string", "description": "Math expression"},
            {"name": "precision", "type": "int", "description": "Digits", "required": false}
        ]);

        let schema = SchemaConverter::normalize(&declared);
        assert_canonical(&schema);
        assert_eq!(schema["properties"]["expression"]["type"], "string");
        assert_eq!(schema["properties"]["expression"]["description"], "Math expression");
        assert_eq!(schema["properties"]["precision"]["type"], "integer");
        assert_eq!(SchemaConverter::required_names(&schema), vec!["expression"]);
    }

    #[test]
    fn test_flat_records_defaults() {
        let declared = json!([{"name": "query"}]);
        let schema = SchemaConverter::normalize(&declared);

        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["properties"]["query"]["description"], "");
        // required defaults to true
        assert_eq!(SchemaConverter::required_names(&schema), vec!["query"]);
    }

    #[test]
    fn test_records_without_name_are_skipped() {
        let declared = json!([
            {"type": "string"},
            "not a record",
            {"name": 42},
            {"name": "ok", "required": false}
        ]);

        let schema = SchemaConverter::normalize(&declared);
        assert_canonical(&schema);
        assert_eq!(SchemaConverter::property_names(&schema), vec!["ok"]);
        assert!(SchemaConverter::required_names(&schema).is_empty());
    }

    #[test]
    fn test_duplicate_record_last_wins() {
        let declared = json!([
            {"name": "q", "required": true},
            {"name": "q", "type": "number", "required": false}
        ]);

        let schema = SchemaConverter::normalize(&declared);
        assert_eq!(schema["properties"]["q"]["type"], "number");
        assert!(SchemaConverter::required_names(&schema).is_empty());
    }

    #[test]
    fn test_unrecognized_input_degrades_to_empty() {
        for declared in [
            Value::Null,
            json!("string"),
            json!(12),
            json!({}),
            json!({"properties": {"a": {}}}),
        ] {
            assert_eq!(SchemaConverter::normalize(&declared), SchemaConverter::empty());
        }
    }

    #[test]
    fn test_non_object_type_degrades_to_empty() {
        let declared = json!({"type": "string"});
        assert_eq!(SchemaConverter::normalize(&declared), SchemaConverter::empty());
    }

    #[test]
    fn test_required_outside_properties_is_dropped() {
        let declared = json!({
            "type": "object",
            "properties": {"a": {"type": "string"}},
            "required": ["a", "ghost", 7]
        });

        let schema = SchemaConverter::normalize(&declared);
        assert_canonical(&schema);
        assert_eq!(SchemaConverter::required_names(&schema), vec!["a"]);
    }

    #[test]
    fn test_always_object_and_required_subset() {
        let inputs = [
            json!([{"name": "a"}, {"name": "b", "required": false}]),
            json!({"type": "object", "required": ["x"]}),
            json!({"type": "object", "properties": {"y": {}}, "required": "y"}),
            json!([]),
            Value::Bool(true),
        ];
        for declared in &inputs {
            assert_canonical(&SchemaConverter::normalize(declared));
        }
    }

    #[test]
    fn test_from_parameters() {
        let schema = SchemaConverter::from_parameters(&[
            ToolParameter::new("path", "File path", true).with_type("path"),
            ToolParameter::new("verbose", "Verbose output", false).with_type("bool"),
        ]);

        assert_eq!(schema["properties"]["path"]["type"], "string");
        assert_eq!(schema["properties"]["verbose"]["type"], "boolean");
        assert_eq!(SchemaConverter::required_names(&schema), vec!["path"]);
    }

    #[test]
    fn test_object_schema_without_properties_gets_empty_properties() {
        let schema = SchemaConverter::normalize(&json!({"type": "object", "required": ["x"]}));
        assert_eq!(schema["properties"], json!({}));
        assert!(SchemaConverter::required_names(&schema).is_empty());
        assert!(SchemaConverter::property_names(&schema).is_empty());
    }
}
