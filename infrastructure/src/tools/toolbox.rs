//! Toolbox HTTP tools: catalogue tools executed by a remote toolbox service.
//!
//! ```text
//! POST {base_url}/api/tool/{name}/invoke
//!   body:     {"expression": "2+2"}
//!   response: {"result": ...}
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use toolbox_domain::{ToolArguments, ToolDefinition, ToolError, ToolHandler};
use tracing::debug;

use super::catalogue::ToolDeclaration;

/// Handler that forwards a call to the toolbox service.
#[derive(Debug, Clone)]
pub struct ToolboxHandler {
    client: reqwest::Client,
    base_url: String,
    tool_name: String,
}

impl ToolboxHandler {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        tool_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            tool_name: tool_name.into(),
        }
    }

    pub fn invoke_url(&self) -> String {
        format!(
            "{}/api/tool/{}/invoke",
            self.base_url.trim_end_matches('/'),
            self.tool_name
        )
    }
}

#[async_trait]
impl ToolHandler for ToolboxHandler {
    async fn invoke(&self, arguments: &ToolArguments) -> Result<Value, ToolError> {
        let url = self.invoke_url();
        debug!(tool = %self.tool_name, url = %url, "Invoking toolbox tool");

        let response = self
            .client
            .post(&url)
            .json(arguments.as_map())
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(format!("Toolbox request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ToolError::execution_failed(format!("Failed to read toolbox response: {}", e))
        })?;

        decode_response(status.as_u16(), &body)
    }
}

/// Interpret a toolbox response body.
///
/// `{"result": x}` yields `x`; any other JSON body is returned whole; a
/// non-JSON body is returned as a string.
fn decode_response(status: u16, body: &str) -> Result<Value, ToolError> {
    if !(200..300).contains(&status) {
        return Err(
            ToolError::execution_failed(format!("Toolbox returned HTTP {}", status))
                .with_details(body.trim()),
        );
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut map)) => match map.remove("result") {
            Some(result) => Ok(result),
            None => Ok(Value::Object(map)),
        },
        Ok(other) => Ok(other),
        Err(_) => Ok(Value::String(body.to_string())),
    }
}

/// Build remote tool definitions for catalogue declarations.
pub fn toolbox_definitions(
    client: &reqwest::Client,
    base_url: &str,
    declarations: &[ToolDeclaration],
) -> Vec<ToolDefinition> {
    declarations
        .iter()
        .map(|decl| {
            let handler = ToolboxHandler::new(client.clone(), base_url, &decl.name);
            ToolDefinition::new(
                &decl.name,
                &decl.description,
                &decl.parameters,
                Arc::new(handler),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invoke_url() {
        let handler = ToolboxHandler::new(reqwest::Client::new(), "http://localhost:5000/", "search");
        assert_eq!(
            handler.invoke_url(),
            "http://localhost:5000/api/tool/search/invoke"
        );
    }

    #[test]
    fn test_decode_result_field() {
        assert_eq!(
            decode_response(200, r#"{"result": "42 rows"}"#).unwrap(),
            json!("42 rows")
        );
        assert_eq!(
            decode_response(200, r#"{"rows": [1, 2]}"#).unwrap(),
            json!({"rows": [1, 2]})
        );
        assert_eq!(decode_response(200, "plain text").unwrap(), json!("plain text"));
    }

    #[test]
    fn test_decode_http_error() {
        let err = decode_response(500, "internal error\n").unwrap_err();
        assert_eq!(err.code, "EXECUTION_FAILED");
        assert_eq!(err.message, "Toolbox returned HTTP 500");
        assert_eq!(err.details.as_deref(), Some("internal error"));
    }

    #[test]
    fn test_toolbox_definitions() {
        let declarations = vec![ToolDeclaration {
            name: "lookup".into(),
            description: "Look up a record".into(),
            parameters: json!([{"name": "id"}]),
        }];
        let defs = toolbox_definitions(&reqwest::Client::new(), "http://tb", &declarations);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "lookup");
        assert_eq!(defs[0].parameter_names(), vec!["id"]);
    }
}
