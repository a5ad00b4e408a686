//! MCP stdio server: JSON-RPC 2.0 framing over the tool protocol adapter.
//!
//! Protocol: newline-delimited JSON-RPC 2.0 on stdin/stdout. Logging goes
//! to stderr (stdout is reserved for protocol messages).
//!
//! | Method | Result |
//! |--------|--------|
//! | `initialize` | protocol version, `capabilities.tools`, `serverInfo` |
//! | `notifications/initialized` | no response |
//! | `ping` | `{}` |
//! | `tools/list` | `{tools: [{name, description, inputSchema}]}` |
//! | `tools/call` | `{content: [{type: "text", text}], isError}` |

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use toolbox_application::ToolProtocolAdapter;
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// MCP server exposing the tool registry over stdio.
pub struct StdioServer {
    adapter: ToolProtocolAdapter,
    name: String,
    version: String,
}

impl StdioServer {
    pub fn new(adapter: ToolProtocolAdapter) -> Self {
        Self {
            adapter,
            name: "toolbox-agent".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_server_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.name = name.into();
        self.version = version.into();
        self
    }

    /// Serve on the process's stdin/stdout until stdin closes.
    pub async fn run_stdio(&self) -> std::io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run(stdin, stdout).await
    }

    /// Serve one connection until the reader reaches EOF.
    ///
    /// A frame that is not valid UTF-8 gets a parse-error response; only
    /// I/O failures end the loop.
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(tools = self.adapter.list_tools().len(), "MCP stdio server started");

        let mut frame = Vec::new();
        loop {
            frame.clear();
            if reader.read_until(b'\n', &mut frame).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&frame) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.handle_message(line).await
                }
                Err(e) => {
                    warn!(error = %e, "Frame is not valid UTF-8");
                    Some(error_response(
                        Value::Null,
                        PARSE_ERROR,
                        &format!("Parse error: {}", e),
                    ))
                }
            };

            if let Some(response) = response {
                let mut bytes = response.to_string().into_bytes();
                bytes.push(b'\n');
                writer.write_all(&bytes).await?;
                writer.flush().await?;
            }
        }

        info!("MCP stdio server stopped");
        Ok(())
    }

    /// Handle one JSON-RPC message. Notifications yield no response.
    pub async fn handle_message(&self, line: &str) -> Option<Value> {
        let request: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Malformed JSON-RPC message");
                return Some(error_response(
                    Value::Null,
                    PARSE_ERROR,
                    &format!("Parse error: {}", e),
                ));
            }
        };

        let Some(method) = request.get("method").and_then(Value::as_str) else {
            let id = request.get("id").cloned().unwrap_or(Value::Null);
            return Some(error_response(id, INVALID_REQUEST, "Invalid request: missing method"));
        };

        // Requests without an id are notifications.
        let Some(id) = request.get("id").cloned() else {
            debug!(method = %method, "Notification received");
            return None;
        };

        let params = request.get("params").cloned().unwrap_or_else(|| json!({}));
        debug!(method = %method, "Request received");

        let response = match method {
            "initialize" => success_response(id, self.initialize_result()),
            "ping" => success_response(id, json!({})),
            "tools/list" => success_response(id, self.tools_list_result()),
            "tools/call" => self.handle_tools_call(id, &params).await,
            _ => error_response(id, METHOD_NOT_FOUND, &format!("Method not found: {}", method)),
        };
        Some(response)
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.name,
                "version": self.version
            }
        })
    }

    fn tools_list_result(&self) -> Value {
        json!({ "tools": self.adapter.list_tools() })
    }

    async fn handle_tools_call(&self, id: Value, params: &Value) -> Value {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return error_response(id, INVALID_PARAMS, "Missing tool name");
        };
        let arguments = params.get("arguments").cloned();

        match self.adapter.call_tool(name, arguments).await {
            Ok(content) => success_response(
                id,
                json!({
                    "content": [{ "type": "text", "text": content.text }],
                    "isError": content.is_error
                }),
            ),
            Err(e) => error_response(id, INVALID_PARAMS, &e.to_string()),
        }
    }
}

fn success_response(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message
        }
    })
}
