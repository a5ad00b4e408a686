//! Registry-backed tool executor: the concrete [`ToolExecutorPort`].
//!
//! ```text
//! execute(call)
//!   ├─ registry miss  → NOT_FOUND  ("Unknown tool: x. Available tools: …")
//!   ├─ required argument missing → INVALID_ARGUMENT (handler not invoked)
//!   └─ registry hit   → handler.invoke(arguments)
//!        ├─ Ok(value)        → success (string verbatim / pretty JSON)
//!        ├─ Err(ToolError)   → failure
//!        └─ over time limit  → TIMEOUT
//! ```
//!
//! Handlers receive the full argument mapping; single-argument handlers pick
//! their value with `ToolArguments::get_str_or_first`. For that reason a tool
//! with exactly one required parameter accepts any single argument (such as
//! the `{"input": ...}` fallback) in its place.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use toolbox_application::ports::tool_executor::ToolExecutorPort;
use toolbox_domain::{
    SchemaConverter, ToolArguments, ToolCall, ToolDefinition, ToolDescriptor, ToolError, ToolResult,
};
use tracing::{debug, warn};

use super::registry::ToolRegistry;

/// Executor that runs tools from a shared [`ToolRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryToolExecutor {
    registry: Arc<ToolRegistry>,
    /// Per-call time limit (None = unlimited)
    timeout: Option<Duration>,
}

impl RegistryToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: None,
        }
    }

    /// Set the per-call time limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }
}

/// Required parameters of `definition` that `arguments` does not supply.
fn missing_required(definition: &ToolDefinition, arguments: &ToolArguments) -> Vec<String> {
    let required = SchemaConverter::required_names(&definition.parameters);
    if required.len() == 1 && arguments.len() == 1 {
        return Vec::new();
    }
    required
        .into_iter()
        .filter(|name| arguments.get(name).is_none())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl ToolExecutorPort for RegistryToolExecutor {
    fn tool_descriptors(&self) -> Vec<ToolDescriptor> {
        self.registry.descriptors()
    }

    fn has_tool(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    fn available_tools(&self) -> Vec<String> {
        self.registry.names()
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let definition = match self.registry.get(&call.tool_name) {
            Ok(definition) => definition,
            Err(_) => {
                warn!(tool = %call.tool_name, "Unknown tool requested");
                return ToolResult::failure(
                    &call.tool_name,
                    ToolError::unknown_tool(&call.tool_name, &self.registry.names()),
                );
            }
        };

        let missing = missing_required(&definition, &call.arguments);
        if !missing.is_empty() {
            let message = match missing.as_slice() {
                [one] => format!("Missing required argument: {}", one),
                many => format!("Missing required arguments: {}", many.join(", ")),
            };
            debug!(tool = %call.tool_name, missing = ?missing, "Rejected call");
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(message));
        }

        let handler = definition.handler();
        let started = Instant::now();
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, handler.invoke(&call.arguments))
                .await
                .unwrap_or_else(|_| {
                    Err(ToolError::timeout(&call.tool_name)
                        .with_details(format!("limit {}s", limit.as_secs_f64())))
                }),
            None => handler.invoke(&call.arguments).await,
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(value) => ToolResult::from_value(&call.tool_name, value),
            Err(error) => {
                debug!(tool = %call.tool_name, error = %error, "Tool returned an error");
                ToolResult::failure(&call.tool_name, error)
            }
        };
        debug!(
            tool = %call.tool_name,
            success = result.is_success(),
            duration_ms,
            "Tool finished"
        );
        result.with_duration(duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolbox_domain::{FnHandler, Observation, SyncFnHandler, ToolArguments, ToolDefinition};

    fn registry() -> Arc<ToolRegistry> {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(ToolDefinition::new(
            "greet",
            "Greet someone",
            &json!([{"name": "name"}]),
            Arc::new(SyncFnHandler::new(|args: &ToolArguments| {
                let name = args
                    .get_str_or_first("name")
                    .ok_or_else(|| ToolError::invalid_argument("Missing required argument: name"))?;
                Ok(json!(format!("Hello, {}!", name)))
            })),
        ));
        registry.register(ToolDefinition::new(
            "structured",
            "Return an object",
            &json!(null),
            Arc::new(SyncFnHandler::new(|_: &ToolArguments| Ok(json!({"ok": true})))),
        ));
        registry.register(ToolDefinition::new(
            "slow",
            "Sleep for a while",
            &json!(null),
            Arc::new(FnHandler::new(|_: ToolArguments| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ToolError>(json!("done"))
            })),
        ));
        registry
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let executor = RegistryToolExecutor::new(registry());
        let result = executor.execute(&ToolCall::new("missing_tool")).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
        assert_eq!(
            Observation::from(&result).text,
            "Error: Unknown tool: missing_tool. Available tools: greet, structured, slow"
        );
    }

    #[tokio::test]
    async fn test_execute_with_named_argument() {
        let executor = RegistryToolExecutor::new(registry());
        let result = executor
            .execute(&ToolCall::new("greet").with_arg("name", "Ada"))
            .await;

        assert!(result.is_success());
        assert_eq!(result.output(), Some("Hello, Ada!"));
        assert!(result.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_execute_with_fallback_argument() {
        let executor = RegistryToolExecutor::new(registry());
        let call = ToolCall::new("greet").with_arguments(ToolArguments::fallback("Bob"));
        let result = executor.execute(&call).await;

        assert_eq!(result.output(), Some("Hello, Bob!"));
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let executor = RegistryToolExecutor::new(registry());
        let result = executor.execute(&ToolCall::new("greet")).await;

        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
        assert_eq!(
            Observation::from(&result).text,
            "Error: Missing required argument: name"
        );
    }

    #[tokio::test]
    async fn test_missing_required_arguments_skip_handler() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = Arc::new(ToolRegistry::new());
        registry.register(ToolDefinition::new(
            "route",
            "Plan a route",
            &json!([{"name": "from"}, {"name": "to"}]),
            Arc::new(SyncFnHandler::new(move |_: &ToolArguments| {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(json!("ok"))
            })),
        ));
        let executor = RegistryToolExecutor::new(registry);

        let result = executor
            .execute(&ToolCall::new("route").with_arg("from", "Paris"))
            .await;
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
        assert_eq!(result.error().unwrap().message, "Missing required argument: to");

        let call = ToolCall::new("route").with_arguments(ToolArguments::fallback("Paris to Rome"));
        let result = executor.execute(&call).await;
        assert_eq!(
            result.error().unwrap().message,
            "Missing required arguments: from, to"
        );
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);

        let result = executor
            .execute(&ToolCall::new("route").with_arg("from", "Paris").with_arg("to", "Rome"))
            .await;
        assert_eq!(result.output(), Some("ok"));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_structured_output_is_pretty_json() {
        let executor = RegistryToolExecutor::new(registry());
        let result = executor.execute(&ToolCall::new("structured")).await;
        assert_eq!(result.output(), Some("{\n  \"ok\": true\n}"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let executor =
            RegistryToolExecutor::new(registry()).with_timeout(Duration::from_millis(100));
        let result = executor.execute(&ToolCall::new("slow")).await;

        assert_eq!(result.error().unwrap().code, "TIMEOUT");
    }

    #[test]
    fn test_descriptors_follow_registry() {
        let executor = RegistryToolExecutor::new(registry());
        assert!(executor.has_tool("greet"));
        assert!(!executor.has_tool("nope"));
        assert_eq!(executor.available_tools(), vec!["greet", "structured", "slow"]);
        assert_eq!(executor.tool_descriptors().len(), 3);
    }
}
