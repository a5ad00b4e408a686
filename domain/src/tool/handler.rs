//! Tool handler capability.
//!
//! A handler is the executable half of a [`ToolDefinition`](super::ToolDefinition):
//! one `invoke` operation that receives the full argument mapping and either
//! returns a JSON value or fails with a [`ToolError`]. Handlers destructure
//! the arguments themselves; single-parameter handlers typically use
//! [`ToolArguments::get_str_or_first`] so that the degraded `{"input": raw}`
//! payload still reaches them.

use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;

use super::entities::ToolArguments;
use super::value_objects::ToolError;

/// Executable capability behind a registered tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Invoke the tool with the given arguments.
    async fn invoke(&self, arguments: &ToolArguments) -> Result<Value, ToolError>;
}

/// Handler backed by an async closure.
pub struct FnHandler<F> {
    f: F,
}

impl<F, Fut> FnHandler<F>
where
    F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    async fn invoke(&self, arguments: &ToolArguments) -> Result<Value, ToolError> {
        (self.f)(arguments.clone()).await
    }
}

/// Handler backed by a synchronous closure.
pub struct SyncFnHandler<F> {
    f: F,
}

impl<F> SyncFnHandler<F>
where
    F: Fn(&ToolArguments) -> Result<Value, ToolError> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> ToolHandler for SyncFnHandler<F>
where
    F: Fn(&ToolArguments) -> Result<Value, ToolError> + Send + Sync + 'static,
{
    async fn invoke(&self, arguments: &ToolArguments) -> Result<Value, ToolError> {
        (self.f)(arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fn_handler() {
        let handler = FnHandler::new(|args: ToolArguments| async move {
            let location = args.get_str_or_first("location").unwrap_or_default();
            Ok::<_, ToolError>(json!(format!("Weather in {}", location)))
        });

        let result = handler
            .invoke(&ToolArguments::new().with("location", "Paris"))
            .await
            .unwrap();
        assert_eq!(result, json!("Weather in Paris"));
    }

    #[tokio::test]
    async fn test_sync_fn_handler_error() {
        let handler = SyncFnHandler::new(|args: &ToolArguments| {
            args.require_str("query")
                .map(|q| json!(q))
                .map_err(ToolError::invalid_argument)
        });

        let err = handler.invoke(&ToolArguments::new()).await.unwrap_err();
        assert_eq!(err.code, "INVALID_ARGUMENT");
        assert!(err.message.contains("query"));
    }

    #[tokio::test]
    async fn test_handler_as_trait_object() {
        let handler: std::sync::Arc<dyn ToolHandler> =
            std::sync::Arc::new(SyncFnHandler::new(|_: &ToolArguments| Ok(json!(1))));
        assert_eq!(handler.invoke(&ToolArguments::new()).await.unwrap(), json!(1));
    }
}
