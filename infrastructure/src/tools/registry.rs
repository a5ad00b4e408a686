//! Tool Registry
//!
//! The [`ToolRegistry`] owns every [`ToolDefinition`] the process can run,
//! whatever its origin (builtin, catalogue-declared toolbox tool, test
//! closure). It is shared via `Arc` between concurrent runs and protocol
//! calls.
//!
//! # Usage
//!
//! ```ignore
//! let registry = Arc::new(ToolRegistry::new());
//! registry.register(builtin::calculator());
//!
//! assert!(registry.contains("calculator"));
//! let tool = registry.get("calculator")?;
//! ```
//!
//! # Locking
//!
//! Reads take the shared lock; `register` takes the exclusive lock only for
//! the mutation itself. Definitions are handed out as `Arc` clones, so no
//! lock is ever held while a tool runs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use toolbox_domain::{ToolDefinition, ToolDescriptor};
use tracing::debug;

/// Errors from registry lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool not found: {0}")]
    NotFound(String),
}

#[derive(Default)]
struct Inner {
    /// Definitions in registration order
    tools: Vec<Arc<ToolDefinition>>,
    /// Tool name -> position in `tools`
    index: HashMap<String, usize>,
}

/// Name-keyed collection of tool definitions.
#[derive(Default)]
pub struct ToolRegistry {
    inner: RwLock<Inner>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any existing tool with the same name.
    ///
    /// A replaced tool keeps its position in [`list`](Self::list).
    pub fn register(&self, definition: ToolDefinition) {
        let name = definition.name.clone();
        let definition = Arc::new(definition);
        let mut inner = self.write();

        match inner.index.get(&name).copied() {
            Some(position) => {
                inner.tools[position] = definition;
                debug!(tool = %name, "Replaced tool");
            }
            None => {
                let position = inner.tools.len();
                inner.tools.push(definition);
                inner.index.insert(name.clone(), position);
                debug!(tool = %name, "Registered tool");
            }
        }
    }

    /// Register several tools in order.
    pub fn register_all(&self, definitions: impl IntoIterator<Item = ToolDefinition>) {
        for definition in definitions {
            self.register(definition);
        }
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Result<Arc<ToolDefinition>, RegistryError> {
        let inner = self.read();
        inner
            .index
            .get(name)
            .map(|&position| Arc::clone(&inner.tools[position]))
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// All tools, in registration order.
    pub fn list(&self) -> Vec<Arc<ToolDefinition>> {
        self.read().tools.clone()
    }

    /// Serializable descriptors of all tools, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.read().tools.iter().map(|t| t.descriptor()).collect()
    }

    /// Tool names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.read().tools.iter().map(|t| t.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read().tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().tools.is_empty()
    }

    // Poisoning is ignored: `register` never leaves `Inner` half-updated.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use toolbox_domain::{SyncFnHandler, ToolArguments};

    fn tool(name: &str, description: &str) -> ToolDefinition {
        ToolDefinition::new(
            name,
            description,
            &json!([{"name": "input"}]),
            Arc::new(SyncFnHandler::new(|args: &ToolArguments| Ok(args.to_value()))),
        )
    }

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(tool("search", "Search the web"));

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("search"));
        assert_eq!(registry.get("search").unwrap().description, "Search the web");
    }

    #[test]
    fn test_get_missing() {
        let registry = ToolRegistry::new();
        assert_eq!(
            registry.get("missing_tool").unwrap_err(),
            RegistryError::NotFound("missing_tool".into())
        );
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let registry = ToolRegistry::new();
        registry.register_all([tool("c", ""), tool("a", ""), tool("b", "")]);

        assert_eq!(registry.names(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let registry = ToolRegistry::new();
        registry.register(tool("first", "v1"));
        registry.register(tool("second", ""));
        registry.register(tool("first", "v2"));

        let listed = registry.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(
            listed.iter().filter(|t| t.name == "first").count(),
            1,
            "tool must be listed exactly once"
        );
        assert_eq!(listed[0].name, "first");
        assert_eq!(listed[0].description, "v2");
    }

    #[test]
    fn test_descriptors_carry_canonical_schema() {
        let registry = ToolRegistry::new();
        registry.register(tool("echo", "Echo"));

        let descriptors = registry.descriptors();
        assert_eq!(descriptors[0].parameters["type"], "object");
        assert_eq!(descriptors[0].parameters["required"], json!(["input"]));
    }

    #[tokio::test]
    async fn test_concurrent_register_and_read() {
        let registry = Arc::new(ToolRegistry::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.register(tool(&format!("tool_{}", i % 4), ""));
                registry.names().len()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap() >= 1);
        }
        assert_eq!(registry.len(), 4);
    }

    #[tokio::test]
    async fn test_handler_outlives_lookup() {
        let registry = ToolRegistry::new();
        registry.register(tool("echo", ""));

        let handler = registry.get("echo").unwrap().handler();
        registry.register(tool("echo", "replaced"));

        let out: Value = handler
            .invoke(&ToolArguments::new().with("input", "x"))
            .await
            .unwrap();
        assert_eq!(out, json!({"input": "x"}));
    }
}
