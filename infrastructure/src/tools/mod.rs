//! Tool registry, executor and tool sources.
//!
//! ## Sources
//!
//! - `builtin`: in-process tools (calculator, mock weather and search)
//! - `catalogue`: YAML / JSON declarations loaded from disk
//! - `toolbox`: catalogue tools executed by a remote toolbox service

pub mod builtin;
pub mod catalogue;
pub mod toolbox;

mod executor;
mod registry;

pub use builtin::builtin_tools;
pub use catalogue::{CatalogueError, ToolCatalogue, ToolDeclaration};
pub use executor::RegistryToolExecutor;
pub use registry::{RegistryError, ToolRegistry};
pub use toolbox::{ToolboxHandler, toolbox_definitions};

use crate::config::FileToolsConfig;
use tracing::info;

/// Build the registry described by the `[tools]` section: built-in tools
/// first, then catalogue tools (optionally one toolset) backed by the
/// toolbox service.
pub fn assemble_registry(config: &FileToolsConfig) -> Result<ToolRegistry, CatalogueError> {
    let registry = ToolRegistry::new();

    if config.builtin {
        registry.register_all(builtin_tools());
    }

    if let Some(path) = &config.catalogue {
        let catalogue = ToolCatalogue::load(path)?;
        let declarations = match &config.toolset {
            Some(set) => catalogue.toolset(set)?,
            None => catalogue.into_tools(),
        };
        let client = reqwest::Client::new();
        registry.register_all(toolbox_definitions(
            &client,
            &config.toolbox_url,
            &declarations,
        ));
    }

    info!(tools = registry.len(), "Tool registry assembled");
    Ok(registry)
}
