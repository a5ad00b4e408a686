//! Tool catalogue loading.
//!
//! Two file formats are accepted, chosen by extension:
//!
//! YAML (`.yaml`, `.yml`, anything not `.json`):
//!
//! ```yaml
//! tools:
//!   lookup_order:
//!     kind: postgres-sql
//!     description: Find an order by id
//!     parameters:
//!       - name: order_id
//!         type: string
//!         description: Order identifier
//! toolsets:
//!   orders: [lookup_order]
//! ```
//!
//! JSON (`.json`): a list of function tools
//! `[{"type": "function", "function": {"name", "description", "parameters"}}]`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from loading a catalogue.
#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Catalogue file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read catalogue {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML catalogue: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON catalogue: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown toolset: {0}")]
    UnknownToolset(String),

    #[error("Toolset '{toolset}' references undeclared tool '{tool}'")]
    UndeclaredTool { toolset: String, tool: String },
}

/// A tool declared in a catalogue, before a handler is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// Raw parameter declaration, in either shape `SchemaConverter` accepts.
    pub parameters: Value,
}

impl ToolDeclaration {
    fn new(name: String, description: Option<String>, parameters: Value) -> Self {
        let description = description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Tool: {}", name));
        Self {
            name,
            description,
            parameters,
        }
    }
}

/// Loaded catalogue: declarations in file order plus named toolsets.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalogue {
    tools: Vec<ToolDeclaration>,
    toolsets: HashMap<String, Vec<String>>,
}

#[derive(Deserialize)]
struct YamlCatalogue {
    #[serde(default)]
    tools: Map<String, Value>,
    #[serde(default)]
    toolsets: HashMap<String, Vec<String>>,
}

#[derive(Deserialize)]
struct YamlTool {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Value,
}

#[derive(Deserialize)]
struct FunctionTool {
    #[serde(rename = "type")]
    tool_type: String,
    #[serde(default)]
    function: Option<FunctionSpec>,
}

#[derive(Deserialize)]
struct FunctionSpec {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Value,
}

impl ToolCatalogue {
    /// Load a catalogue file; `.json` is parsed as a function list, anything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self, CatalogueError> {
        if !path.exists() {
            return Err(CatalogueError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| CatalogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let catalogue = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        debug!(path = %path.display(), tools = catalogue.len(), "Loaded tool catalogue");
        Ok(catalogue)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogueError> {
        let raw: YamlCatalogue = serde_yaml::from_str(content)?;

        let mut tools = Vec::with_capacity(raw.tools.len());
        for (name, value) in raw.tools {
            let tool: YamlTool = serde_json::from_value(value)?;
            if let Some(kind) = &tool.kind {
                debug!(tool = %name, kind = %kind, "Catalogue tool");
            }
            tools.push(ToolDeclaration::new(name, tool.description, tool.parameters));
        }

        Ok(Self {
            tools,
            toolsets: raw.toolsets,
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogueError> {
        let entries: Vec<FunctionTool> = serde_json::from_str(content)?;

        let tools = entries
            .into_iter()
            .filter_map(|entry| {
                if entry.tool_type != "function" {
                    warn!(tool_type = %entry.tool_type, "Skipping non-function catalogue entry");
                    return None;
                }
                entry.function
            })
            .map(|f| ToolDeclaration::new(f.name, f.description, f.parameters))
            .collect();

        Ok(Self {
            tools,
            toolsets: HashMap::new(),
        })
    }

    pub fn tools(&self) -> &[ToolDeclaration] {
        &self.tools
    }

    pub fn into_tools(self) -> Vec<ToolDeclaration> {
        self.tools
    }

    /// Declarations belonging to a named toolset, in toolset order.
    pub fn toolset(&self, name: &str) -> Result<Vec<ToolDeclaration>, CatalogueError> {
        let members = self
            .toolsets
            .get(name)
            .ok_or_else(|| CatalogueError::UnknownToolset(name.to_string()))?;

        members
            .iter()
            .map(|member| {
                self.tools
                    .iter()
                    .find(|t| &t.name == member)
                    .cloned()
                    .ok_or_else(|| CatalogueError::UndeclaredTool {
                        toolset: name.to_string(),
                        tool: member.clone(),
                    })
            })
            .collect()
    }

    pub fn toolset_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.toolsets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
