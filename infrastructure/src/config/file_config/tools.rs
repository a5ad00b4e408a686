//! Tools configuration from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! builtin = true                           # calculator, get_weather, search
//! catalogue = "tools.yaml"                 # YAML tools/toolsets or JSON function list
//! toolset = "orders"                       # restrict the catalogue to one toolset
//! toolbox_url = "http://localhost:5000"    # executes catalogue tools
//! timeout_seconds = 30                     # per tool call
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Register the built-in tools
    pub builtin: bool,
    /// Catalogue file with remote tool declarations
    pub catalogue: Option<PathBuf>,
    /// Only register this toolset from the catalogue
    pub toolset: Option<String>,
    /// Toolbox service that executes catalogue tools
    pub toolbox_url: String,
    /// Per-call timeout (unlimited when unset)
    pub timeout_seconds: Option<u64>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            catalogue: None,
            toolset: None,
            toolbox_url: "http://localhost:5000".to_string(),
            timeout_seconds: None,
        }
    }
}

impl FileToolsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
