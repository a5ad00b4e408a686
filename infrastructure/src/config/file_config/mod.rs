//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into runtime settings by
//! the `to_*` helpers on each section.

mod agent;
mod backend;
mod tools;

pub use agent::FileAgentConfig;
pub use backend::FileBackendConfig;
pub use tools::FileToolsConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("agent.max_iterations cannot be 0")]
    ZeroIterations,

    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("backend.model cannot be empty")]
    EmptyModelName,

    #[error("backend.base_url cannot be empty")]
    EmptyBaseUrl,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model backend connection
    pub backend: FileBackendConfig,
    /// Loop settings
    pub agent: FileAgentConfig,
    /// Tool sources
    pub tools: FileToolsConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.agent.max_iterations == 0 {
            issues.push(ConfigValidationError::ZeroIterations);
        }
        if self.backend.timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout("backend.timeout_seconds"));
        }
        if self.tools.timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::InvalidTimeout("tools.timeout_seconds"));
        }
        if self.backend.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName);
        }
        if self.backend.base_url.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyBaseUrl);
        }

        issues
    }
}
