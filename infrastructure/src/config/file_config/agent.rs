//! Agent configuration from TOML (`[agent]` section)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use toolbox_application::ExecutionParams;

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// max_iterations = 5
/// native_tools = false                     # advertise tools for function calling
/// conversation_log = "~/toolbox-runs.jsonl"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Maximum think-act-observe iterations per query
    pub max_iterations: usize,
    /// Send the tool catalogue for native function calling
    pub native_tools: bool,
    /// JSONL transcript file (disabled when unset)
    pub conversation_log: Option<PathBuf>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_iterations: params.max_iterations,
            native_tools: params.native_tools,
            conversation_log: None,
        }
    }
}

impl FileAgentConfig {
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_iterations(self.max_iterations)
            .with_native_tools(self.native_tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults() {
        let config = FileAgentConfig::default();
        assert_eq!(config.max_iterations, 5);
        assert!(!config.native_tools);
        assert!(config.conversation_log.is_none());
    }

    #[test]
    fn test_agent_deserialize() {
        let toml_str = r#"
[agent]
max_iterations = 8
native_tools = true
conversation_log = "/tmp/run.jsonl"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let params = config.agent.to_execution_params();
        assert_eq!(params.max_iterations, 8);
        assert!(params.native_tools);
        assert_eq!(
            config.agent.conversation_log,
            Some(PathBuf::from("/tmp/run.jsonl"))
        );
    }
}
