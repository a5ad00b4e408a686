//! Backend configuration from TOML (`[backend]` section)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::providers::OpenAiCompatConfig;

/// Raw backend configuration from TOML
///
/// # Example
///
/// ```toml
/// [backend]
/// base_url = "http://localhost:11434/v1"   # vLLM, Ollama /v1, llama.cpp
/// model = "qwen2.5"
/// temperature = 0.0
/// max_tokens = 1024
/// stop = ["Observation:", "\nQuestion:"]   # [] to send none
/// timeout_seconds = 120
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// OpenAI-compatible API root (ends in `/v1`)
    pub base_url: String,
    /// Model name sent with every request
    pub model: String,
    /// Bearer token, if the server requires one
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Stop sequences sent with every request
    pub stop: Vec<String>,
    /// Timeout in seconds for one backend request
    pub timeout_seconds: u64,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        let defaults = OpenAiCompatConfig::default();
        Self {
            base_url: defaults.base_url,
            model: defaults.model,
            api_key: None,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            stop: defaults.stop,
            timeout_seconds: defaults.timeout.as_secs(),
        }
    }
}

impl FileBackendConfig {
    pub fn to_openai_config(&self) -> OpenAiCompatConfig {
        OpenAiCompatConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone().filter(|k| !k.is_empty()),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stop: self.stop.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}
