//! Configuration file loading for toolbox-agent
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOLBOX_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./toolbox.toml` or `./.toolbox.toml`
//! 4. Global: `$XDG_CONFIG_HOME/toolbox-agent/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentConfig, FileBackendConfig, FileConfig, FileToolsConfig,
};
pub use loader::ConfigLoader;
