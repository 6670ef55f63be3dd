//! Configuration types for sluice.
//!
//! A single `sluice.yaml` file describes the chunking budget, the limiter
//! ceiling, and which tools are served through which entry point:
//!
//! ```yaml
//! chunking:
//!   preset: conservative
//!   max_array_items: 30
//! limiter:
//!   max_tokens: 10000
//! surfaces:
//!   execute_sql: token_constrained
//! default_surface: general
//! ```

pub mod chunking;
pub mod limiter;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub use chunking::{ChunkingConfig, Preset, SummaryStrategy};
pub use limiter::LimitConfig;

/// Which entry point reduces a tool's output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Structured envelope from the chunking orchestrator.
    #[default]
    General,
    /// Pre-formatted string from the simple limiter.
    TokenConstrained,
}

/// Complete sluice configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SluiceConfig {
    /// Budget for the chunking orchestrator.
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Ceiling for the simple limiter.
    #[serde(default)]
    pub limiter: LimitConfig,

    /// Per-tool surface overrides, keyed by tool name.
    #[serde(default)]
    pub surfaces: HashMap<String, Surface>,

    /// Surface for tools not listed in `surfaces`.
    #[serde(default)]
    pub default_surface: Surface,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SluiceConfig {
    /// Load and validate configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chunking.validate()?;
        if self.limiter.max_tokens == 0 {
            return Err(ConfigError::Config(
                "limiter.max_tokens must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Surface a tool's output is reduced through.
    pub fn surface_for(&self, tool: &str) -> Surface {
        self.surfaces
            .get(tool)
            .copied()
            .unwrap_or(self.default_surface)
    }

    pub fn with_surface(mut self, tool: impl Into<String>, surface: Surface) -> Self {
        self.surfaces.insert(tool.into(), surface);
        self
    }
}
