//! Error types for the MCP crate.

use thiserror::Error;

/// Errors that can occur while setting up the tool-result layer.
#[derive(Debug, Error)]
pub enum McpError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] sluice_core::ConfigError),
}
