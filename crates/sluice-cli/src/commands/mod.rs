//! CLI command implementations.
//!
//! Each command returns the text to print so it can be tested without
//! capturing stdout.

pub mod analyze;
pub mod chunk;
pub mod limit;
pub mod resume;

use anyhow::{Context, Result};
use serde_json::Value;
use sluice_core::{ChunkingConfig, Preset, SluiceConfig};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<Value> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read JSON from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    };

    serde_json::from_str(&content)
        .with_context(|| format!("Input is not valid JSON: {}", path.display()))
}

/// Chunking budget from a preset, a config file, or the default.
pub fn chunking_config(preset: Option<Preset>, config: Option<&Path>) -> Result<ChunkingConfig> {
    if let Some(preset) = preset {
        return Ok(ChunkingConfig::preset(preset));
    }
    match config {
        Some(path) => {
            let config = SluiceConfig::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "Loaded configuration");
            Ok(config.chunking)
        }
        None => Ok(ChunkingConfig::default()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// A temporary file holding `content`.
    pub fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }
}
