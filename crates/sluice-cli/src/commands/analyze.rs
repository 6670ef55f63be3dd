//! `sluice analyze` - print the analyzer's verdict.

use super::{chunking_config, read_input};
use anyhow::{Context, Result};
use sluice_chunking::analyze;
use sluice_core::Preset;
use std::path::Path;

pub fn run(file: &Path, preset: Option<Preset>, config: Option<&Path>) -> Result<String> {
    let value = read_input(file)?;
    let config = chunking_config(preset, config)?;
    let analysis = analyze(&value, &config);
    serde_json::to_string_pretty(&analysis).context("Failed to serialize analysis")
}
