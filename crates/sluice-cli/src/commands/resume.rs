//! `sluice resume` - print the page that starts at a continuation token.

use super::{chunking_config, read_input};
use anyhow::Result;
use sluice_chunking::Orchestrator;
use sluice_core::{ContinuationToken, Preset};
use std::path::Path;

pub fn run(
    file: &Path,
    token: ContinuationToken,
    preset: Option<Preset>,
    config: Option<&Path>,
    include_metadata: bool,
) -> Result<String> {
    let value = read_input(file)?;
    let config = chunking_config(preset, config)?.with_metadata(include_metadata);
    let orchestrator = Orchestrator::new(config);

    let result = orchestrator.resume(value, token);
    Ok(result.response.render(orchestrator.config().include_metadata))
}
