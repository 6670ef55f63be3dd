//! `sluice chunk` - run the orchestrator and print the rendered result.

use super::{chunking_config, read_input};
use anyhow::Result;
use sluice_chunking::Orchestrator;
use sluice_core::Preset;
use std::path::Path;

pub fn run(
    file: &Path,
    preset: Option<Preset>,
    config: Option<&Path>,
    include_metadata: bool,
) -> Result<String> {
    let value = read_input(file)?;
    let config = chunking_config(preset, config)?.with_metadata(include_metadata);
    let orchestrator = Orchestrator::new(config);

    let result = orchestrator.process(value);
    tracing::info!(
        strategy = %result.strategy,
        elapsed_ms = result.processing_time.as_millis() as u64,
        "Chunked input"
    );
    Ok(result.response.render(orchestrator.config().include_metadata))
}
