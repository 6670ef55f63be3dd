//! `sluice limit` - run the simple limiter.

use super::read_input;
use anyhow::{Result, bail};
use sluice_core::LimitConfig;
use std::path::Path;

pub fn run(
    file: &Path,
    label: &str,
    max_tokens: usize,
    max_items: usize,
    include_warning: bool,
) -> Result<String> {
    if max_tokens == 0 {
        bail!("--max-tokens must be greater than zero");
    }
    let value = read_input(file)?;

    let mut config = LimitConfig::new(max_tokens).with_max_array_items(max_items);
    if !include_warning {
        config = config.without_warning();
    }
    Ok(sluice_chunking::limit(&value, label, &config))
}
