//! Error types for the chunking crate.
//!
//! These never leave the orchestrator: it converts every failure into a
//! truncated response at its outer boundary.

use sluice_core::SummaryStrategy;
use thiserror::Error;

/// Failures inside the analysis and reduction pipeline.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// A value or reduced payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An executor was handed a shape it does not reduce.
    #[error("{strategy:?} strategy cannot reduce a {found} value")]
    ShapeMismatch {
        strategy: SummaryStrategy,
        found: &'static str,
    },
}
