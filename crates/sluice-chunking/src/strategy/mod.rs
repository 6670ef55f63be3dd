//! Reduction strategies.
//!
//! Four peer executors consume the analyzer's verdict:
//!
//! | Executor | Arrays | Objects | Primitives |
//! |----------|--------|---------|------------|
//! | [`Paginator`] | bounded prefix + continuation token | truncated | truncated |
//! | [`Sampler`] | head/middle/tail sample | top-ranked properties | truncated |
//! | [`Summarizer`] | statistics + first items | statistics + first properties | truncated |
//! | [`Truncator`] | byte-level cut | byte-level cut | byte-level cut |
//!
//! An executor reports a shape it does not handle as
//! [`ChunkingError::ShapeMismatch`]; [`execute`] turns that into a truncation.

mod paginate;
mod sample;
mod summarize;
pub(crate) mod truncate;

pub use paginate::Paginator;
pub use sample::Sampler;
pub use summarize::Summarizer;
pub use truncate::{TRUNCATION_MARKER, Truncator};

use crate::error::ChunkingError;
use crate::shape::Shape;
use sluice_core::{ChunkedResponse, ChunkingConfig, SummaryStrategy};

/// A reduction algorithm.
pub trait StrategyExecutor: Send + Sync {
    /// The strategy this executor implements.
    fn strategy(&self) -> SummaryStrategy;

    /// Reduce `shape` to fit `config`.
    fn execute(
        &self,
        shape: Shape<'_>,
        config: &ChunkingConfig,
    ) -> Result<ChunkedResponse, ChunkingError>;
}

/// Executor implementing `strategy`.
pub fn executor_for(strategy: SummaryStrategy) -> &'static dyn StrategyExecutor {
    match strategy {
        SummaryStrategy::Paginate => &Paginator,
        SummaryStrategy::Sample => &Sampler,
        SummaryStrategy::Summarize => &Summarizer,
        SummaryStrategy::Truncate => &Truncator,
    }
}

/// Run `strategy` on `shape`, truncating instead when the shape does not fit it.
///
/// Returns the response together with the strategy actually applied.
pub fn execute(
    strategy: SummaryStrategy,
    shape: Shape<'_>,
    config: &ChunkingConfig,
) -> Result<(ChunkedResponse, SummaryStrategy), ChunkingError> {
    match executor_for(strategy).execute(shape, config) {
        Ok(response) => Ok((response, strategy)),
        Err(ChunkingError::ShapeMismatch { strategy, found }) => {
            tracing::debug!(?strategy, found, "Strategy does not fit shape; truncating");
            Ok((Truncator::truncate(shape, config), SummaryStrategy::Truncate))
        }
        Err(err) => Err(err),
    }
}

fn mismatch(strategy: SummaryStrategy, shape: Shape<'_>) -> ChunkingError {
    ChunkingError::ShapeMismatch {
        strategy,
        found: shape.kind(),
    }
}
