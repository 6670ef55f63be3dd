//! Chunking orchestrator.
//!
//! Analyzes a value once, dispatches to the recommended (or forced) strategy,
//! and stamps the result with the original size and the strategy applied.
//! Internally every step returns a `Result`; the public entry points turn any
//! failure into a truncation, so callers always get a response back.

use crate::analyzer::analyze_shape;
use crate::error::ChunkingError;
use crate::shape::Shape;
use crate::strategy::{self, Paginator, Truncator};
use serde::Serialize;
use serde_json::Value;
use sluice_core::{
    AppliedStrategy, ChunkedResponse, ChunkingConfig, ChunkingResult, ContinuationToken,
    OriginalSize, ResponseAnalysis, SummaryStrategy,
};
use std::time::Instant;

/// Reduces oversized tool results to fit a [`ChunkingConfig`].
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: ChunkingConfig,
}

impl Orchestrator {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Process `value`. Never fails.
    ///
    /// A value that needs no reduction is moved into the response untouched.
    /// Executors turn shape mismatches into truncations and a `Value` always
    /// serializes, so the degraded path is reached in practice only through
    /// [`Orchestrator::process_serialize`].
    pub fn process(&self, value: Value) -> ChunkingResult {
        let started = Instant::now();
        let shape = Shape::of(&value);
        let analysis = analyze_shape(shape, &self.config);

        if !analysis.should_chunk {
            let mut response = ChunkedResponse::new(
                format!(
                    "Complete response (~{} estimated tokens)",
                    analysis.estimated_tokens
                ),
                value,
            );
            stamp(&mut response, &analysis, AppliedStrategy::None);
            return ChunkingResult {
                response,
                strategy: AppliedStrategy::None,
                processing_time: started.elapsed(),
            };
        }

        let strategy = self.select_strategy(&analysis);
        let (mut response, applied) = match self.reduce(shape, strategy) {
            Ok((response, applied)) => (response, AppliedStrategy::from(applied)),
            Err(err) => (self.degrade(shape, strategy, &err), AppliedStrategy::Truncate),
        };
        stamp(&mut response, &analysis, applied);

        tracing::info!(
            strategy = %applied,
            original_tokens = analysis.estimated_tokens,
            original_characters = analysis.character_count,
            "Reduced oversized response"
        );

        ChunkingResult {
            response,
            strategy: applied,
            processing_time: started.elapsed(),
        }
    }

    /// Process any serializable value. Never fails.
    ///
    /// A value that cannot be represented as JSON becomes a truncated
    /// response carrying the serialization error.
    pub fn process_serialize<T: Serialize + ?Sized>(&self, value: &T) -> ChunkingResult {
        let started = Instant::now();
        match serde_json::to_value(value) {
            Ok(value) => self.process(value),
            Err(err) => {
                tracing::warn!(error = %err, "Response could not be serialized; truncating");
                let mut response = strategy::truncate::unserializable(&err);
                stamp(
                    &mut response,
                    &ResponseAnalysis::degraded(0, 0),
                    AppliedStrategy::Truncate,
                );
                ChunkingResult {
                    response,
                    strategy: AppliedStrategy::Truncate,
                    processing_time: started.elapsed(),
                }
            }
        }
    }

    /// Continue a paginated array at `token`.
    ///
    /// Non-array values have no pages; they are processed from the start.
    pub fn resume(&self, value: Value, token: ContinuationToken) -> ChunkingResult {
        let started = Instant::now();
        let Value::Array(items) = &value else {
            let mut result = self.process(value);
            result.response.warnings.push(
                "Continuation tokens only apply to arrays; returned from the start".to_string(),
            );
            return result;
        };

        let analysis = analyze_shape(Shape::Array(items), &self.config);
        let mut response = Paginator::page_from(items, token, &self.config);
        stamp(&mut response, &analysis, AppliedStrategy::Paginate);
        ChunkingResult {
            response,
            strategy: AppliedStrategy::Paginate,
            processing_time: started.elapsed(),
        }
    }

    fn select_strategy(&self, analysis: &ResponseAnalysis) -> SummaryStrategy {
        if self.config.force_strategy {
            self.config.summary_strategy
        } else {
            analysis.suggested_strategy
        }
    }

    /// Truncate `shape` after `strategy` failed with `err`.
    fn degrade(
        &self,
        shape: Shape<'_>,
        strategy: SummaryStrategy,
        err: &ChunkingError,
    ) -> ChunkedResponse {
        tracing::warn!(
            error = %err,
            ?strategy,
            "Chunking strategy failed; falling back to truncation"
        );
        Truncator::truncate(shape, &self.config)
            .with_warning(format!("{:?} reduction failed: {}", strategy, err))
    }

    /// Run `strategy`, then truncate its output if it still exceeds the
    /// character budget.
    fn reduce(
        &self,
        shape: Shape<'_>,
        strategy: SummaryStrategy,
    ) -> Result<(ChunkedResponse, SummaryStrategy), ChunkingError> {
        let (mut response, applied) = strategy::execute(strategy, shape, &self.config)?;
        if applied == SummaryStrategy::Truncate {
            return Ok((response, applied));
        }

        let characters = serde_json::to_string(&response.data)?.chars().count();
        if characters > self.config.max_characters {
            let truncated = Truncator::truncate(Shape::of(&response.data), &self.config);
            response.data = truncated.data;
            response.summary.push_str(" (truncated to fit)");
            response.warnings.push(format!(
                "Reduced data was still {} characters (limit {}) and was truncated",
                characters, self.config.max_characters
            ));
        }
        Ok((response, applied))
    }
}

/// Attach the original size and the applied strategy.
fn stamp(response: &mut ChunkedResponse, analysis: &ResponseAnalysis, applied: AppliedStrategy) {
    response.metadata.original_size = Some(OriginalSize::from(analysis));
    response.metadata.strategy_applied = Some(applied);
}
