use super::{StrategyExecutor, mismatch};
use crate::error::ChunkingError;
use crate::shape::Shape;
use serde_json::Value;
use sluice_core::{
    ChunkedResponse, ChunkingConfig, ContinuationToken, PaginationState, SummaryStrategy,
};

/// Returns a bounded prefix of an array and where to resume.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paginator;

impl Paginator {
    /// Items per page: 80% of the configured cap, leaving headroom.
    pub fn page_size(config: &ChunkingConfig) -> usize {
        (config.max_array_items * 8 / 10).max(1)
    }

    /// The page of `items` starting at `token`.
    ///
    /// A token past the end yields an empty page with nothing more to fetch.
    pub fn page_from(
        items: &[Value],
        token: ContinuationToken,
        config: &ChunkingConfig,
    ) -> ChunkedResponse {
        let total = items.len();
        let page_size = Self::page_size(config);
        let start = token.offset.min(total);
        let end = start.saturating_add(page_size).min(total);
        let shown = end - start;

        let summary = if start >= total && total > 0 {
            format!("No items remain after offset {} of {}", token.offset, total)
        } else if start == 0 && end == total {
            format!("All {} items fit in a single chunk", total)
        } else if start == 0 {
            format!(
                "Showing first {} of {} items (paginated into chunks of {})",
                shown, total, page_size
            )
        } else {
            format!(
                "Showing items {}-{} of {} (paginated into chunks of {})",
                start + 1,
                end,
                total,
                page_size
            )
        };

        let pagination = PaginationState::at(total, end, page_size);
        let warning = pagination.continuation_token.as_ref().map(|next| {
            format!(
                "Only {} of {} items are shown; request continuation token '{}' for the next chunk",
                shown, total, next
            )
        });

        let mut response = ChunkedResponse::new(summary, Value::Array(items[start..end].to_vec()));
        response.metadata.pagination = Some(pagination);
        response.warnings.extend(warning);
        response
    }
}

impl StrategyExecutor for Paginator {
    fn strategy(&self) -> SummaryStrategy {
        SummaryStrategy::Paginate
    }

    fn execute(
        &self,
        shape: Shape<'_>,
        config: &ChunkingConfig,
    ) -> Result<ChunkedResponse, ChunkingError> {
        match shape {
            Shape::Array(items) => Ok(Self::page_from(items, ContinuationToken::at(0), config)),
            other => Err(mismatch(self.strategy(), other)),
        }
    }
}
