//! # sluice-chunking
//!
//! Size governance for MCP tool results.
//!
//! A tool result is measured once, and if it is too big for an agent's
//! context, reduced by one of four strategies before it goes back over the
//! wire:
//!
//! ```text
//! tool result (serde_json::Value)
//!       │
//!       ▼
//! ┌──────────────┐   analysis    ┌─────────────────────────────┐
//! │ Orchestrator │ ────────────▶ │ Paginator │ Sampler │ ...   │
//! │  (never      │ ◀──────────── │  (strategy executors)       │
//! │   fails)     │   response    └─────────────────────────────┘
//! └──────┬───────┘
//!        ▼
//!  ChunkedResponse { summary, data, metadata, warnings }
//! ```
//!
//! Token-constrained surfaces use the [`limiter`] instead, which returns a
//! finished string under a hard token ceiling.
//!
//! ## Example
//!
//! ```ignore
//! use sluice_chunking::Orchestrator;
//! use sluice_core::ChunkingConfig;
//!
//! let orchestrator = Orchestrator::new(ChunkingConfig::database_results());
//! let result = orchestrator.process(rows);
//! let text = result.response.render(orchestrator.config().include_metadata);
//! ```

pub mod analyzer;
pub mod error;
pub mod estimate;
pub mod limiter;
pub mod orchestrator;
pub mod shape;
pub mod strategy;

pub use analyzer::analyze;
pub use error::ChunkingError;
pub use limiter::limit;
pub use orchestrator::Orchestrator;
pub use shape::Shape;
pub use strategy::{
    Paginator, Sampler, StrategyExecutor, Summarizer, TRUNCATION_MARKER, Truncator, executor_for,
};

use serde_json::Value;
use sluice_core::{ChunkedResponse, ChunkingConfig};

/// Process `value` with a one-off orchestrator and return the envelope.
pub fn chunk_response(value: Value, config: &ChunkingConfig) -> ChunkedResponse {
    Orchestrator::new(config.clone()).process(value).response
}
