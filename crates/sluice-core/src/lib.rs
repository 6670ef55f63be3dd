//! # sluice-core
//!
//! Data model shared by the sluice crates: the analysis verdict computed for a
//! tool result, the envelope a reduced result travels in, and the metadata
//! describing what was done to it. Configuration lives in [`config`].
//!
//! Every type here is a plain value. Nothing is cached or mutated across
//! calls, so the whole pipeline can run concurrently from many tool calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// Configuration types shared across all sluice crates
pub mod config;

pub use config::{
    ChunkingConfig, ConfigError, LimitConfig, Preset, SluiceConfig, SummaryStrategy, Surface,
};

/// Structural classification of a value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Array,
    /// A flat record: few of its properties hold arrays or objects.
    Object,
    Primitive,
    /// An object whose properties are mostly arrays/objects (a tree, not a record).
    Mixed,
}

/// The strategy recorded on a response after processing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppliedStrategy {
    None,
    Truncate,
    Sample,
    Summarize,
    Paginate,
}

impl From<SummaryStrategy> for AppliedStrategy {
    fn from(strategy: SummaryStrategy) -> Self {
        match strategy {
            SummaryStrategy::Truncate => AppliedStrategy::Truncate,
            SummaryStrategy::Sample => AppliedStrategy::Sample,
            SummaryStrategy::Summarize => AppliedStrategy::Summarize,
            SummaryStrategy::Paginate => AppliedStrategy::Paginate,
        }
    }
}

impl fmt::Display for AppliedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppliedStrategy::None => "none",
            AppliedStrategy::Truncate => "truncate",
            AppliedStrategy::Sample => "sample",
            AppliedStrategy::Summarize => "summarize",
            AppliedStrategy::Paginate => "paginate",
        };
        f.write_str(name)
    }
}

/// Result of analyzing one value against one configuration.
///
/// Computed fresh per call and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseAnalysis {
    /// Approximate token cost. A characters-per-token heuristic, not a tokenizer.
    pub estimated_tokens: usize,
    /// Length of the compact JSON serialization.
    pub character_count: usize,
    pub response_type: ResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_item_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_property_count: Option<usize>,
    /// Deepest container nesting; a scalar root has depth 0.
    #[serde(default)]
    pub max_depth: usize,
    /// Structural complexity in `[0, 1]`.
    pub complexity: f64,
    pub suggested_strategy: SummaryStrategy,
    /// True iff a structural threshold (items, properties, depth) is exceeded.
    pub should_chunk: bool,
}

impl ResponseAnalysis {
    /// Conservative verdict used when a value could not be measured precisely.
    ///
    /// No structural threshold can be evaluated, so the verdict asks for
    /// truncation and lets the truncator decide whether anything is cut.
    pub fn degraded(character_count: usize, estimated_tokens: usize) -> Self {
        Self {
            estimated_tokens,
            character_count,
            response_type: ResponseType::Mixed,
            array_item_count: None,
            object_property_count: None,
            max_depth: 0,
            complexity: 0.5,
            suggested_strategy: SummaryStrategy::Truncate,
            should_chunk: true,
        }
    }
}

/// Size of the input before any reduction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OriginalSize {
    pub characters: usize,
    pub estimated_tokens: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_properties: Option<usize>,
}

impl From<&ResponseAnalysis> for OriginalSize {
    fn from(analysis: &ResponseAnalysis) -> Self {
        Self {
            characters: analysis.character_count,
            estimated_tokens: analysis.estimated_tokens,
            array_items: analysis.array_item_count,
            object_properties: analysis.object_property_count,
        }
    }
}

/// Pagination state of a response.
///
/// Whenever `has_more` is true, `continuation_token` is present and encodes
/// the offset to resume from. Build it with [`PaginationState::at`] to keep
/// that guarantee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationState {
    pub total_items: usize,
    pub chunk_size: usize,
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

impl PaginationState {
    /// State for a response that covers items up to (excluding) `next_offset`.
    pub fn at(total_items: usize, next_offset: usize, chunk_size: usize) -> Self {
        let has_more = next_offset < total_items;
        Self {
            total_items,
            chunk_size,
            has_more,
            continuation_token: has_more
                .then(|| ContinuationToken::at(next_offset).to_string()),
        }
    }
}

/// How a sample was drawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMethod {
    FirstN,
    LastN,
    Random,
    /// Head, middle and tail regions of a sequence.
    Representative,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SamplingInfo {
    pub method: SamplingMethod,
    pub sample_size: usize,
    pub total_size: usize,
}

/// Structured record of what happened to a response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResponseMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_size: Option<OriginalSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_applied: Option<AppliedStrategy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub omitted_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling: Option<SamplingInfo>,
}

impl ResponseMetadata {
    pub fn is_empty(&self) -> bool {
        self.original_size.is_none()
            && self.pagination.is_none()
            && self.strategy_applied.is_none()
            && self.omitted_fields.is_empty()
            && self.sampling.is_none()
    }
}

/// The envelope a (possibly reduced) tool result is returned in.
///
/// `data` keeps the input's shape family where possible. After truncation it
/// may be a plain string instead; callers must not assume the original type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkedResponse {
    pub summary: String,
    pub data: Value,
    pub metadata: ResponseMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ChunkedResponse {
    /// A response with empty metadata and no warnings.
    pub fn new(summary: impl Into<String>, data: Value) -> Self {
        Self {
            summary: summary.into(),
            data,
            metadata: ResponseMetadata::default(),
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Render the envelope as tool-result text.
    ///
    /// Layout: summary, one `warning:` line per warning, a blank line, the
    /// pretty-printed data, then a `metadata:` block if requested.
    pub fn render(&self, include_metadata: bool) -> String {
        let mut out = String::with_capacity(self.summary.len() + 64);
        out.push_str(&self.summary);
        out.push('\n');
        for warning in &self.warnings {
            out.push_str("warning: ");
            out.push_str(warning);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&pretty(&self.data));

        if include_metadata && !self.metadata.is_empty() {
            out.push_str("\n\nmetadata:\n");
            let metadata = serde_json::to_value(&self.metadata).unwrap_or(Value::Null);
            out.push_str(&pretty(&metadata));
        }
        out
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Opaque resume point of a paginated response, encoded as `offset:<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContinuationToken {
    pub offset: usize,
}

impl ContinuationToken {
    pub fn at(offset: usize) -> Self {
        Self { offset }
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset:{}", self.offset)
    }
}

/// Error returned when a continuation token cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid continuation token '{0}': expected 'offset:<n>'")]
pub struct InvalidContinuationToken(pub String);

impl FromStr for ContinuationToken {
    type Err = InvalidContinuationToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_prefix("offset:")
            .and_then(|n| n.parse::<usize>().ok())
            .map(Self::at)
            .ok_or_else(|| InvalidContinuationToken(s.to_string()))
    }
}

/// Final outcome of the orchestrator for one value.
///
/// Internal to the tool layer; only `response` is meant for the wire.
#[derive(Debug, Clone)]
pub struct ChunkingResult {
    pub response: ChunkedResponse,
    pub strategy: AppliedStrategy,
    pub processing_time: std::time::Duration,
}
