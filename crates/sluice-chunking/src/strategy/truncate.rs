use super::StrategyExecutor;
use crate::error::ChunkingError;
use crate::shape::Shape;
use serde_json::Value;
use sluice_core::{ChunkedResponse, ChunkingConfig, SummaryStrategy};

/// Suffix appended to a cut that could not be re-parsed.
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// Last-resort cut of the serialized form.
///
/// When the cut cannot be re-parsed, `data` becomes the raw cut string with
/// [`TRUNCATION_MARKER`] appended, so the output type may differ from the
/// input type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Truncator;

impl Truncator {
    /// Characters of JSON kept: 80% of the configured maximum.
    pub fn budget(config: &ChunkingConfig) -> usize {
        config.max_characters * 8 / 10
    }

    /// Truncate `shape`. Never fails.
    pub fn truncate(shape: Shape<'_>, config: &ChunkingConfig) -> ChunkedResponse {
        match shape.to_json() {
            Ok(json) => Self::truncate_json(shape, &json, config),
            Err(err) => unserializable(&err),
        }
    }

    fn truncate_json(shape: Shape<'_>, json: &str, config: &ChunkingConfig) -> ChunkedResponse {
        let budget = Self::budget(config);
        let length = json.chars().count();
        if length <= budget {
            return ChunkedResponse::new(
                format!("Response fits within {} characters", budget),
                shape.to_value(),
            );
        }

        let cut: String = json.chars().take(budget).collect();
        let data = reparse(&cut)
            .unwrap_or_else(|| Value::String(format!("{}{}", cut, TRUNCATION_MARKER)));

        ChunkedResponse::new(
            format!("Response truncated from {} to {} characters", length, budget),
            data,
        )
        .with_warning(format!(
            "Output was cut at {} of {} characters; data may be incomplete or unstructured",
            budget, length
        ))
    }
}

impl StrategyExecutor for Truncator {
    fn strategy(&self) -> SummaryStrategy {
        SummaryStrategy::Truncate
    }

    fn execute(
        &self,
        shape: Shape<'_>,
        config: &ChunkingConfig,
    ) -> Result<ChunkedResponse, ChunkingError> {
        Ok(Self::truncate(shape, config))
    }
}

/// Response for a value whose serialization failed.
pub(crate) fn unserializable(err: &serde_json::Error) -> ChunkedResponse {
    ChunkedResponse::new(
        "Response could not be serialized and was truncated",
        Value::String(format!("[unserializable response: {}]{}", err, TRUNCATION_MARKER)),
    )
    .with_warning(format!("Serialization failed: {}", err))
}

/// Parse a cut that landed inside a string literal, after closing it.
///
/// Cuts outside a string are not re-parsed: a shortened number would parse
/// into a different, valid value.
fn reparse(cut: &str) -> Option<Value> {
    let (in_string, dangling_escape) = string_state(cut);
    if !in_string {
        return None;
    }
    let mut candidate = cut.to_string();
    if dangling_escape {
        candidate.pop();
    }
    candidate.push('"');
    serde_json::from_str(&candidate).ok()
}

/// Whether `json` ends inside a string literal, and on an unfinished escape.
fn string_state(json: &str) -> (bool, bool) {
    let mut in_string = false;
    let mut escaped = false;
    for c in json.chars() {
        if escaped {
            escaped = false;
        } else if in_string && c == '\\' {
            escaped = true;
        } else if c == '"' {
            in_string = !in_string;
        }
    }
    (in_string, escaped)
}
