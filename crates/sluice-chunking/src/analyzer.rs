//! Response analysis.
//!
//! Measures a value once (one serialization pass plus one structural walk)
//! and recommends whether and how to reduce it. Analysis never fails: if the
//! value cannot be serialized, a degraded verdict built from a rough size
//! estimate is returned instead.

use crate::error::ChunkingError;
use crate::estimate::estimate_tokens;
use crate::shape::{Shape, is_complex};
use serde_json::Value;
use sluice_core::{ChunkingConfig, ResponseAnalysis, ResponseType, SummaryStrategy};

/// Share of complex-valued properties above which an object counts as mixed.
const MIXED_THRESHOLD: f64 = 0.3;

/// Depth beyond which nested containers make a value chunk-worthy.
const MAX_PLAIN_DEPTH: usize = 3;

/// Analyze `value` against `config`.
pub fn analyze(value: &Value, config: &ChunkingConfig) -> ResponseAnalysis {
    analyze_shape(Shape::of(value), config)
}

/// Analyze an already-classified value.
pub fn analyze_shape(shape: Shape<'_>, config: &ChunkingConfig) -> ResponseAnalysis {
    match try_analyze(shape, config) {
        Ok(analysis) => {
            tracing::debug!(
                response_type = ?analysis.response_type,
                characters = analysis.character_count,
                estimated_tokens = analysis.estimated_tokens,
                complexity = analysis.complexity,
                should_chunk = analysis.should_chunk,
                suggested = ?analysis.suggested_strategy,
                "Analyzed response"
            );
            analysis
        }
        Err(err) => {
            tracing::warn!(error = %err, "Response analysis degraded");
            let characters = rough_character_count(shape);
            ResponseAnalysis::degraded(characters, estimate_tokens(characters))
        }
    }
}

fn try_analyze(
    shape: Shape<'_>,
    config: &ChunkingConfig,
) -> Result<ResponseAnalysis, ChunkingError> {
    let character_count = shape.to_json()?.chars().count();
    let structure = Structure::of(shape);

    let (response_type, array_item_count, object_property_count) = match shape {
        Shape::Array(items) => (ResponseType::Array, Some(items.len()), None),
        Shape::Object(map) => {
            let complex = map.values().filter(|v| is_complex(v)).count();
            let mixed = !map.is_empty() && complex as f64 / map.len() as f64 > MIXED_THRESHOLD;
            let response_type = if mixed {
                ResponseType::Mixed
            } else {
                ResponseType::Object
            };
            (response_type, None, Some(map.len()))
        }
        Shape::Primitive(_) => (ResponseType::Primitive, None, None),
    };

    let too_many_items = array_item_count.is_some_and(|n| n > config.max_array_items);
    let too_many_properties =
        object_property_count.is_some_and(|n| n > config.max_object_properties);
    let too_deep = structure.max_depth > MAX_PLAIN_DEPTH
        && (structure.nested_arrays || structure.nested_objects);
    let should_chunk = too_many_items || too_many_properties || too_deep;

    let suggested_strategy = match response_type {
        ResponseType::Array if too_many_items => {
            if config.enable_pagination {
                SummaryStrategy::Paginate
            } else {
                SummaryStrategy::Sample
            }
        }
        ResponseType::Mixed => SummaryStrategy::Summarize,
        ResponseType::Object if too_many_properties => SummaryStrategy::Summarize,
        ResponseType::Array | ResponseType::Object if should_chunk => SummaryStrategy::Sample,
        _ => SummaryStrategy::Truncate,
    };

    Ok(ResponseAnalysis {
        estimated_tokens: estimate_tokens(character_count),
        character_count,
        response_type,
        array_item_count,
        object_property_count,
        max_depth: structure.max_depth,
        complexity: complexity(response_type, &structure, array_item_count, object_property_count),
        suggested_strategy,
        should_chunk,
    })
}

fn complexity(
    response_type: ResponseType,
    structure: &Structure,
    array_items: Option<usize>,
    object_properties: Option<usize>,
) -> f64 {
    let base = match response_type {
        ResponseType::Primitive => 0.1,
        ResponseType::Object => 0.3,
        ResponseType::Array => 0.5,
        ResponseType::Mixed => 1.0,
    };

    let depth = structure.max_depth.max(1) as f64;
    let mut score = base * (1.0 + 0.2 * (depth - 1.0));

    if array_items.is_some_and(|n| n > 100) {
        score *= 1.3;
    }
    if object_properties.is_some_and(|n| n > 20) {
        score *= 1.2;
    }
    score *= match (structure.nested_arrays, structure.nested_objects) {
        (true, true) => 1.4,
        (true, false) | (false, true) => 1.2,
        (false, false) => 1.0,
    };

    score.clamp(0.0, 1.0)
}

/// Nesting facts gathered in one walk.
#[derive(Debug, Default)]
struct Structure {
    max_depth: usize,
    /// An array appears below the root.
    nested_arrays: bool,
    /// An object appears below the root.
    nested_objects: bool,
}

impl Structure {
    fn of(shape: Shape<'_>) -> Self {
        let mut structure = Structure::default();
        match shape {
            Shape::Array(items) => {
                structure.max_depth = 1;
                items.iter().for_each(|v| structure.visit(v, 1));
            }
            Shape::Object(map) => {
                structure.max_depth = 1;
                map.values().for_each(|v| structure.visit(v, 1));
            }
            Shape::Primitive(_) => {}
        }
        structure
    }

    /// Visit a value whose parent container sits at `parent_depth`.
    fn visit(&mut self, value: &Value, parent_depth: usize) {
        let depth = parent_depth + 1;
        match value {
            Value::Array(items) => {
                self.nested_arrays = true;
                self.max_depth = self.max_depth.max(depth);
                items.iter().for_each(|v| self.visit(v, depth));
            }
            Value::Object(map) => {
                self.nested_objects = true;
                self.max_depth = self.max_depth.max(depth);
                map.values().for_each(|v| self.visit(v, depth));
            }
            _ => {}
        }
    }
}

/// Best-effort size used when serialization fails.
fn rough_character_count(shape: Shape<'_>) -> usize {
    fn sequence(sizes: impl Iterator<Item = usize>) -> usize {
        let (count, total) = sizes.fold((0usize, 0usize), |(count, total), size| {
            (count + 1, total + size)
        });
        2 + total + count.saturating_sub(1)
    }

    fn size(value: &Value) -> usize {
        match value {
            Value::Null => 4,
            Value::Bool(true) => 4,
            Value::Bool(false) => 5,
            Value::Number(n) => n.to_string().len(),
            Value::String(s) => s.chars().count() + 2,
            Value::Array(items) => sequence(items.iter().map(size)),
            Value::Object(map) => {
                sequence(map.iter().map(|(k, v)| k.chars().count() + 3 + size(v)))
            }
        }
    }

    match shape {
        Shape::Array(items) => sequence(items.iter().map(size)),
        Shape::Object(map) => sequence(map.iter().map(|(k, v)| k.chars().count() + 3 + size(v))),
        Shape::Primitive(value) => size(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: usize) -> Value {
        Value::Array(
            (0..n)
                .map(|i| json!({ "id": i, "name": format!("row {}", i) }))
                .collect(),
        )
    }

    #[test]
    fn small_array_is_left_alone() {
        let config = ChunkingConfig::standard();
        let analysis = analyze(&rows(50), &config);

        assert_eq!(analysis.response_type, ResponseType::Array);
        assert_eq!(analysis.array_item_count, Some(50));
        assert_eq!(analysis.max_depth, 2);
        assert!(!analysis.should_chunk);
    }

    #[test]
    fn oversized_array_prefers_pagination_when_enabled() {
        let config = ChunkingConfig::standard();
        let analysis = analyze(&rows(51), &config);
        assert!(analysis.should_chunk);
        assert_eq!(analysis.suggested_strategy, SummaryStrategy::Paginate);

        let analysis = analyze(&rows(51), &config.with_pagination(false));
        assert_eq!(analysis.suggested_strategy, SummaryStrategy::Sample);
    }

    #[test]
    fn character_count_and_tokens_come_from_compact_json() {
        let value = json!({ "a": "bcdefg" });
        let analysis = analyze(&value, &ChunkingConfig::standard());
        assert_eq!(analysis.character_count, r#"{"a":"bcdefg"}"#.len());
        assert_eq!(analysis.estimated_tokens, 4);
    }

    #[test]
    fn objects_with_mostly_complex_values_are_mixed() {
        let config = ChunkingConfig::standard();

        let record = json!({ "id": 1, "name": "a", "kind": "b", "tags": ["x"] });
        assert_eq!(analyze(&record, &config).response_type, ResponseType::Object);

        let tree = json!({ "id": 1, "tables": [], "views": {} });
        let analysis = analyze(&tree, &config);
        assert_eq!(analysis.response_type, ResponseType::Mixed);
        assert_eq!(analysis.suggested_strategy, SummaryStrategy::Summarize);
        assert!(!analysis.should_chunk);
    }

    #[test]
    fn wide_object_is_summarized() {
        let mut map = serde_json::Map::new();
        for i in 0..30 {
            map.insert(format!("column_{}", i), json!(i));
        }
        let analysis = analyze(&Value::Object(map), &ChunkingConfig::standard());

        assert_eq!(analysis.object_property_count, Some(30));
        assert!(analysis.should_chunk);
        assert_eq!(analysis.suggested_strategy, SummaryStrategy::Summarize);
    }

    #[test]
    fn deep_nesting_alone_triggers_chunking() {
        let value = json!([{ "schema": { "tables": [{ "name": "t" }] } }]);
        let analysis = analyze(&value, &ChunkingConfig::standard());

        assert_eq!(analysis.max_depth, 5);
        assert!(analysis.should_chunk);
        assert_eq!(analysis.suggested_strategy, SummaryStrategy::Sample);
    }

    #[test]
    fn primitives_are_never_chunked() {
        let text = Value::String("x".repeat(100_000));
        let analysis = analyze(&text, &ChunkingConfig::conservative());

        assert_eq!(analysis.response_type, ResponseType::Primitive);
        assert_eq!(analysis.max_depth, 0);
        assert!(!analysis.should_chunk);
        assert_eq!(analysis.suggested_strategy, SummaryStrategy::Truncate);
        assert!((analysis.complexity - 0.5 * 1.2 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn complexity_is_clamped() {
        let value = json!({
            "a": [{ "b": [{ "c": [1] }] }],
            "d": { "e": { "f": {} } }
        });
        let analysis = analyze(&value, &ChunkingConfig::standard());
        assert_eq!(analysis.response_type, ResponseType::Mixed);
        assert!((analysis.complexity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flat_object_complexity_matches_base_weight() {
        let value = json!({ "id": 1, "name": "a" });
        let analysis = analyze(&value, &ChunkingConfig::standard());
        assert!((analysis.complexity - 0.3).abs() < 1e-9);
    }

    fn complexity_of(value: &Value) -> f64 {
        analyze(value, &ChunkingConfig::permissive()).complexity
    }

    #[test]
    fn large_array_of_records_compounds_every_factor() {
        // base 0.5, depth 2, more than 100 items, nested objects
        let expected = 0.5 * 1.2 * 1.3 * 1.2;
        assert!((complexity_of(&rows(101)) - expected).abs() < 1e-9);
        assert!((complexity_of(&rows(100)) - 0.5 * 1.2 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn wide_object_gets_the_property_factor() {
        let map: serde_json::Map<String, Value> =
            (0..21).map(|i| (format!("field_{}", i), json!(i))).collect();
        assert!((complexity_of(&Value::Object(map)) - 0.3 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn depth_scales_complexity() {
        // arrays only: base 0.5 and the single-kind nesting factor
        assert!((complexity_of(&json!([[1]])) - 0.5 * 1.2 * 1.2).abs() < 1e-9);
        assert!((complexity_of(&json!([[[1]]])) - 0.5 * 1.4 * 1.2).abs() < 1e-9);
        assert!((complexity_of(&json!([[[[1]]]])) - 0.5 * 1.6 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn nesting_both_kinds_weighs_more_than_one() {
        let arrays_only = complexity_of(&json!([[1], [2]]));
        let both = complexity_of(&json!([[1], { "a": 2 }]));

        assert!((arrays_only - 0.5 * 1.2 * 1.2).abs() < 1e-9);
        assert!((both - 0.5 * 1.2 * 1.4).abs() < 1e-9);
    }

    #[test]
    fn flat_array_has_the_array_base_weight() {
        assert!((complexity_of(&json!([1, 2, 3])) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rough_count_matches_serialization_for_plain_values() {
        let value = json!({ "id": 12, "ok": true, "tags": ["a", null] });
        let exact = serde_json::to_string(&value).unwrap().len();
        assert_eq!(rough_character_count(Shape::of(&value)), exact);
    }
}
