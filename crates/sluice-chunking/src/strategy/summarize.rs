use super::{StrategyExecutor, mismatch};
use crate::error::ChunkingError;
use crate::shape::{Shape, is_complex, type_label};
use serde_json::{Map, Value, json};
use sluice_core::{
    ChunkedResponse, ChunkingConfig, SamplingInfo, SamplingMethod, SummaryStrategy,
};

/// Literal items or properties kept alongside the statistics.
const SAMPLE_SIZE: usize = 5;

/// Replaces bulk data with aggregate statistics and a small literal sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct Summarizer;

impl Summarizer {
    fn summarize_array(items: &[Value]) -> Result<ChunkedResponse, ChunkingError> {
        let total = items.len();
        let sample_len = total.min(SAMPLE_SIZE);

        let mut sizes = Vec::with_capacity(total);
        for item in items {
            sizes.push(serde_json::to_string(item)?.chars().count());
        }
        let (min, max, avg) = match (sizes.iter().min(), sizes.iter().max()) {
            (Some(&min), Some(&max)) => {
                let sum: usize = sizes.iter().sum();
                (min, max, (sum as f64 / total as f64).round() as usize)
            }
            _ => (0, 0, 0),
        };

        let data = json!({
            "type": "array_summary",
            "total_items": total,
            "item_types": histogram(items.iter()),
            "size_distribution": { "min": min, "max": max, "avg": avg },
            "sample": &items[..sample_len],
        });

        let mut response = ChunkedResponse::new(
            format!(
                "Summarized {} items into statistics; first {} shown as a sample",
                total, sample_len
            ),
            data,
        )
        .with_warning("Original array replaced by summary statistics");
        response.metadata.sampling = Some(SamplingInfo {
            method: SamplingMethod::FirstN,
            sample_size: sample_len,
            total_size: total,
        });
        Ok(response)
    }

    fn summarize_object(map: &Map<String, Value>) -> ChunkedResponse {
        let total = map.len();
        let complex = map.values().filter(|v| is_complex(v)).count();
        let sample: Map<String, Value> = map
            .iter()
            .take(SAMPLE_SIZE)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let omitted: Vec<String> = map.keys().skip(SAMPLE_SIZE).cloned().collect();

        let data = json!({
            "type": "object_summary",
            "property_count": total,
            "property_types": histogram(map.values()),
            "sample": sample,
            "structure": format!("{} total properties, {} complex objects/arrays", total, complex),
        });

        let mut response = ChunkedResponse::new(
            format!(
                "Summarized object with {} properties ({} complex)",
                total, complex
            ),
            data,
        )
        .with_warning("Original object replaced by summary statistics");
        response.metadata.sampling = Some(SamplingInfo {
            method: SamplingMethod::FirstN,
            sample_size: total.min(SAMPLE_SIZE),
            total_size: total,
        });
        response.metadata.omitted_fields = omitted;
        response
    }
}

impl StrategyExecutor for Summarizer {
    fn strategy(&self) -> SummaryStrategy {
        SummaryStrategy::Summarize
    }

    fn execute(
        &self,
        shape: Shape<'_>,
        _config: &ChunkingConfig,
    ) -> Result<ChunkedResponse, ChunkingError> {
        match shape {
            Shape::Array(items) => Self::summarize_array(items),
            Shape::Object(map) => Ok(Self::summarize_object(map)),
            other => Err(mismatch(self.strategy(), other)),
        }
    }
}

/// Count of values per JSON type label, in first-seen order.
fn histogram<'a>(values: impl Iterator<Item = &'a Value>) -> Map<String, Value> {
    let mut counts: Map<String, Value> = Map::new();
    for value in values {
        let label = type_label(value);
        let next = counts.get(label).and_then(Value::as_u64).unwrap_or(0) + 1;
        counts.insert(label.to_string(), json!(next));
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_summary_reports_types_sizes_and_sample() {
        let items = vec![
            json!(1),
            json!("ab"),
            json!(null),
            json!([1, 2]),
            json!(22),
            json!({}),
            json!(3),
        ];
        let response = Summarizer
            .execute(Shape::Array(&items), &ChunkingConfig::standard())
            .unwrap();

        let data = &response.data;
        assert_eq!(data["type"], "array_summary");
        assert_eq!(data["total_items"], 7);
        assert_eq!(
            data["item_types"],
            json!({ "number": 3, "string": 1, "null": 1, "array": 1, "object": 1 })
        );
        // sizes: 1, 4, 4, 5, 2, 2, 1
        assert_eq!(data["size_distribution"], json!({ "min": 1, "max": 5, "avg": 3 }));
        assert_eq!(data["sample"].as_array().unwrap().len(), 5);
        assert_eq!(response.metadata.sampling.unwrap().method, SamplingMethod::FirstN);
        assert!(response.summary.contains("Summarized"));
    }

    #[test]
    fn empty_array_summary_has_zero_sizes() {
        let items: Vec<Value> = Vec::new();
        let response = Summarizer
            .execute(Shape::Array(&items), &ChunkingConfig::standard())
            .unwrap();
        assert_eq!(response.data["size_distribution"], json!({ "min": 0, "max": 0, "avg": 0 }));
        assert_eq!(response.data["sample"], json!([]));
    }

    #[test]
    fn object_summary_describes_structure() {
        let value = json!({
            "a": 1, "b": "two", "c": [3], "d": { "e": 4 }, "f": true, "g": null, "h": 8
        });
        let response = Summarizer
            .execute(Shape::of(&value), &ChunkingConfig::standard())
            .unwrap();

        let data = &response.data;
        assert_eq!(data["type"], "object_summary");
        assert_eq!(data["property_count"], 7);
        assert_eq!(data["structure"], "7 total properties, 2 complex objects/arrays");
        assert_eq!(data["sample"].as_object().unwrap().len(), 5);
        assert_eq!(data["property_types"]["number"], 2);
        assert_eq!(response.metadata.omitted_fields, vec!["g", "h"]);
    }
}
