use super::{StrategyExecutor, mismatch};
use crate::error::ChunkingError;
use crate::shape::Shape;
use regex::Regex;
use serde_json::{Map, Value};
use sluice_core::{
    ChunkedResponse, ChunkingConfig, PaginationState, SamplingInfo, SamplingMethod,
    SummaryStrategy,
};
use std::sync::LazyLock;

/// Property names that carry identity, state or timestamps.
static IMPORTANT_KEYS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)^(id|name|title|type|status)$").expect("valid regex"),
        Regex::new(r"(?i)^(created|updated|modified).*at$").expect("valid regex"),
        Regex::new(r"(?i)^(is|has|can)_").expect("valid regex"),
    ]
});

const IMPORTANT_KEY_BONUS: i64 = 50;

/// Keeps a representative subset of an array or the most telling properties
/// of an object.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler;

impl Sampler {
    /// Items kept from an oversized array: 60% of the cap.
    pub fn array_target(config: &ChunkingConfig) -> usize {
        config.max_array_items * 6 / 10
    }

    /// Properties kept from an oversized object: 80% of the cap.
    pub fn object_target(config: &ChunkingConfig) -> usize {
        config.max_object_properties * 8 / 10
    }

    fn sample_array(items: &[Value], config: &ChunkingConfig) -> ChunkedResponse {
        let total = items.len();
        let target = Self::array_target(config);
        if total <= target {
            return ChunkedResponse::new(
                format!("All {} items fit within the sample size", total),
                Value::Array(items.to_vec()),
            );
        }
        if target == 0 {
            return Self::empty_sample(total);
        }

        let regions = Regions::new(total, target);
        let sample: Vec<Value> = regions.indices().map(|i| items[i].clone()).collect();
        let sample_size = sample.len();

        let mut response = ChunkedResponse::new(
            format!(
                "Sampled {} of {} items from the head, middle and tail",
                sample_size, total
            ),
            Value::Array(sample),
        )
        .with_warning(format!(
            "Sampled {} of {} items: first {}, {} from the middle, last {}",
            sample_size,
            total,
            regions.head,
            regions.middle.len(),
            regions.tail
        ));
        response.metadata.sampling = Some(SamplingInfo {
            method: SamplingMethod::Representative,
            sample_size,
            total_size: total,
        });
        // Resuming after the head region is the only contiguous continuation.
        response.metadata.pagination = Some(PaginationState::at(total, regions.head, sample_size));
        response
    }

    /// A cap too small to keep any item still discloses what was withheld.
    fn empty_sample(total: usize) -> ChunkedResponse {
        let mut response = ChunkedResponse::new(
            format!("Sampled 0 of {} items", total),
            Value::Array(Vec::new()),
        )
        .with_warning(format!(
            "The array item cap leaves no room for a sample; all {} items were withheld",
            total
        ));
        response.metadata.sampling = Some(SamplingInfo {
            method: SamplingMethod::Representative,
            sample_size: 0,
            total_size: total,
        });
        response.metadata.pagination = Some(PaginationState::at(total, 0, 0));
        response
    }

    fn sample_object(map: &Map<String, Value>, config: &ChunkingConfig) -> ChunkedResponse {
        let total = map.len();
        let target = Self::object_target(config).max(1);
        if total <= target {
            return ChunkedResponse::new(
                format!("All {} properties fit within the sample size", total),
                Value::Object(map.clone()),
            );
        }

        let mut ranked: Vec<(&String, &Value)> = map.iter().collect();
        ranked.sort_by_key(|(key, _)| std::cmp::Reverse(importance(key)));

        let kept: Map<String, Value> = ranked[..target]
            .iter()
            .map(|(k, v)| ((*k).clone(), (*v).clone()))
            .collect();
        let omitted: Vec<String> = map
            .keys()
            .filter(|k| !kept.contains_key(k.as_str()))
            .cloned()
            .collect();

        let mut response = ChunkedResponse::new(
            format!("Kept {} of {} properties ranked by importance", target, total),
            Value::Object(kept),
        )
        .with_warning(format!(
            "Omitted {} properties; see metadata.omitted_fields",
            omitted.len()
        ));
        response.metadata.omitted_fields = omitted;
        response.metadata.sampling = Some(SamplingInfo {
            method: SamplingMethod::Representative,
            sample_size: target,
            total_size: total,
        });
        response
    }
}

impl StrategyExecutor for Sampler {
    fn strategy(&self) -> SummaryStrategy {
        SummaryStrategy::Sample
    }

    fn execute(
        &self,
        shape: Shape<'_>,
        config: &ChunkingConfig,
    ) -> Result<ChunkedResponse, ChunkingError> {
        match shape {
            Shape::Array(items) => Ok(Self::sample_array(items, config)),
            Shape::Object(map) => Ok(Self::sample_object(map, config)),
            other => Err(mismatch(self.strategy(), other)),
        }
    }
}

/// Shorter names rank higher; identity/state/timestamp names get a bonus.
fn importance(key: &str) -> i64 {
    let mut score = 100 - key.chars().count() as i64;
    if IMPORTANT_KEYS.iter().any(|re| re.is_match(key)) {
        score += IMPORTANT_KEY_BONUS;
    }
    score
}

/// Head, middle and tail regions of a representative sample.
#[derive(Debug, PartialEq, Eq)]
struct Regions {
    len: usize,
    head: usize,
    middle: std::ops::Range<usize>,
    tail: usize,
}

impl Regions {
    /// Split a `target`-sized sample of `len > target` items 40/30/30.
    fn new(len: usize, target: usize) -> Self {
        let mut head = target * 4 / 10;
        let mut tail = target * 3 / 10;
        if head == 0 {
            head = 1;
        }
        if tail == 0 && target >= 2 {
            tail = 1;
        }
        let middle_len = (target * 3 / 10).min(target.saturating_sub(head + tail));

        // Centered on the midpoint, clamped between head and tail.
        let start = (len / 2).saturating_sub(middle_len / 2).max(head);
        let end = (start + middle_len).min(len - tail);
        let start = start.min(end);

        Self {
            len,
            head,
            middle: start..end,
            tail,
        }
    }

    fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.head)
            .chain(self.middle.clone())
            .chain(self.len - self.tail..self.len)
    }
}
