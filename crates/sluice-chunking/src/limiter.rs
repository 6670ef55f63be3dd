//! Simple limiter.
//!
//! A blunter path than the orchestrator for surfaces with a hard token
//! ceiling: the value is shrunk until its rendering fits and returned as a
//! finished string with a short header.
//!
//! Input must be acyclic. An owned [`serde_json::Value`] always is.

use crate::estimate::limiter_tokens;
use serde_json::{Map, Value};
use sluice_core::LimitConfig;

/// Each shrinking round keeps this share of the items.
const SHRINK_FACTOR: f64 = 0.7;

/// Strings longer than this are cut when a single value must be reduced.
const MAX_STRING_CHARS: usize = 200;

/// Nested arrays keep at most this many items when a single value must be reduced.
const NESTED_ARRAY_ITEMS: usize = 5;

/// Shrink `value` to fit `config.max_tokens` and render it.
///
/// Always terminates and always returns a non-empty string.
pub fn limit(value: &Value, context_label: &str, config: &LimitConfig) -> String {
    let before = limiter_tokens(&pretty(value));
    let limited = match value {
        Value::Array(items) => limit_array(items, config.max_tokens, config.max_array_items),
        other => limit_single(other, config.max_tokens),
    };
    let after = limiter_tokens(&limited.body);

    if after < before {
        tracing::info!(
            label = context_label,
            tokens_before = before,
            tokens_after = after,
            max_tokens = config.max_tokens,
            shown = ?limited.shown,
            "Limited response"
        );
    }

    if !config.include_warning {
        return limited.body;
    }

    let disclosure = match limited.shown {
        Some((shown, total)) if shown < total => format!(" (showing {} of {} items)", shown, total),
        _ => String::new(),
    };
    format!(
        "{}{}: estimated tokens {} -> {}\n\n{}",
        context_label, disclosure, before, after, limited.body
    )
}

struct Limited {
    body: String,
    /// Items shown and total items, for arrays.
    shown: Option<(usize, usize)>,
}

fn limit_array(items: &[Value], max_tokens: usize, max_items: usize) -> Limited {
    let total = items.len();
    let mut count = total.min(max_items.max(1));
    let mut body = pretty_slice(&items[..count]);
    let mut rounds = 0;

    while limiter_tokens(&body) > max_tokens && count > 1 {
        // Always drop at least one item so the loop ends.
        count = ((count as f64 * SHRINK_FACTOR) as usize).clamp(1, count - 1);
        body = pretty_slice(&items[..count]);
        rounds += 1;
    }
    tracing::debug!(total, count, rounds, "Array shrink finished");

    if count == 1 && limiter_tokens(&body) > max_tokens {
        body = pretty(&Value::Array(vec![reduce_value(&items[0], max_tokens)]));
    }

    Limited {
        body,
        shown: Some((count, total)),
    }
}

fn limit_single(value: &Value, max_tokens: usize) -> Limited {
    let body = pretty(value);
    if limiter_tokens(&body) <= max_tokens {
        return Limited { body, shown: None };
    }
    Limited {
        body: pretty(&reduce_value(value, max_tokens)),
        shown: None,
    }
}

/// Structurally shrink one value toward `budget` tokens.
///
/// Long strings are cut, nested arrays capped, and nested objects recursed
/// into with the budget split evenly across their properties. The result may
/// still exceed the budget; there is nothing left to remove once every leaf
/// is short.
pub fn reduce_value(value: &Value, budget: usize) -> Value {
    match value {
        Value::String(s) if s.chars().count() > MAX_STRING_CHARS => {
            let mut cut: String = s.chars().take(MAX_STRING_CHARS).collect();
            cut.push_str("...");
            Value::String(cut)
        }
        Value::Array(items) => {
            let kept = items.len().min(NESTED_ARRAY_ITEMS);
            let share = budget / kept.max(1);
            Value::Array(items[..kept].iter().map(|v| reduce_value(v, share)).collect())
        }
        Value::Object(map) => {
            if limiter_tokens(&pretty(value)) <= budget {
                return value.clone();
            }
            let share = budget / map.len().max(1);
            let reduced: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), reduce_value(v, share)))
                .collect();
            Value::Object(reduced)
        }
        other => other.clone(),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn pretty_slice(items: &[Value]) -> String {
    serde_json::to_string_pretty(items).unwrap_or_else(|_| Value::Array(items.to_vec()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(n: usize, width: usize) -> Value {
        Value::Array(
            (0..n)
                .map(|i| json!({ "id": i, "payload": "p".repeat(width) }))
                .collect(),
        )
    }

    #[test]
    fn small_values_are_rendered_unchanged() {
        let value = json!({ "id": 1, "name": "alpha" });
        let text = limit(&value, "describe", &LimitConfig::default());

        let (header, body) = text.split_once("\n\n").unwrap();
        assert!(header.starts_with("describe: estimated tokens"));
        assert!(!header.contains("showing"));
        assert_eq!(serde_json::from_str::<Value>(body).unwrap(), value);
    }

    #[test]
    fn arrays_are_sliced_to_the_item_cap_first() {
        let value = records(80, 10);
        let text = limit(&value, "rows", &LimitConfig::new(100_000));

        assert!(text.starts_with("rows (showing 50 of 80 items)"));
        let body = text.split_once("\n\n").unwrap().1;
        let parsed: Value = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 50);
    }

    #[test]
    fn arrays_shrink_until_within_budget() {
        let value = records(50, 300);
        let config = LimitConfig::new(1_000).without_warning();
        let text = limit(&value, "rows", &config);

        assert!(limiter_tokens(&text) <= 1_000);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        let shown = parsed.as_array().unwrap().len();
        assert!(shown >= 1 && shown < 50);
        assert_eq!(parsed[0]["id"], 0);
    }

    #[test]
    fn shrink_factor_strictly_decreases_small_counts() {
        // 2 * 0.7 floors to 1; 1 is the floor.
        let value = records(2, 400);
        let text = limit(&value, "rows", &LimitConfig::new(120).without_warning());
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[test]
    fn single_oversized_item_is_reduced_internally() {
        let value = json!([{
            "id": 1,
            "notes": "n".repeat(5_000),
            "tags": (0..100).collect::<Vec<_>>(),
        }]);
        let text = limit(&value, "row", &LimitConfig::new(200).without_warning());
        let parsed: Value = serde_json::from_str(&text).unwrap();

        let item = &parsed[0];
        assert_eq!(item["id"], 1);
        assert_eq!(item["notes"].as_str().unwrap().chars().count(), 203);
        assert!(item["notes"].as_str().unwrap().ends_with("..."));
        assert_eq!(item["tags"], json!([0, 1, 2, 3, 4]));
    }

    #[test]
    fn oversized_objects_are_reduced_per_property() {
        let value = json!({
            "summary": "s".repeat(1_000),
            "nested": { "body": "b".repeat(1_000), "id": 7 },
            "count": 3
        });
        let text = limit(&value, "doc", &LimitConfig::new(50));
        let body = text.split_once("\n\n").unwrap().1;
        let parsed: Value = serde_json::from_str(body).unwrap();

        assert!(parsed["summary"].as_str().unwrap().ends_with("..."));
        assert!(parsed["nested"]["body"].as_str().unwrap().ends_with("..."));
        assert_eq!(parsed["nested"]["id"], 7);
        assert_eq!(parsed["count"], 3);
    }

    #[test]
    fn objects_are_measured_as_rendered() {
        let mut map: Map<String, Value> = (0..100)
            .map(|i| (format!("k{}", i), json!(i % 10)))
            .collect();
        map.insert("notes".to_string(), json!("n".repeat(250)));
        let value = Value::Object(map);

        // Compact JSON fits the budget; the indented rendering does not.
        let compact = limiter_tokens(&value.to_string());
        let rendered = limiter_tokens(&pretty(&value));
        let budget = (compact + rendered) / 2;
        assert!(compact <= budget && budget < rendered);

        let text = limit(&value, "row", &LimitConfig::new(budget).without_warning());
        let parsed: Value = serde_json::from_str(&text).unwrap();
        let notes = parsed["notes"].as_str().unwrap();
        assert!(notes.ends_with("..."));
        assert_eq!(notes.chars().count(), 203);
        assert_eq!(parsed["k42"], 2);
        assert!(limiter_tokens(&text) < rendered);
    }

    #[test]
    fn header_reports_token_reduction() {
        let value = records(500, 300);
        let text = limit(&value, "query_results", &LimitConfig::new(10_000));
        let header = text.lines().next().unwrap();

        assert!(header.starts_with("query_results (showing 50 of 500 items): estimated tokens"));
        let (before, after) = header
            .rsplit_once(": estimated tokens ")
            .unwrap()
            .1
            .split_once(" -> ")
            .unwrap();
        assert!(after.parse::<usize>().unwrap() < before.parse::<usize>().unwrap());
    }

    #[test]
    fn degenerate_budget_terminates_with_output() {
        let text = limit(&records(500, 300), "rows", &LimitConfig::new(1));
        assert!(!text.is_empty());
        assert!(text.contains("(showing 1 of 500 items)"));

        let text = limit(&json!("x".repeat(1_000)), "text", &LimitConfig::new(1));
        assert!(text.contains("..."));

        let text = limit(&json!([]), "empty", &LimitConfig::new(1));
        assert!(text.ends_with("[]"));
    }

    #[test]
    fn short_strings_and_scalars_pass_through_reduction() {
        assert_eq!(reduce_value(&json!("short"), 0), json!("short"));
        assert_eq!(reduce_value(&json!(42), 0), json!(42));
        assert_eq!(reduce_value(&json!(null), 0), json!(null));
    }
}
