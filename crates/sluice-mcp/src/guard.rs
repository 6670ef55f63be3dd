//! Size governance at the tool boundary.
//!
//! Every tool result passes through a [`ResponseGuard`] before it is
//! returned to the agent. The guard looks up the tool's [`Surface`] and
//! either runs the chunking orchestrator and renders its envelope, or hands
//! the value to the simple limiter.

use crate::error::McpError;
use crate::executor::ExecutionResult;
use crate::protocol::{CallToolResponse, ToolContent};
use serde::Serialize;
use serde_json::Value;
use sluice_chunking::{Orchestrator, limit};
use sluice_core::{SluiceConfig, Surface};
use std::path::Path;

/// Reduces tool output according to a [`SluiceConfig`].
///
/// Holds no mutable state; one guard can serve any number of concurrent
/// tool calls.
#[derive(Debug, Clone)]
pub struct ResponseGuard {
    config: SluiceConfig,
    orchestrator: Orchestrator,
}

impl ResponseGuard {
    pub fn new(config: SluiceConfig) -> Self {
        let orchestrator = Orchestrator::new(config.chunking.clone());
        Self {
            config,
            orchestrator,
        }
    }

    /// Build a guard from a `sluice.yaml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, McpError> {
        Ok(Self::new(SluiceConfig::from_file(path)?))
    }

    pub fn config(&self) -> &SluiceConfig {
        &self.config
    }

    /// Reduce the raw output of `tool_name` and wrap it as a text result.
    pub fn finish(&self, tool_name: &str, value: Value) -> ExecutionResult {
        ExecutionResult::success_text(self.reduce(tool_name, value))
    }

    /// Like [`finish`](Self::finish) for any serializable output.
    ///
    /// Output that cannot be serialized is reported through the orchestrator
    /// as a truncated response, whatever the tool's surface.
    pub fn finish_serialize<T: Serialize + ?Sized>(
        &self,
        tool_name: &str,
        value: &T,
    ) -> ExecutionResult {
        match serde_json::to_value(value) {
            Ok(value) => self.finish(tool_name, value),
            Err(err) => {
                tracing::warn!(tool = tool_name, error = %err, "Tool output is not serializable");
                let result = self.orchestrator.process_serialize(value);
                ExecutionResult::success_text(
                    result.response.render(self.config.chunking.include_metadata),
                )
            }
        }
    }

    /// Reduce every JSON block of a successful result.
    ///
    /// Text blocks and failed results pass through unchanged.
    pub fn apply(&self, tool_name: &str, result: ExecutionResult) -> ExecutionResult {
        if !result.success {
            return result;
        }
        let content = result
            .content
            .into_iter()
            .map(|block| match block {
                ToolContent::Json { json } => ToolContent::text(self.reduce(tool_name, json)),
                text => text,
            })
            .collect();
        ExecutionResult { content, ..result }
    }

    /// [`apply`](Self::apply) and convert to the wire response.
    pub fn respond(&self, tool_name: &str, result: ExecutionResult) -> CallToolResponse {
        self.apply(tool_name, result).into()
    }

    fn reduce(&self, tool_name: &str, value: Value) -> String {
        match self.config.surface_for(tool_name) {
            Surface::General => {
                let result = self.orchestrator.process(value);
                tracing::debug!(
                    tool = tool_name,
                    strategy = %result.strategy,
                    elapsed_us = result.processing_time.as_micros() as u64,
                    "Guarded tool result"
                );
                result
                    .response
                    .render(self.config.chunking.include_metadata)
            }
            Surface::TokenConstrained => {
                tracing::debug!(
                    tool = tool_name,
                    max_tokens = self.config.limiter.max_tokens,
                    "Limiting tool result"
                );
                limit(&value, tool_name, &self.config.limiter)
            }
        }
    }
}

impl Default for ResponseGuard {
    fn default() -> Self {
        Self::new(SluiceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sluice_core::{ChunkingConfig, LimitConfig};
    use std::collections::BTreeMap;
    use std::io::Write;

    fn rows(n: usize) -> Value {
        Value::Array((0..n).map(|i| json!({ "id": i, "sku": format!("SKU-{:05}", i) })).collect())
    }

    fn guard() -> ResponseGuard {
        let config = SluiceConfig {
            chunking: ChunkingConfig::conservative(),
            limiter: LimitConfig::new(500),
            ..SluiceConfig::default()
        }
        .with_surface("execute_sql", Surface::TokenConstrained);
        ResponseGuard::new(config)
    }

    #[test]
    fn general_tools_get_the_rendered_envelope() {
        let result = guard().finish("list_products", rows(100));

        assert!(result.success);
        let text = result.text();
        assert!(text.starts_with("Showing first 16 of 100 items"));
        assert!(text.contains("warning: Only 16 of 100 items are shown"));
        assert!(text.contains("\n\nmetadata:\n"));
        assert!(text.contains("\"continuation_token\": \"offset:16\""));
    }

    #[test]
    fn small_results_are_rendered_complete() {
        let result = guard().finish("get_product", json!({ "id": 7, "sku": "SKU-00007" }));
        let text = result.text();
        assert!(text.starts_with("Complete response"));
        assert!(text.contains("\"sku\": \"SKU-00007\""));
    }

    #[test]
    fn token_constrained_tools_use_the_limiter() {
        let result = guard().finish("execute_sql", rows(100));
        let text = result.text();

        assert!(text.starts_with("execute_sql (showing "));
        assert!(!text.contains("metadata:"));
    }

    #[test]
    fn json_blocks_are_reduced_and_text_passes_through() {
        let result = ExecutionResult {
            success: true,
            content: vec![
                ToolContent::text("query ok"),
                ToolContent::Json { json: rows(100) },
            ],
            error: None,
        };

        let response = guard().respond("list_products", result);
        assert_eq!(response.is_error, None);
        assert_eq!(response.content[0], ToolContent::text("query ok"));
        assert!(
            response.content[1]
                .as_text()
                .unwrap()
                .starts_with("Showing first 16 of 100 items")
        );
    }

    #[test]
    fn failed_results_pass_through_unchanged() {
        let failed = ExecutionResult::error("permission denied for table orders");
        let guarded = guard().apply("list_orders", failed.clone());
        assert_eq!(guarded, failed);

        let response = CallToolResponse::from(guarded);
        assert_eq!(response.is_error, Some(true));
    }

    #[test]
    fn unserializable_output_is_reported_as_truncated() {
        let mut output = BTreeMap::new();
        output.insert(vec![1, 2], "non-string key");

        let result = guard().finish_serialize("execute_sql", &output);
        assert!(result.success);
        assert!(result.text().contains("[unserializable response"));
    }

    #[test]
    fn guard_loads_from_a_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "chunking:\n  preset: database_results\nsurfaces:\n  execute_sql: token_constrained"
        )
        .unwrap();

        let guard = ResponseGuard::from_file(file.path()).unwrap();
        assert_eq!(guard.config().chunking.max_array_items, 40);
        assert_eq!(
            guard.config().surface_for("execute_sql"),
            Surface::TokenConstrained
        );
    }

    #[test]
    fn invalid_config_files_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limiter:\n  max_tokens: 0").unwrap();

        let err = ResponseGuard::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }
}
