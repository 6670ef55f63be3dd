//! Tool execution results.
//!
//! Tool handlers build an [`ExecutionResult`] from their raw output; the
//! [`ResponseGuard`](crate::ResponseGuard) replaces oversized JSON content
//! with reduced text before it is returned as a [`CallToolResponse`].

use crate::protocol::{CallToolResponse, ToolContent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,
    /// The result content.
    pub content: Vec<ToolContent>,
    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Create a successful result with raw JSON content.
    pub fn success_json(value: Value) -> Self {
        Self {
            success: true,
            content: vec![ToolContent::Json { json: value }],
            error: None,
        }
    }

    /// Create a successful result with text content.
    pub fn success_text(text: impl Into<String>) -> Self {
        Self {
            success: true,
            content: vec![ToolContent::text(text)],
            error: None,
        }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            success: false,
            content: vec![ToolContent::Text { text: msg.clone() }],
            error: Some(msg),
        }
    }

    /// Concatenated text of all text blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ToolContent::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<ExecutionResult> for CallToolResponse {
    fn from(result: ExecutionResult) -> Self {
        CallToolResponse {
            content: result.content,
            is_error: (!result.success).then_some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_results_omit_the_error_flag() {
        let response = CallToolResponse::from(ExecutionResult::success_text("ok"));
        assert_eq!(response.is_error, None);
        assert_eq!(response.content, vec![ToolContent::text("ok")]);
    }

    #[test]
    fn errors_carry_their_message_as_text() {
        let result = ExecutionResult::error("relation \"orders\" does not exist");
        assert_eq!(result.text(), "relation \"orders\" does not exist");

        let response = CallToolResponse::from(result);
        assert_eq!(response.is_error, Some(true));
    }
}
