//! Simple limiter configuration.

use serde::{Deserialize, Serialize};

/// Hard token ceiling for the token-constrained surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Arrays are sliced to this many items before any measuring.
    #[serde(default = "default_max_array_items")]
    pub max_array_items: usize,

    /// Prepend a header line describing the reduction.
    #[serde(default = "default_true")]
    pub include_warning: bool,
}

impl LimitConfig {
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            ..Self::default()
        }
    }

    pub fn with_max_array_items(mut self, max_array_items: usize) -> Self {
        self.max_array_items = max_array_items;
        self
    }

    pub fn without_warning(mut self) -> Self {
        self.include_warning = false;
        self
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            max_array_items: default_max_array_items(),
            include_warning: true,
        }
    }
}

fn default_max_tokens() -> usize {
    10_000
}

fn default_max_array_items() -> usize {
    50
}

fn default_true() -> bool {
    true
}
