//! Token estimation heuristics.
//!
//! Both ratios are approximations with no tokenizer behind them. The analyzer
//! and the limiter use different ratios and are not expected to agree.

/// Characters per token assumed by the analyzer.
pub const ANALYZER_CHARS_PER_TOKEN: f64 = 3.5;

/// Characters per token assumed by the simple limiter.
pub const LIMITER_CHARS_PER_TOKEN: usize = 4;

/// Analyzer estimate for a serialization of `characters` characters.
pub fn estimate_tokens(characters: usize) -> usize {
    (characters as f64 / ANALYZER_CHARS_PER_TOKEN).ceil() as usize
}

/// Limiter estimate for a rendered string.
pub fn limiter_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(LIMITER_CHARS_PER_TOKEN)
}
