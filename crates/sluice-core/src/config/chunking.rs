//! Chunking configuration and its named presets.
//!
//! Presets are plain values built on demand; there is no shared default
//! instance to mutate.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Reduction strategy the analyzer can recommend or a config can force.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStrategy {
    #[default]
    Truncate,
    Sample,
    Summarize,
    Paginate,
}

/// Named size budgets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Conservative,
    #[default]
    Standard,
    Permissive,
    DatabaseResults,
}

impl std::str::FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "conservative" => Ok(Preset::Conservative),
            "standard" => Ok(Preset::Standard),
            "permissive" => Ok(Preset::Permissive),
            "database_results" => Ok(Preset::DatabaseResults),
            other => Err(ConfigError::Config(format!("unknown preset '{}'", other))),
        }
    }
}

/// Size budget and strategy preferences for the chunking orchestrator.
///
/// When deserialized, an optional `preset` key selects the base values and
/// any other key overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ChunkingSection")]
pub struct ChunkingConfig {
    pub max_tokens: usize,
    pub max_characters: usize,
    pub max_array_items: usize,
    pub max_object_properties: usize,
    pub summary_strategy: SummaryStrategy,
    /// When true, `summary_strategy` replaces the analyzer's suggestion.
    pub force_strategy: bool,
    pub enable_pagination: bool,
    pub include_metadata: bool,
}

impl ChunkingConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Conservative => Self::conservative(),
            Preset::Standard => Self::standard(),
            Preset::Permissive => Self::permissive(),
            Preset::DatabaseResults => Self::database_results(),
        }
    }

    /// Tight budget for surfaces with little context to spare.
    pub fn conservative() -> Self {
        Self {
            max_tokens: 5_000,
            max_characters: 17_500,
            max_array_items: 20,
            max_object_properties: 15,
            summary_strategy: SummaryStrategy::Summarize,
            force_strategy: false,
            enable_pagination: true,
            include_metadata: true,
        }
    }

    pub fn standard() -> Self {
        Self {
            max_tokens: 10_000,
            max_characters: 35_000,
            max_array_items: 50,
            max_object_properties: 25,
            summary_strategy: SummaryStrategy::Sample,
            force_strategy: false,
            enable_pagination: true,
            include_metadata: true,
        }
    }

    pub fn permissive() -> Self {
        Self {
            max_tokens: 20_000,
            max_characters: 70_000,
            max_array_items: 100,
            max_object_properties: 50,
            summary_strategy: SummaryStrategy::Paginate,
            force_strategy: false,
            enable_pagination: true,
            include_metadata: true,
        }
    }

    /// Row-oriented query results: moderate row cap, wide rows allowed.
    pub fn database_results() -> Self {
        Self {
            max_tokens: 8_000,
            max_characters: 28_000,
            max_array_items: 40,
            max_object_properties: 30,
            summary_strategy: SummaryStrategy::Paginate,
            force_strategy: false,
            enable_pagination: true,
            include_metadata: true,
        }
    }

    pub fn with_max_array_items(mut self, max_array_items: usize) -> Self {
        self.max_array_items = max_array_items;
        self
    }

    pub fn with_max_object_properties(mut self, max_object_properties: usize) -> Self {
        self.max_object_properties = max_object_properties;
        self
    }

    pub fn with_max_characters(mut self, max_characters: usize) -> Self {
        self.max_characters = max_characters;
        self
    }

    pub fn with_pagination(mut self, enable_pagination: bool) -> Self {
        self.enable_pagination = enable_pagination;
        self
    }

    pub fn with_metadata(mut self, include_metadata: bool) -> Self {
        self.include_metadata = include_metadata;
        self
    }

    /// Always apply `strategy` instead of the analyzer's suggestion.
    pub fn forcing(mut self, strategy: SummaryStrategy) -> Self {
        self.summary_strategy = strategy;
        self.force_strategy = true;
        self
    }

    /// Reject budgets that would make every response unrepresentable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError::Config(
                "chunking.max_tokens must be greater than zero".to_string(),
            ));
        }
        if self.max_characters == 0 {
            return Err(ConfigError::Config(
                "chunking.max_characters must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// On-disk form of [`ChunkingConfig`]: a base preset plus overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChunkingSection {
    #[serde(default)]
    preset: Option<Preset>,
    #[serde(default)]
    max_tokens: Option<usize>,
    #[serde(default)]
    max_characters: Option<usize>,
    #[serde(default)]
    max_array_items: Option<usize>,
    #[serde(default)]
    max_object_properties: Option<usize>,
    #[serde(default)]
    summary_strategy: Option<SummaryStrategy>,
    #[serde(default)]
    force_strategy: Option<bool>,
    #[serde(default)]
    enable_pagination: Option<bool>,
    #[serde(default)]
    include_metadata: Option<bool>,
}

impl From<ChunkingSection> for ChunkingConfig {
    fn from(section: ChunkingSection) -> Self {
        let base = ChunkingConfig::preset(section.preset.unwrap_or_default());
        Self {
            max_tokens: section.max_tokens.unwrap_or(base.max_tokens),
            max_characters: section.max_characters.unwrap_or(base.max_characters),
            max_array_items: section.max_array_items.unwrap_or(base.max_array_items),
            max_object_properties: section
                .max_object_properties
                .unwrap_or(base.max_object_properties),
            summary_strategy: section.summary_strategy.unwrap_or(base.summary_strategy),
            force_strategy: section.force_strategy.unwrap_or(base.force_strategy),
            enable_pagination: section.enable_pagination.unwrap_or(base.enable_pagination),
            include_metadata: section.include_metadata.unwrap_or(base.include_metadata),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_grow_from_conservative_to_permissive() {
        let conservative = ChunkingConfig::conservative();
        let standard = ChunkingConfig::standard();
        let permissive = ChunkingConfig::permissive();

        assert!(conservative.max_tokens < standard.max_tokens);
        assert!(standard.max_tokens < permissive.max_tokens);
        assert!(conservative.max_array_items < standard.max_array_items);
        assert_eq!(ChunkingConfig::default(), standard);
    }

    #[test]
    fn preset_names_parse_with_either_separator() {
        assert_eq!("database-results".parse::<Preset>().unwrap(), Preset::DatabaseResults);
        assert_eq!("Conservative".parse::<Preset>().unwrap(), Preset::Conservative);
        assert!("huge".parse::<Preset>().is_err());
    }

    #[test]
    fn section_overrides_apply_on_top_of_preset() {
        let config: ChunkingConfig = serde_yaml::from_str(
            "preset: conservative\nmax_array_items: 30\nenable_pagination: false\n",
        )
        .unwrap();

        assert_eq!(config.max_array_items, 30);
        assert!(!config.enable_pagination);
        assert_eq!(config.max_tokens, ChunkingConfig::conservative().max_tokens);
        assert_eq!(config.summary_strategy, SummaryStrategy::Summarize);
    }

    #[test]
    fn serialized_config_round_trips_without_preset_key() {
        let config = ChunkingConfig::permissive().forcing(SummaryStrategy::Summarize);
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: ChunkingConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn zero_budgets_are_rejected() {
        let mut config = ChunkingConfig::standard();
        config.max_characters = 0;
        assert!(config.validate().is_err());
        assert!(ChunkingConfig::standard().validate().is_ok());
    }
}
