//! Configuration system for coursa.
//!
//! coursa uses TOML configuration files named `.coursa.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.coursa.toml` files found, then loading `~/.coursa.toml` as the global config with lowest
//! precedence.
//!
//! The directory holding the winning config file also anchors coursa's data directory
//! (`.coursa/`), which contains the search index, the recommendation caches and the
//! storage snapshot.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
mod validate;

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawKeywordSettings, RawRecommendSettings, RawSearchSettings, RawSettings,
    parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::config_template;
pub use validate::{ConfigWarning, STEMMER_LANGUAGES};
use validate::validate_config;

/// Name of the data directory created next to the winning config file.
pub const DATA_DIR: &str = ".coursa";

/// Top-level merged configuration for coursa.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Search-related settings.
    pub search: SearchSettings,
    /// Keyword extraction settings.
    pub keywords: KeywordSettings,
    /// Recommendation settings.
    pub recommend: RecommendSettings,
    /// Directory containing the most specific config file (determines data location).
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.coursa.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Returns the data directory (`.coursa/` next to the winning config file).
    ///
    /// Returns `None` when no configuration file was found.
    pub fn data_directory(&self) -> Option<PathBuf> {
        self.config_root.as_ref().map(|root| root.join(DATA_DIR))
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            settings: self.settings.clone(),
            search: self.search.clone(),
            keywords: self.keywords.clone(),
            recommend: self.recommend.clone(),
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// General settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Number of recommendations returned when the caller gives no limit.
    pub default_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

/// Search-related settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Stemming language.
    pub stemmer: String,
    /// Relevance weight for title matches.
    pub title_weight: f32,
    /// Relevance weight for keyword matches.
    pub keywords_weight: f32,
    /// Relevance weight for description matches.
    pub description_weight: f32,
    /// Results per page.
    pub per_page: usize,
    /// Behavior when a free-text query cannot be parsed (`substring` or `empty`).
    pub fallback: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            stemmer: String::from("english"),
            title_weight: 2.0,
            keywords_weight: 1.5,
            description_weight: 1.0,
            per_page: 20,
            fallback: String::from("substring"),
        }
    }
}

impl SearchSettings {
    /// Returns the configured field weights.
    pub fn field_weights(&self) -> FieldWeights {
        FieldWeights {
            title: self.title_weight,
            keywords: self.keywords_weight,
            description: self.description_weight,
        }
    }

    /// Returns the fallback mode, defaulting to substring matching for unknown values.
    pub fn fallback_mode(&self) -> SearchFallback {
        self.fallback.parse().unwrap_or_default()
    }
}

/// Relevance weights for the full-text fields of the search index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    /// Title weight.
    pub title: f32,
    /// Keywords weight.
    pub keywords: f32,
    /// Description weight.
    pub description: f32,
}

impl Default for FieldWeights {
    fn default() -> Self {
        SearchSettings::default().field_weights()
    }
}

/// What a search does when the free-text query cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFallback {
    /// Case-insensitive substring match against titles and descriptions.
    #[default]
    Substring,
    /// Return no results.
    Empty,
}

impl FromStr for SearchFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "empty" | "none" => Ok(Self::Empty),
            other => Err(format!("unknown fallback mode: {other}")),
        }
    }
}

impl fmt::Display for SearchFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring => write!(f, "substring"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// Keyword extraction settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeywordSettings {
    /// Number of keywords kept per course.
    pub top_n: usize,
    /// Extra stopwords added to the built-in list.
    pub stopwords: Vec<String>,
}

impl Default for KeywordSettings {
    fn default() -> Self {
        Self {
            top_n: 20,
            stopwords: Vec::new(),
        }
    }
}

/// Recommendation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecommendSettings {
    /// Interactions a user needs before personalized recommendations kick in.
    pub cold_start_threshold: usize,
    /// Age in days at which an interaction's weight is halved.
    pub half_life_days: f64,
}

impl Default for RecommendSettings {
    fn default() -> Self {
        Self {
            cold_start_threshold: 3,
            half_life_days: 30.0,
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// General settings.
    settings: Settings,
    /// Search-related settings.
    search: SearchSettings,
    /// Keyword extraction settings.
    keywords: KeywordSettings,
    /// Recommendation settings.
    recommend: RecommendSettings,
}
