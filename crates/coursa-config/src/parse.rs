//! Configuration file parsing.
//!
//! Parses individual `.coursa.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// General settings section.
    pub settings: Option<RawSettings>,
    /// Search settings section.
    pub search: Option<RawSearchSettings>,
    /// Keyword extraction section.
    pub keywords: Option<RawKeywordSettings>,
    /// Recommendation section.
    pub recommend: Option<RawRecommendSettings>,
}

/// Raw general settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Maximum results per recommendation request.
    pub default_limit: Option<usize>,
}

/// Raw search settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Stemming language.
    pub stemmer: Option<String>,
    /// Relevance weight for title matches.
    pub title_weight: Option<f32>,
    /// Relevance weight for keyword matches.
    pub keywords_weight: Option<f32>,
    /// Relevance weight for description matches.
    pub description_weight: Option<f32>,
    /// Results per page.
    pub per_page: Option<usize>,
    /// Behavior when a free-text query cannot be parsed.
    pub fallback: Option<String>,
}

/// Raw keyword extraction settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawKeywordSettings {
    /// Number of keywords kept per course.
    pub top_n: Option<usize>,
    /// Extra stopwords. Accepts a single string or an array of strings.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub stopwords: Option<Vec<String>>,
}

/// Raw recommendation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecommendSettings {
    /// Interactions a user needs before personalized recommendations kick in.
    pub cold_start_threshold: Option<usize>,
    /// Age in days at which an interaction's weight is halved.
    pub half_life_days: Option<f64>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.settings.is_none());
        assert!(config.search.is_none());
        assert!(config.keywords.is_none());
        assert!(config.recommend.is_none());
    }

    #[test]
    fn test_parse_search_settings() {
        let toml = r#"
[search]
stemmer = "spanish"
title_weight = 3.0
fallback = "empty"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let search = config.search.unwrap();
        assert_eq!(search.stemmer, Some("spanish".to_string()));
        assert_eq!(search.title_weight, Some(3.0));
        assert_eq!(search.fallback, Some("empty".to_string()));
        assert!(search.description_weight.is_none());
    }

    #[test]
    fn test_parse_stopwords_single_string() {
        let toml = r#"
[keywords]
stopwords = "bootcamp"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let keywords = config.keywords.unwrap();
        assert_eq!(keywords.stopwords, Some(vec!["bootcamp".to_string()]));
    }

    #[test]
    fn test_parse_stopwords_list() {
        let toml = r#"
[keywords]
top_n = 5
stopwords = ["bootcamp", "masterclass"]
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let keywords = config.keywords.unwrap();
        assert_eq!(keywords.top_n, Some(5));
        assert_eq!(
            keywords.stopwords,
            Some(vec!["bootcamp".to_string(), "masterclass".to_string()])
        );
    }

    #[test]
    fn test_parse_recommend_settings() {
        let toml = r#"
[recommend]
cold_start_threshold = 5
half_life_days = 14.0
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let recommend = config.recommend.unwrap();
        assert_eq!(recommend.cold_start_threshold, Some(5));
        assert_eq!(recommend.half_life_days, Some(14.0));
    }

    #[test]
    fn test_parse_invalid_toml_reports_path() {
        let err = parse_config_str("[search\n", Path::new("broken.toml")).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_is_root_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(&path, "root = true\n").unwrap();
        assert!(is_root_config(&path));

        fs::write(&path, "[settings]\n").unwrap();
        assert!(!is_root_config(&path));
    }
}
