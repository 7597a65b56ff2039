//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules.

use std::path::{Path, PathBuf};

use crate::{
    Config, KeywordSettings, RecommendSettings, SearchSettings, Settings,
    parse::{RawConfig, RawKeywordSettings, RawRecommendSettings, RawSearchSettings, RawSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Extra stopwords: union of every file, duplicates removed
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    if configs.is_empty() {
        return Config::default();
    }

    let mut settings = Settings::default();
    let mut search = SearchSettings::default();
    let mut keywords = KeywordSettings::default();
    let mut recommend = RecommendSettings::default();

    // Lowest precedence first so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.settings {
            apply_raw_settings(&mut settings, raw);
        }
        if let Some(ref raw) = parsed.config.search {
            apply_raw_search(&mut search, raw);
        }
        if let Some(ref raw) = parsed.config.keywords {
            apply_raw_keywords(&mut keywords, raw);
        }
        if let Some(ref raw) = parsed.config.recommend {
            apply_raw_recommend(&mut recommend, raw);
        }
    }

    let config_root = configs
        .first()
        .and_then(|c| c.path.parent().map(Path::to_path_buf));

    Config {
        settings,
        search,
        keywords,
        recommend,
        config_root,
    }
}

/// Applies raw general settings to result, overwriting any present values.
fn apply_raw_settings(result: &mut Settings, raw: &RawSettings) {
    if let Some(v) = raw.default_limit {
        result.default_limit = v;
    }
}

/// Applies raw search settings to result.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(ref v) = raw.stemmer {
        result.stemmer = v.clone();
    }
    if let Some(v) = raw.title_weight {
        result.title_weight = v;
    }
    if let Some(v) = raw.keywords_weight {
        result.keywords_weight = v;
    }
    if let Some(v) = raw.description_weight {
        result.description_weight = v;
    }
    if let Some(v) = raw.per_page {
        result.per_page = v;
    }
    if let Some(ref v) = raw.fallback {
        result.fallback = v.clone();
    }
}

/// Applies raw keyword settings to result.
fn apply_raw_keywords(result: &mut KeywordSettings, raw: &RawKeywordSettings) {
    if let Some(v) = raw.top_n {
        result.top_n = v;
    }
    if let Some(ref words) = raw.stopwords {
        for word in words {
            if !result.stopwords.contains(word) {
                result.stopwords.push(word.clone());
            }
        }
    }
}

/// Applies raw recommendation settings to result.
fn apply_raw_recommend(result: &mut RecommendSettings, raw: &RawRecommendSettings) {
    if let Some(v) = raw.cold_start_threshold {
        result.cold_start_threshold = v;
    }
    if let Some(v) = raw.half_life_days {
        result.half_life_days = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_config;

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config(toml).unwrap(),
        }
    }

    #[test]
    fn empty_list_gives_defaults() {
        let config = merge_configs(&[]);
        assert!(config.config_root.is_none());
        assert_eq!(config.settings.default_limit, 10);
    }

    #[test]
    fn closest_config_wins_for_scalars() {
        let configs = [
            parsed("/project/.coursa.toml", "[search]\ntitle_weight = 4.0\n"),
            parsed(
                "/home/u/.coursa.toml",
                "[search]\ntitle_weight = 1.0\nper_page = 50\n",
            ),
        ];
        let config = merge_configs(&configs);
        assert!((config.search.title_weight - 4.0).abs() < f32::EPSILON);
        assert_eq!(config.search.per_page, 50);
        assert_eq!(config.config_root, Some(PathBuf::from("/project")));
    }

    #[test]
    fn stopwords_are_unioned() {
        let configs = [
            parsed("/p/.coursa.toml", "[keywords]\nstopwords = [\"bootcamp\"]\n"),
            parsed(
                "/g/.coursa.toml",
                "[keywords]\nstopwords = [\"bootcamp\", \"nanodegree\"]\n",
            ),
        ];
        let config = merge_configs(&configs);
        assert_eq!(config.keywords.stopwords, vec!["bootcamp", "nanodegree"]);
    }

    #[test]
    fn recommend_settings_merge() {
        let configs = [parsed(
            "/p/.coursa.toml",
            "[recommend]\ncold_start_threshold = 4\n",
        )];
        let config = merge_configs(&configs);
        assert_eq!(config.recommend.cold_start_threshold, 4);
        assert!((config.recommend.half_life_days - 30.0).abs() < f64::EPSILON);
    }
}
