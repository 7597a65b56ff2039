//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.
//! Nothing here is fatal: questionable values are reported and the defaults
//! downstream take over.

use std::fmt;

use crate::{Config, SearchFallback};

/// Stemmer languages understood by the search index analyzer.
pub const STEMMER_LANGUAGES: &[&str] = &[
    "arabic",
    "danish",
    "dutch",
    "english",
    "finnish",
    "french",
    "german",
    "greek",
    "hungarian",
    "italian",
    "norwegian",
    "portuguese",
    "romanian",
    "russian",
    "spanish",
    "swedish",
    "tamil",
    "turkish",
];

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// A search field weight is zero or negative.
    NonPositiveFieldWeight {
        /// Name of the field.
        field: &'static str,
        /// Configured weight.
        weight: f32,
    },
    /// `keywords.top_n` is zero, so no keyword features are produced.
    ZeroKeywordCount,
    /// `recommend.half_life_days` is zero or negative.
    NonPositiveHalfLife(f64),
    /// The stemmer language is not supported by the analyzer.
    UnknownStemmer(String),
    /// The search fallback mode is not recognized.
    UnknownFallback(String),
    /// `search.per_page` is zero.
    ZeroPerPage,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveFieldWeight { field, weight } => {
                write!(f, "search weight for '{field}' is not positive: {weight}")
            }
            Self::ZeroKeywordCount => {
                write!(f, "keywords.top_n is 0; courses will have no keyword features")
            }
            Self::NonPositiveHalfLife(days) => {
                write!(f, "recommend.half_life_days must be positive, got {days}")
            }
            Self::UnknownStemmer(name) => write!(f, "unsupported stemmer language: {name}"),
            Self::UnknownFallback(mode) => write!(
                f,
                "unknown search fallback '{mode}', expected 'substring' or 'empty'"
            ),
            Self::ZeroPerPage => write!(f, "search.per_page is 0; defaulting to 1"),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let weights = [
        ("title", config.search.title_weight),
        ("keywords", config.search.keywords_weight),
        ("description", config.search.description_weight),
    ];
    for (field, weight) in weights {
        if weight <= 0.0 || weight.is_nan() {
            warnings.push(ConfigWarning::NonPositiveFieldWeight { field, weight });
        }
    }

    if !STEMMER_LANGUAGES.contains(&config.search.stemmer.to_lowercase().as_str()) {
        warnings.push(ConfigWarning::UnknownStemmer(config.search.stemmer.clone()));
    }

    if config.search.fallback.parse::<SearchFallback>().is_err() {
        warnings.push(ConfigWarning::UnknownFallback(config.search.fallback.clone()));
    }

    if config.search.per_page == 0 {
        warnings.push(ConfigWarning::ZeroPerPage);
    }

    if config.keywords.top_n == 0 {
        warnings.push(ConfigWarning::ZeroKeywordCount);
    }

    let half_life = config.recommend.half_life_days;
    if half_life <= 0.0 || half_life.is_nan() {
        warnings.push(ConfigWarning::NonPositiveHalfLife(half_life));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_clean() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn reports_bad_values() {
        let mut config = Config::default();
        config.search.title_weight = 0.0;
        config.search.stemmer = "klingon".into();
        config.search.fallback = "explode".into();
        config.keywords.top_n = 0;
        config.recommend.half_life_days = -1.0;

        let warnings = validate_config(&config);
        assert!(warnings.contains(&ConfigWarning::NonPositiveFieldWeight {
            field: "title",
            weight: 0.0
        }));
        assert!(warnings.contains(&ConfigWarning::UnknownStemmer("klingon".into())));
        assert!(warnings.contains(&ConfigWarning::UnknownFallback("explode".into())));
        assert!(warnings.contains(&ConfigWarning::ZeroKeywordCount));
        assert!(warnings.contains(&ConfigWarning::NonPositiveHalfLife(-1.0)));
    }

    #[test]
    fn stemmer_check_is_case_insensitive() {
        let mut config = Config::default();
        config.search.stemmer = "German".into();
        assert!(validate_config(&config).is_empty());
    }
}
