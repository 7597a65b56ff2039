//! Configuration hash computation for index versioning.
//!
//! The index stores a hash of the settings that affect how documents are
//! tokenized and laid out. When that hash changes, the index must be rebuilt.
//!
//! Settings that affect the hash:
//! - Schema version (internal, bumped when field definitions change)
//! - Stemmer language
//!
//! Field weights and the fallback mode only matter at query time and are left out.

use std::hash::{Hash, Hasher};

use coursa_config::Config;
use siphasher::sip::SipHasher24;

/// Current schema version. Bump this when index field definitions change.
pub const SCHEMA_VERSION: u32 = 1;

/// Settings that affect indexing and are included in the config hash.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct IndexingConfig {
    /// Schema version.
    pub schema_version: u32,
    /// Stemmer language for text analysis.
    pub stemmer: String,
}

impl IndexingConfig {
    /// Extracts indexing-relevant settings from a config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            stemmer: config.search.stemmer.to_lowercase(),
        }
    }

    /// Computes a hash of the indexing configuration.
    pub fn compute_hash(&self) -> u64 {
        let mut hasher = SipHasher24::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Computes a hash and returns it as a hex string.
    pub fn hash_string(&self) -> String {
        format!("{:016x}", self.compute_hash())
    }
}

/// Computes a config hash from a Config.
pub fn compute_config_hash(config: &Config) -> String {
    IndexingConfig::from_config(config).hash_string()
}

#[cfg(test)]
mod test {
    use coursa_config::SearchSettings;

    use super::*;

    fn with_stemmer(stemmer: &str) -> Config {
        Config {
            search: SearchSettings {
                stemmer: stemmer.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn same_config_produces_same_hash() {
        assert_eq!(
            compute_config_hash(&Config::default()),
            compute_config_hash(&Config::default())
        );
    }

    #[test]
    fn different_stemmer_produces_different_hash() {
        assert_ne!(
            compute_config_hash(&with_stemmer("english")),
            compute_config_hash(&with_stemmer("french"))
        );
    }

    #[test]
    fn stemmer_case_is_ignored() {
        assert_eq!(
            compute_config_hash(&with_stemmer("English")),
            compute_config_hash(&with_stemmer("english"))
        );
    }

    #[test]
    fn query_time_settings_do_not_affect_hash() {
        let mut config = Config::default();
        let before = compute_config_hash(&config);
        config.search.title_weight = 9.0;
        config.search.fallback = "empty".to_string();
        assert_eq!(compute_config_hash(&config), before);
    }

    #[test]
    fn hash_is_sixteen_hex_digits() {
        let hash = compute_config_hash(&Config::default());
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
