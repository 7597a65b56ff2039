//! Integration tests for coursa-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> merge.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use coursa_config::{CONFIG_FILENAME, Config, ConfigError, SearchFallback};

/// Writes a config file into `dir`.
fn write_config(dir: &Path, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(CONFIG_FILENAME), content).unwrap();
}

#[test]
fn test_load_no_config_returns_default() {
    let config = Config::load_from_files(&[]).unwrap();

    assert!(config.config_root.is_none());
    assert_eq!(config.settings.default_limit, 10);
    assert_eq!(config.search.stemmer, "english");
}

#[test]
fn test_nested_config_overrides_parent() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("project");
    write_config(
        dir.path(),
        "root = true\n[search]\nfallback = \"empty\"\nper_page = 5\n",
    );
    write_config(&project, "[search]\nper_page = 7\n");

    let config = Config::load(&project).unwrap();
    assert_eq!(config.search.per_page, 7);
    assert_eq!(config.search.fallback_mode(), SearchFallback::Empty);
    assert_eq!(config.config_root.as_deref(), Some(project.as_path()));
    assert_eq!(config.data_directory(), Some(project.join(".coursa")));
}

#[test]
fn test_invalid_toml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "root = true\n[keywords\n");

    let err = Config::load(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
}

#[test]
fn test_extra_stopwords_loaded() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        "root = true\n[keywords]\ntop_n = 8\nstopwords = \"bootcamp\"\n",
    );

    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config.keywords.top_n, 8);
    assert_eq!(config.keywords.stopwords, vec!["bootcamp"]);
}
