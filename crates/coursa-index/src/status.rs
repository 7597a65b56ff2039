//! Index status detection.
//!
//! Determines the state of the index relative to configuration and reads/writes
//! the stored config hash.

use std::{fs, io, path::Path};

use coursa_config::Config;

use crate::{
    config_hash::compute_config_hash,
    location::{config_hash_path, index_directory},
};

/// Status of the search index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// Index exists and matches current configuration.
    Current,
    /// Index exists but was built with different indexing settings.
    ConfigChanged,
    /// No index exists.
    Missing,
}

impl IndexStatus {
    /// Returns a human-readable description for display.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::ConfigChanged => "stale (config changed)",
            Self::Missing => "missing",
        }
    }

    /// Returns true if the index must be rebuilt before searching.
    pub fn needs_rebuild(&self) -> bool {
        !matches!(self, Self::Current)
    }
}

/// Reads the stored config hash from an index directory.
///
/// Returns `None` if the hash file doesn't exist or can't be read.
pub fn read_stored_hash(index_dir: &Path) -> Option<String> {
    fs::read_to_string(config_hash_path(index_dir))
        .ok()
        .map(|s| s.trim().to_string())
}

/// Writes the config hash to an index directory, creating it if needed.
pub fn write_config_hash(index_dir: &Path, hash: &str) -> io::Result<()> {
    fs::create_dir_all(index_dir)?;
    fs::write(config_hash_path(index_dir), hash)
}

/// Returns true if a Tantivy index exists in the directory.
pub fn index_exists(index_dir: &Path) -> bool {
    index_dir.join("meta.json").exists()
}

/// Determines the current status of the index for a configuration.
pub fn detect_index_status(config: &Config) -> IndexStatus {
    let Some(index_dir) = index_directory(config) else {
        return IndexStatus::Missing;
    };

    if !index_exists(&index_dir) {
        return IndexStatus::Missing;
    }

    match read_stored_hash(&index_dir) {
        Some(stored) if stored == compute_config_hash(config) => IndexStatus::Current,
        _ => IndexStatus::ConfigChanged,
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    fn config_with_root(root: &Path) -> Config {
        Config {
            config_root: Some(root.to_path_buf()),
            ..Default::default()
        }
    }

    fn make_index_dir(root: &Path) -> PathBuf {
        let index_dir = root.join(".coursa").join("index");
        fs::create_dir_all(&index_dir).unwrap();
        fs::write(index_dir.join("meta.json"), "{}").unwrap();
        index_dir
    }

    #[test]
    fn status_description() {
        assert_eq!(IndexStatus::Current.description(), "current");
        assert_eq!(
            IndexStatus::ConfigChanged.description(),
            "stale (config changed)"
        );
        assert_eq!(IndexStatus::Missing.description(), "missing");
        assert!(!IndexStatus::Current.needs_rebuild());
        assert!(IndexStatus::Missing.needs_rebuild());
    }

    #[test]
    fn read_write_config_hash() {
        let temp = TempDir::new().unwrap();
        let index_dir = temp.path().join("index");

        assert!(read_stored_hash(&index_dir).is_none());

        write_config_hash(&index_dir, "abc123").unwrap();
        assert_eq!(read_stored_hash(&index_dir), Some("abc123".to_string()));

        fs::write(config_hash_path(&index_dir), "  def456  \n").unwrap();
        assert_eq!(read_stored_hash(&index_dir), Some("def456".to_string()));
    }

    #[test]
    fn missing_without_config_root() {
        assert_eq!(detect_index_status(&Config::default()), IndexStatus::Missing);
    }

    #[test]
    fn missing_without_meta_json() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".coursa").join("index")).unwrap();

        let config = config_with_root(temp.path());
        assert_eq!(detect_index_status(&config), IndexStatus::Missing);
    }

    #[test]
    fn config_changed_without_hash() {
        let temp = TempDir::new().unwrap();
        make_index_dir(temp.path());

        let config = config_with_root(temp.path());
        assert_eq!(detect_index_status(&config), IndexStatus::ConfigChanged);
    }

    #[test]
    fn config_changed_when_hash_differs() {
        let temp = TempDir::new().unwrap();
        let index_dir = make_index_dir(temp.path());
        write_config_hash(&index_dir, "old_hash").unwrap();

        let config = config_with_root(temp.path());
        assert_eq!(detect_index_status(&config), IndexStatus::ConfigChanged);
    }

    #[test]
    fn current_when_hash_matches() {
        let temp = TempDir::new().unwrap();
        let index_dir = make_index_dir(temp.path());
        let config = config_with_root(temp.path());
        write_config_hash(&index_dir, &compute_config_hash(&config)).unwrap();

        assert_eq!(detect_index_status(&config), IndexStatus::Current);
    }
}
