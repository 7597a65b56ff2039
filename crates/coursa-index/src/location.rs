//! Index location resolution.
//!
//! The index lives in `.coursa/index/` under the directory containing the most
//! specific `.coursa.toml`, or in `~/.coursa/index/` when only the global config
//! exists.

use std::path::{Path, PathBuf};

use coursa_config::Config;

/// Subdirectory of the data directory holding the index.
const INDEX_DIR: &str = "index";

/// File inside the index directory recording the indexing config hash.
const CONFIG_HASH_FILE: &str = "config_hash";

/// Computes the index directory for a configuration.
///
/// Returns `None` when no configuration file was found.
pub fn index_directory(config: &Config) -> Option<PathBuf> {
    config.data_directory().map(|dir| dir.join(INDEX_DIR))
}

/// Returns the path to the config hash file for an index.
pub fn config_hash_path(index_dir: &Path) -> PathBuf {
    index_dir.join(CONFIG_HASH_FILE)
}

#[cfg(test)]
mod test {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn index_directory_under_data_dir() {
        let temp = TempDir::new().unwrap();
        let config = Config {
            config_root: Some(temp.path().to_path_buf()),
            ..Default::default()
        };

        let index_dir = index_directory(&config).unwrap();
        assert_eq!(index_dir, temp.path().join(".coursa").join("index"));
    }

    #[test]
    fn index_directory_none_without_config() {
        assert!(index_directory(&Config::default()).is_none());
    }

    #[test]
    fn config_hash_path_in_index_dir() {
        let index_dir = PathBuf::from("/home/user/project/.coursa/index");
        assert_eq!(
            config_hash_path(&index_dir),
            PathBuf::from("/home/user/project/.coursa/index/config_hash")
        );
    }
}
