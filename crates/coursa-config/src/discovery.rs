//! Configuration file discovery.
//!
//! Discovers `.coursa.toml` files by walking up the directory tree from a starting point,
//! then appending the global `~/.coursa.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".coursa.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global (`~/.coursa.toml`) last.
/// Discovery stops early at a file that sets `root = true`.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    let mut found_root = false;

    let mut current = Some(cwd);
    while let Some(dir) = current {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            let is_root = is_root_config(&config_path);
            configs.push(config_path);
            if is_root {
                found_root = true;
                break;
            }
        }
        current = dir.parent();
    }

    if !found_root
        && let Some(global_path) = global_config_path()
        && global_path.is_file()
        && !configs.contains(&global_path)
    {
        configs.push(global_path);
    }

    configs
}

/// Returns the path to the global configuration file (`~/.coursa.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn finds_config_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = discover_config_files(dir.path());
        assert_eq!(found.first(), Some(&dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn walks_up_to_parents_closest_first() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        fs::write(dir.path().join("a").join(CONFIG_FILENAME), "").unwrap();

        let found = discover_config_files(&nested);
        assert_eq!(found[0], dir.path().join("a").join(CONFIG_FILENAME));
        assert_eq!(found[1], dir.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn root_config_stops_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("project");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        fs::write(nested.join(CONFIG_FILENAME), "root = true\n").unwrap();

        let found = discover_config_files(&nested);
        assert_eq!(found, vec![nested.join(CONFIG_FILENAME)]);
    }
}
