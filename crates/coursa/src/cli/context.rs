//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use coursa_config::Config;
use coursa_core::Engine;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
    /// Engine opened for this invocation.
    engine: Option<Engine>,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self {
            cwd,
            config,
            engine: None,
        })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is
    /// invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
            engine: None,
        })
    }

    /// Returns the engine, opening it on first use.
    pub fn engine(&mut self) -> Result<&Engine, ExitCode> {
        if self.engine.is_none() {
            let engine = Engine::open(self.config.clone()).map_err(|e| {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            })?;
            self.engine = Some(engine);
        }
        self.engine.as_ref().ok_or(ExitCode::FAILURE)
    }

    /// Returns the engine after rebuilding the index if it is missing or stale.
    pub fn indexed_engine(&mut self) -> Result<&Engine, ExitCode> {
        let engine = self.engine()?;
        if engine.index_status().needs_rebuild() {
            eprintln!("Index needs rebuild, updating...");
            if let Err(e) = engine.reindex() {
                eprintln!("error: indexing failed: {e}");
                return Err(ExitCode::FAILURE);
            }
        }
        Ok(engine)
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
