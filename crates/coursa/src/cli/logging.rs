//! Tracing setup for the CLI.

use std::io;

use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "COURSA_LOG";

/// Filter used when `COURSA_LOG` is unset.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs a stderr subscriber filtered by `COURSA_LOG` or the verbosity flag.
pub fn init(verbose: u8) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let installed = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
    if installed.is_err() {
        debug!("tracing subscriber already installed");
    }
}
