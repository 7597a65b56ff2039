//! Command-line interface for the `coursa` course catalog.

use std::process::ExitCode;

use clap::Parser;
use coursa::cli::{CommandContext, args::Cli, commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = if cli.command.needs_config() {
        CommandContext::load()
    } else {
        CommandContext::load_cwd_only()
    };
    match ctx {
        Ok(mut ctx) => commands::run(cli.command, &mut ctx),
        Err(code) => code,
    }
}
