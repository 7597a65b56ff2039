//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod ingest;
pub mod init;
pub mod interact;
pub mod maintain;
pub mod recommend;
pub mod search;
pub mod status;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &mut CommandContext) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Status => status::run(ctx),
        Commands::Config => config::run(ctx),
        Commands::Ingest(cmd) => ingest::run(ctx, &cmd),
        Commands::Reindex => maintain::reindex(ctx),
        Commands::Precompute => maintain::precompute(ctx),
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::Recommend(cmd) => recommend::run(ctx, &cmd),
        Commands::Popular(cmd) => recommend::popular(ctx, &cmd),
        Commands::Interact(cmd) => interact::run(ctx, &cmd),
    }
}
