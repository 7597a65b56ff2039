//! Implementations of `coursa reindex` and `coursa precompute`.

use std::process::ExitCode;

use crate::cli::{context::CommandContext, output::success};

/// Rebuilds the search index from storage.
pub fn reindex(ctx: &mut CommandContext) -> ExitCode {
    let engine = match ctx.engine() {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    match engine.reindex() {
        Ok(count) => {
            println!("{}", success(&format!("Indexed {count} courses")));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: reindex failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Rebuilds the feature and similarity caches.
pub fn precompute(ctx: &mut CommandContext) -> ExitCode {
    let engine = match ctx.engine() {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    match engine.precompute_caches() {
        Ok(report) => {
            println!(
                "{}",
                success(&format!(
                    "Cached features for {} courses, neighbors for {}",
                    report.courses, report.similar_items
                ))
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: precompute failed: {e}");
            ExitCode::FAILURE
        }
    }
}
