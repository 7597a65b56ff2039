//! Implementations of `coursa recommend` and `coursa popular`.

use std::process::ExitCode;

use coursa_core::UserId;

use crate::cli::{
    args::{PopularCommand, RecommendCommand, Strategy},
    context::CommandContext,
    output::{print_courses, print_json},
};

/// Recommends courses for one user.
pub fn run(ctx: &mut CommandContext, cmd: &RecommendCommand) -> ExitCode {
    let limit = cmd.limit.unwrap_or(ctx.config.settings.default_limit);
    let engine = match ctx.engine() {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let user = UserId::new(cmd.user.as_str());
    let ranked = match cmd.strategy {
        Strategy::Hybrid => engine.recommend_hybrid(&user, limit),
        Strategy::Content => engine.recommend_content(&user, limit),
        Strategy::Collaborative => engine.recommend_collaborative(&user, limit),
    };
    let views = engine.decorate_ranked(&ranked, Some(&user));

    if cmd.output.json {
        return print_json(&views);
    }
    print_courses(&views, 1);
    ExitCode::SUCCESS
}

/// Lists the globally most popular courses.
pub fn popular(ctx: &mut CommandContext, cmd: &PopularCommand) -> ExitCode {
    let limit = cmd.limit.unwrap_or(ctx.config.settings.default_limit);
    let engine = match ctx.engine() {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let views = engine.decorate_ranked(&engine.recommend_for_anonymous(limit), None);
    if cmd.output.json {
        return print_json(&views);
    }
    print_courses(&views, 1);
    ExitCode::SUCCESS
}
