//! Implementation of `coursa interact`.

use std::process::ExitCode;

use coursa_core::{CourseId, UserId};

use crate::cli::{args::InteractCommand, context::CommandContext, output::success};

/// Records a like, dislike or view and prints the resulting state.
pub fn run(ctx: &mut CommandContext, cmd: &InteractCommand) -> ExitCode {
    let engine = match ctx.engine() {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let user = UserId::new(cmd.user.as_str());
    let course = CourseId::new(cmd.course.as_str());
    match engine.record_interaction(&user, &course, cmd.action) {
        Ok(interaction) => {
            println!(
                "{}",
                success(&format!(
                    "{user} on {course}: liked={} disliked={} views={}",
                    interaction.liked, interaction.disliked, interaction.viewed
                ))
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
