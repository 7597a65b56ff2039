//! Implementation of `coursa check`.

use std::process::ExitCode;

use coursa_config::{ConfigWarning, discover_config_files};

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Validates configuration, exiting non-zero when warnings are found.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);

    if config_files.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!("Run {} to create a configuration file.", subheader("coursa init"));
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader("Config files:"));
    for path in &config_files {
        println!("   {}", path.display());
    }
    println!();

    let warnings = ctx.config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|w| match w {
            ConfigWarning::NonPositiveFieldWeight { .. } => {
                "Field weights in [search] must be greater than zero."
            }
            ConfigWarning::ZeroKeywordCount => "Set keywords.top_n to at least 1.",
            ConfigWarning::NonPositiveHalfLife(_) => {
                "recommend.half_life_days is measured in days; 30 is the default."
            }
            ConfigWarning::UnknownStemmer(_) => {
                "Use a Snowball language name such as \"english\" or \"spanish\"."
            }
            ConfigWarning::UnknownFallback(_) => "search.fallback is \"substring\" or \"empty\".",
            ConfigWarning::ZeroPerPage => "Set search.per_page to at least 1.",
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();

    for hint in hints {
        println!("{}", dim(&format!("Hint: {hint}")));
    }
}
