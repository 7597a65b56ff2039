//! Implementation of `coursa status`.

use std::process::ExitCode;

use coursa_config::discover_config_files;
use coursa_core::CourseStore;
use coursa_index::index_directory;

use crate::cli::{
    context::CommandContext,
    output::{dim, header, subheader, warning},
};

/// Shows configuration files, catalog size, index and cache state.
pub fn run(ctx: &mut CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);
    if config_files.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!("Run {} to create a configuration file.", subheader("coursa init"));
        return ExitCode::SUCCESS;
    }

    println!("{}", header("coursa"));
    println!();
    println!("{}", subheader("Config files (highest precedence first):"));
    for path in &config_files {
        println!("   {}", path.display());
    }
    println!();

    let index_path = index_directory(&ctx.config);
    let engine = match ctx.engine() {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let store = engine.store();
    let interactions = store.all_interactions();
    println!("{}", subheader("Catalog:"));
    println!("   {} courses", store.course_count());
    println!("   {} interactions", interactions.len());
    println!();

    let status = engine.index_status();
    print!("{}\n   ", subheader("Index:"));
    if status.needs_rebuild() {
        print!("{}", warning(status.description()));
    } else {
        print!("{}", status.description());
    }
    match &index_path {
        Some(path) => println!(" {}", dim(&format!("({})", path.display()))),
        None => println!(),
    }
    println!();

    let caches = engine.caches();
    println!("{}", subheader("Caches:"));
    let state = |present: bool| if present { "present" } else { "missing" };
    println!("   course_features: {}", state(caches.features().is_some()));
    println!("   item_sim:        {}", state(caches.item_similarity().is_some()));
    println!("   idf:             {}", state(caches.idf().is_some()));

    ExitCode::SUCCESS
}
