//! Implementation of `coursa ingest`.

use std::{fs, process::ExitCode};

use coursa_core::CourseRecord;

use crate::cli::{
    args::IngestCommand,
    context::CommandContext,
    output::{success, warning},
};

/// Reads course records from a JSON array and ingests them.
pub fn run(ctx: &mut CommandContext, cmd: &IngestCommand) -> ExitCode {
    let contents = match fs::read_to_string(&cmd.file) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", cmd.file.display());
            return ExitCode::FAILURE;
        }
    };

    let records: Vec<CourseRecord> = match serde_json::from_str(&contents) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("error: failed to parse {}: {e}", cmd.file.display());
            return ExitCode::FAILURE;
        }
    };

    let engine = match ctx.engine() {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    match engine.ingest(records) {
        Ok(report) => {
            println!(
                "{}",
                success(&format!(
                    "Ingested {} of {} records",
                    report.upserted, report.received
                ))
            );
            if report.skipped > 0 {
                println!(
                    "{}",
                    warning(&format!("Skipped {} records without url or title", report.skipped))
                );
            }
            if !report.indexed {
                println!("{}", warning("Search index not updated; run `coursa reindex`"));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: ingestion failed: {e}");
            ExitCode::FAILURE
        }
    }
}
