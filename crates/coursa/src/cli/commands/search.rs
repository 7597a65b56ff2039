//! Implementation of `coursa search`.

use std::process::ExitCode;

use coursa_core::UserId;
use coursa_index::{SearchRequest, SortOrder, TextField};

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{dim, print_courses, print_json},
};

/// Builds the search request from command-line flags.
fn build_request(cmd: &SearchCommand) -> SearchRequest {
    let mut request = SearchRequest::new(cmd.query.join(" "))
        .with_fields(cmd.fields.iter().copied().map(TextField::from).collect())
        .with_order(SortOrder::from_key(&cmd.order));
    request.page = cmd.page;
    if let Some(filter) = cmd.filters.to_filter() {
        request = request.with_filter(filter);
    }
    request
}

/// Searches the catalog and prints one page of results.
pub fn run(ctx: &mut CommandContext, cmd: &SearchCommand) -> ExitCode {
    let request = build_request(cmd);
    if request.text.trim().is_empty() && request.filter.is_none() {
        eprintln!("error: give search terms or at least one filter");
        return ExitCode::FAILURE;
    }

    let engine = match ctx.indexed_engine() {
        Ok(engine) => engine,
        Err(code) => return code,
    };

    let viewer = cmd.user.as_deref().map(UserId::new);
    let results = engine.search(request, viewer.as_ref());

    if cmd.output.json {
        return print_json(&results);
    }

    let first_rank = (results.page - 1) * results.per_page + 1;
    print_courses(&results.courses, first_rank);
    if results.total > 0 {
        let pages = results.total.div_ceil(results.per_page);
        println!();
        println!(
            "{}",
            dim(&format!(
                "page {} of {}, {} matches",
                results.page, pages, results.total
            ))
        );
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::*;
    use crate::cli::args::{Cli, Commands};

    fn parse(args: &[&str]) -> SearchCommand {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Search(cmd) => cmd,
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn unknown_order_falls_back_to_relevance() {
        let cmd = parse(&["coursa", "search", "rust", "--order", "hottest"]);
        assert_eq!(build_request(&cmd).order, SortOrder::Relevance);
    }

    #[test]
    fn terms_are_joined_and_fields_mapped() {
        let cmd = parse(&[
            "coursa", "search", "machine", "learning", "--in", "title", "--page", "2",
        ]);
        let request = build_request(&cmd);
        assert_eq!(request.text, "machine learning");
        assert_eq!(request.fields, vec![TextField::Title]);
        assert_eq!(request.page, 2);
        assert!(request.filter.is_none());
    }

    #[test]
    fn filters_reach_the_request() {
        let cmd = parse(&["coursa", "search", "--category", "Data", "--min-rating", "4"]);
        assert!(build_request(&cmd).filter.is_some());
    }
}
