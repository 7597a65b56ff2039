//! Clap argument definitions for the `coursa` CLI.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use coursa_core::Action;
use coursa_index::{Facet, Filter, NumericField, TextField};
use tracing::warn;

/// Parse an interaction action from a string.
fn parse_action(s: &str) -> Result<Action, String> {
    s.parse()
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "coursa")]
#[command(about = "Search and recommend online courses")]
pub struct Cli {
    /// Log verbosity (-v for info, -vv for debug); COURSA_LOG overrides
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output mode flag.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Text fields a query can be restricted to.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Course title
    Title,
    /// Course description
    Description,
    /// Extracted keywords
    Keywords,
}

impl From<SearchField> for TextField {
    fn from(field: SearchField) -> Self {
        match field {
            SearchField::Title => Self::Title,
            SearchField::Description => Self::Description,
            SearchField::Keywords => Self::Keywords,
        }
    }
}

/// Structured filter flags for `coursa search`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only courses in this category (repeatable, any of)
    #[arg(long)]
    pub category: Vec<String>,

    /// Only courses at this level (repeatable, any of)
    #[arg(long)]
    pub level: Vec<String>,

    /// Only courses on this platform (repeatable, any of)
    #[arg(long)]
    pub platform: Vec<String>,

    /// Only courses by this instructor (repeatable, any of)
    #[arg(long)]
    pub instructor: Vec<String>,

    /// Minimum duration in hours
    #[arg(long)]
    pub min_duration: Option<f64>,

    /// Maximum duration in hours
    #[arg(long)]
    pub max_duration: Option<f64>,

    /// Minimum rating
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Maximum rating
    #[arg(long)]
    pub max_rating: Option<f64>,

    /// Only courses scraped on or after this date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub since: Option<String>,
}

impl FilterArgs {
    /// Combines the flags into one filter: any of the values within a facet, all
    /// facets and ranges together. Returns `None` when no flag is set.
    pub fn to_filter(&self) -> Option<Filter> {
        let mut parts = Vec::new();

        let facets = [
            (Facet::Category, &self.category),
            (Facet::Level, &self.level),
            (Facet::Platform, &self.platform),
            (Facet::Instructor, &self.instructor),
        ];
        for (facet, values) in facets {
            if !values.is_empty() {
                parts.push(Filter::any_of(facet, values));
            }
        }

        if self.min_duration.is_some() || self.max_duration.is_some() {
            parts.push(Filter::range(
                NumericField::Duration,
                self.min_duration,
                self.max_duration,
            ));
        }
        if self.min_rating.is_some() || self.max_rating.is_some() {
            parts.push(Filter::range(
                NumericField::Rating,
                self.min_rating,
                self.max_rating,
            ));
        }

        if let Some(since) = &self.since {
            match parse_since(since) {
                Some(from) => parts.push(Filter::DateRange {
                    from: Some(from),
                    to: None,
                }),
                None => warn!("ignoring unparseable --since value: {since}"),
            }
        }

        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Filter::And(parts)),
        }
    }
}

/// Parses a calendar date or an RFC 3339 timestamp.
fn parse_since(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Arguments for `coursa search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Search terms; may be omitted when filters are given
    pub query: Vec<String>,

    #[command(flatten)]
    /// Structured filters.
    pub filters: FilterArgs,

    /// Restrict matching to these fields (repeatable) [default: all]
    #[arg(long = "in", value_enum)]
    pub fields: Vec<SearchField>,

    /// Result order: relevance, rating, duration, recent, title
    #[arg(short = 'o', long, default_value = "relevance")]
    pub order: String,

    /// Page number, starting at 1
    #[arg(short = 'p', long, default_value = "1")]
    pub page: usize,

    /// User whose likes and views are shown
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Recommendation strategy.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Content and collaborative blend, popularity during cold start
    #[default]
    Hybrid,
    /// Profile similarity only
    Content,
    /// Item similarity only
    Collaborative,
}

/// Arguments for `coursa recommend`.
#[derive(Args, Debug, Clone)]
pub struct RecommendCommand {
    /// User to recommend for
    #[arg(short = 'u', long)]
    pub user: String,

    /// Number of recommendations [default: settings.default_limit]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Recommendation strategy
    #[arg(short = 's', long, value_enum, default_value_t)]
    pub strategy: Strategy,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `coursa popular`.
#[derive(Args, Debug, Clone)]
pub struct PopularCommand {
    /// Number of courses [default: settings.default_limit]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `coursa interact`.
#[derive(Args, Debug, Clone)]
pub struct InteractCommand {
    /// Acting user
    #[arg(short = 'u', long)]
    pub user: String,

    /// Course URL
    #[arg(short = 'c', long)]
    pub course: String,

    /// Action: like, dislike or view
    #[arg(value_parser = parse_action)]
    pub action: Action,
}

/// Arguments for `coursa ingest`.
#[derive(Args, Debug, Clone)]
pub struct IngestCommand {
    /// JSON file holding an array of course records
    pub file: PathBuf,
}

/// Arguments for `coursa init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.coursa.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `coursa` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize coursa configuration in current directory
    Init(InitCommand),

    /// Validate configuration and diagnose issues
    Check,

    /// Show configuration, catalog and index status
    Status,

    /// Show effective configuration settings
    Config,

    /// Ingest scraped course records from a JSON file
    Ingest(IngestCommand),

    /// Rebuild the search index from stored courses
    Reindex,

    /// Rebuild the feature and similarity caches
    Precompute,

    /// Search courses by text and filters
    Search(SearchCommand),

    /// Recommend courses for a user
    Recommend(RecommendCommand),

    /// List the most popular courses
    Popular(PopularCommand),

    /// Record a like, dislike or view
    Interact(InteractCommand),
}

impl Commands {
    /// Whether the command needs a parsed configuration.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Self::Init(_))
    }
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_flags_means_no_filter() {
        assert_eq!(FilterArgs::default().to_filter(), None);
    }

    #[test]
    fn facet_values_are_alternatives() {
        let args = FilterArgs {
            category: vec!["Data".to_string(), "Art".to_string()],
            ..Default::default()
        };
        assert_eq!(
            args.to_filter(),
            Some(Filter::any_of(Facet::Category, &["Data", "Art"]))
        );
    }

    #[test]
    fn facets_and_ranges_combine() {
        let args = FilterArgs {
            level: vec!["beginner".to_string()],
            min_rating: Some(4.0),
            ..Default::default()
        };
        let Some(Filter::And(parts)) = args.to_filter() else {
            panic!("expected a conjunction");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[1],
            Filter::range(NumericField::Rating, Some(4.0), None)
        );
    }

    #[test]
    fn since_accepts_dates_and_timestamps() {
        let date = parse_since("2024-03-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        let ts = parse_since("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T10:30:00+00:00");
        assert_eq!(parse_since("last week"), None);
    }

    #[test]
    fn bad_since_is_ignored() {
        let args = FilterArgs {
            since: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert_eq!(args.to_filter(), None);
    }
}
