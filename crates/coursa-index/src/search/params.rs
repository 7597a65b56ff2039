//! Parameter types for search execution.

use std::{cmp::Ordering, convert::Infallible, fmt, str::FromStr};

use crate::query::Filter;

use super::types::SearchHit;

/// Default number of hits per page.
pub const DEFAULT_PER_PAGE: usize = 20;

/// Full-text fields a query can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    /// Course title.
    Title,
    /// Course description.
    Description,
    /// Keyword list.
    Keywords,
}

impl TextField {
    /// All text fields, searched when a request names none.
    pub const ALL: [Self; 3] = [Self::Title, Self::Description, Self::Keywords];
}

/// Result ordering for paged search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Relevance score, best first.
    #[default]
    Relevance,
    /// Rating, highest first; unrated courses last.
    Rating,
    /// Duration, shortest first; courses without a duration last.
    Duration,
    /// Most recently scraped first.
    Recent,
    /// Title, alphabetically.
    Title,
}

impl SortOrder {
    /// Parses an order key, falling back to relevance for unknown keys.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "rating" => Self::Rating,
            "duration" => Self::Duration,
            "recent" | "newest" => Self::Recent,
            "title" => Self::Title,
            _ => Self::Relevance,
        }
    }

    /// Sorts hits in place. The sort is stable, so ties keep relevance order.
    pub(crate) fn sort(self, hits: &mut [SearchHit]) {
        match self {
            Self::Relevance => hits.sort_by(|a, b| b.score.total_cmp(&a.score)),
            Self::Rating => hits.sort_by(|a, b| missing_last(a.rating, b.rating, |x, y| y.total_cmp(&x))),
            Self::Duration => {
                hits.sort_by(|a, b| missing_last(a.duration, b.duration, |x, y| x.total_cmp(&y)));
            }
            Self::Recent => hits.sort_by(|a, b| b.last_scraped.cmp(&a.last_scraped)),
            Self::Title => hits.sort_by_cached_key(|h| h.title.to_lowercase()),
        }
    }
}

impl FromStr for SortOrder {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_key(s))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            Self::Relevance => "relevance",
            Self::Rating => "rating",
            Self::Duration => "duration",
            Self::Recent => "recent",
            Self::Title => "title",
        };
        f.write_str(key)
    }
}

/// Orders present values with `cmp` and puts missing values after them.
fn missing_last(a: Option<f64>, b: Option<f64>, cmp: impl Fn(f64, f64) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A paged search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Free-text query; may be empty when a filter is given.
    pub text: String,
    /// Fields the text is matched against. Empty means all text fields.
    pub fields: Vec<TextField>,
    /// Structured filter.
    pub filter: Option<Filter>,
    /// Result ordering.
    pub order: SortOrder,
    /// 1-based page number; 0 is treated as 1.
    pub page: usize,
    /// Hits per page.
    pub per_page: usize,
}

impl SearchRequest {
    /// Creates a request for the first page of `text` ordered by relevance.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fields: Vec::new(),
            filter: None,
            order: SortOrder::Relevance,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Sets the structured filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Restricts matching to the given text fields.
    pub fn with_fields(mut self, fields: Vec<TextField>) -> Self {
        self.fields = fields;
        self
    }

    /// Sets the result ordering.
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the page number and page size.
    pub fn with_page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    /// Effective 1-based page number.
    pub(crate) fn effective_page(&self) -> usize {
        self.page.max(1)
    }

    /// Effective page size.
    pub(crate) fn effective_per_page(&self) -> usize {
        self.per_page.max(1)
    }
}
