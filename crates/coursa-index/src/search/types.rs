//! Search result types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single matching course as read back from the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Course URL; resolves the hit against storage.
    pub url: String,
    /// Stored title.
    pub title: String,
    /// Stored description.
    pub description: String,
    /// Stored keywords.
    pub keywords: Vec<String>,
    /// Relevance score. Constant for filter-only and fallback matches.
    pub score: f32,
    /// Rating, if known.
    pub rating: Option<f64>,
    /// Duration in hours, if known.
    pub duration: Option<f64>,
    /// Last scrape time.
    pub last_scraped: Option<DateTime<Utc>>,
}

#[cfg(test)]
impl SearchHit {
    /// Builds a hit with only a title, for ordering tests.
    pub(crate) fn stub(title: &str) -> Self {
        Self {
            url: format!("https://example.com/{title}"),
            title: title.to_string(),
            description: String::new(),
            keywords: Vec::new(),
            score: 0.0,
            rating: None,
            duration: None,
            last_scraped: None,
        }
    }
}

/// One page of ordered search hits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    /// Hits on this page.
    pub hits: Vec<SearchHit>,
    /// Total number of matching courses across all pages.
    pub total: usize,
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub per_page: usize,
}

impl SearchPage {
    /// An empty first page.
    pub fn empty(per_page: usize) -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
            page: 1,
            per_page,
        }
    }

    /// Total number of pages.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.per_page.max(1))
    }
}
