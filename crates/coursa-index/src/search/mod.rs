//! Search execution for the course index.
//!
//! The [`Searcher`] answers two kinds of request:
//!
//! - [`Searcher::search_ranked`]: the top `limit` hits by BM25 relevance, with
//!   per-field weights and an optional structured filter.
//! - [`Searcher::search`]: every match, ordered by a [`SortOrder`] and cut into
//!   1-based pages.
//!
//! Free text is parsed with Tantivy's query parser; clauses across fields combine
//! with OR. Filters restrict the candidate set without changing scores. A query the
//! parser rejects never surfaces as an error: depending on the configured
//! [`SearchFallback`] it degrades to a case-insensitive substring match against
//! title and description, or to no results.

mod execute;
mod params;
mod types;

use std::path::Path;

use coursa_config::{FieldWeights, SearchFallback, SearchSettings};
pub use params::{DEFAULT_PER_PAGE, SearchRequest, SortOrder, TextField};
use tantivy::{Index, directory::MmapDirectory, schema::Field};
pub use types::{SearchHit, SearchPage};

use crate::{
    IndexError,
    analyzer::{COURSE_TOKENIZER, build_analyzer_from_name},
    schema::IndexSchema,
};

/// Primary search entry point for the index.
pub struct Searcher {
    /// Tantivy index handle used for searching.
    pub(crate) index: Index,
    /// Schema describing indexed fields.
    pub(crate) schema: IndexSchema,
    /// Per-field relevance weights.
    pub(crate) weights: FieldWeights,
    /// Behavior when a query cannot be parsed.
    pub(crate) fallback: SearchFallback,
}

impl Searcher {
    /// Opens an existing index with default weights and substring fallback.
    pub fn open(path: &Path, language: &str) -> Result<Self, IndexError> {
        if !path.join("meta.json").exists() {
            return Err(IndexError::OpenIndex {
                path: path.to_path_buf(),
                message: "index does not exist".to_string(),
            });
        }

        let schema = IndexSchema::new();

        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: tantivy::TantivyError = e.into();
            IndexError::open_index(path.to_path_buf(), &err)
        })?;

        let index = Index::open(dir).map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        let analyzer = build_analyzer_from_name(language)?;
        index.tokenizers().register(COURSE_TOKENIZER, analyzer);

        Ok(Self {
            index,
            schema,
            weights: FieldWeights::default(),
            fallback: SearchFallback::default(),
        })
    }

    /// Opens an existing index using the search settings from configuration.
    pub fn open_with_settings(path: &Path, settings: &SearchSettings) -> Result<Self, IndexError> {
        Ok(Self::open(path, &settings.stemmer)?
            .with_weights(settings.field_weights())
            .with_fallback(settings.fallback_mode()))
    }

    /// Sets the per-field relevance weights.
    pub fn with_weights(mut self, weights: FieldWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the behavior for unparseable queries.
    pub fn with_fallback(mut self, fallback: SearchFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Returns the number of documents currently visible to searches.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        let reader = self.index.reader().map_err(|e| IndexError::search(&e))?;
        Ok(reader.searcher().num_docs())
    }

    /// Resolves a text field to its schema field and configured weight.
    fn field_and_weight(&self, field: TextField) -> (Field, f32) {
        match field {
            TextField::Title => (self.schema.title, self.weights.title),
            TextField::Description => (self.schema.description, self.weights.description),
            TextField::Keywords => (self.schema.keywords, self.weights.keywords),
        }
    }
}
