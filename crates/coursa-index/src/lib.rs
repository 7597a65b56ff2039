//! Tantivy-based course search index for coursa.
//!
//! This crate owns everything between a normalized course record and a ranked
//! list of matching URLs:
//! - Conversion of courses into index documents
//! - Index creation, upsert-by-URL writes and atomic batch commits
//! - Structured filters (facets, numeric and date ranges, boolean composition)
//! - BM25 search with per-field weights, ordering and paging
//! - Index location and configuration hash tracking
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use coursa_index::{CourseDocument, IndexWriter, Searcher};
//!
//! let mut writer = IndexWriter::open("./index".as_ref(), "english").unwrap();
//! writer
//!     .commit_batch(&[CourseDocument {
//!         url: "https://example.com/ml".to_string(),
//!         title: "Intro to Machine Learning".to_string(),
//!         description: String::new(),
//!         keywords: vec![],
//!         category: Some("Data".to_string()),
//!         level: None,
//!         platform: None,
//!         instructor: None,
//!         duration: Some(12.0),
//!         rating: Some(4.5),
//!         last_scraped: Utc::now(),
//!     }])
//!     .unwrap();
//!
//! let searcher = Searcher::open("./index".as_ref(), "english").unwrap();
//! let hits = searcher.search_ranked("machine learning", &[], None, 10).unwrap();
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config_hash;
mod document;
mod error;
mod location;
mod query;
mod schema;
mod search;
mod status;
mod writer;

pub use analyzer::{COURSE_TOKENIZER, build_analyzer, build_analyzer_from_name, parse_language};
pub use config_hash::{IndexingConfig, SCHEMA_VERSION, compute_config_hash};
pub use document::CourseDocument;
pub use error::IndexError;
pub use location::{config_hash_path, index_directory};
pub use query::{Facet, Filter, NumericField};
pub use schema::IndexSchema;
pub use search::{
    DEFAULT_PER_PAGE, SearchHit, SearchPage, SearchRequest, Searcher, SortOrder, TextField,
};
pub use status::{
    IndexStatus, detect_index_status, index_exists, read_stored_hash, write_config_hash,
};
pub use writer::IndexWriter;
