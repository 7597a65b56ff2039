//! Index schema definition for the course search index.
//!
//! Defines the Tantivy schema with all fields needed for course search:
//! - `url`: Unique course key (string, stored)
//! - `title`, `description`: Full text (stored)
//! - `keywords`: Comma-joined keyword list (full text, stored for display)
//! - `category`, `level`, `platform`, `instructor`: Lowercased exact facet terms
//! - `duration`, `rating`: Numeric, range-queryable
//! - `last_scraped`: Date, range-queryable

use tantivy::schema::{
    DateOptions, Field, IndexRecordOption, NumericOptions, STORED, STRING, Schema, TextFieldIndexing,
    TextOptions,
};

use crate::analyzer::COURSE_TOKENIZER;

/// Field names shared between the schema and range queries.
pub mod names {
    /// Duration in hours.
    pub const DURATION: &str = "duration";
    /// Rating in [0, 5].
    pub const RATING: &str = "rating";
    /// Last time the course was scraped.
    pub const LAST_SCRAPED: &str = "last_scraped";
}

/// Handles to all fields in the index schema.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    /// The underlying Tantivy schema.
    schema: Schema,
    /// Course source URL; the natural key.
    pub url: Field,
    /// Course title.
    pub title: Field,
    /// Course description.
    pub description: Field,
    /// Comma-joined keyword list.
    pub keywords: Field,
    /// Category name, lowercased.
    pub category: Field,
    /// Level name, lowercased.
    pub level: Field,
    /// Platform name, lowercased.
    pub platform: Field,
    /// Instructor name, lowercased.
    pub instructor: Field,
    /// Duration in hours.
    pub duration: Field,
    /// Rating.
    pub rating: Field,
    /// Last scrape time.
    pub last_scraped: Field,
}

impl IndexSchema {
    /// Creates a new index schema with all fields configured.
    pub fn new() -> Self {
        let mut builder = Schema::builder();

        let url = builder.add_text_field("url", STRING | STORED);

        let text_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(COURSE_TOKENIZER)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();
        let title = builder.add_text_field("title", text_options.clone());
        let description = builder.add_text_field("description", text_options.clone());
        let keywords = builder.add_text_field("keywords", text_options);

        // Facets: single raw token, matched exactly after lowercasing both sides
        let category = builder.add_text_field("category", STRING);
        let level = builder.add_text_field("level", STRING);
        let platform = builder.add_text_field("platform", STRING);
        let instructor = builder.add_text_field("instructor", STRING);

        // Numeric fields are stored so results can be ordered without a storage round trip
        let numeric_options = NumericOptions::default()
            .set_indexed()
            .set_fast()
            .set_stored();
        let duration = builder.add_f64_field(names::DURATION, numeric_options.clone());
        let rating = builder.add_f64_field(names::RATING, numeric_options);

        let date_options = DateOptions::default().set_indexed().set_fast().set_stored();
        let last_scraped = builder.add_date_field(names::LAST_SCRAPED, date_options);

        let schema = builder.build();

        Self {
            schema,
            url,
            title,
            description,
            keywords,
            category,
            level,
            platform,
            instructor,
            duration,
            rating,
            last_scraped,
        }
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::new()
    }
}
