//! Document type for indexing.
//!
//! A [`CourseDocument`] is the denormalized search view of one course: text fields
//! copied from the course record plus the facet and numeric values used by filters.

use chrono::{DateTime, Utc};
use tantivy::{DateTime as IndexDate, TantivyDocument};

use crate::schema::IndexSchema;

/// A course ready for indexing, keyed by its source URL.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDocument {
    /// Course source URL.
    pub url: String,
    /// Course title.
    pub title: String,
    /// Course description (empty when unknown).
    pub description: String,
    /// Keywords, most salient first.
    pub keywords: Vec<String>,
    /// Category name.
    pub category: Option<String>,
    /// Level name.
    pub level: Option<String>,
    /// Platform name.
    pub platform: Option<String>,
    /// Instructor name.
    pub instructor: Option<String>,
    /// Duration in hours.
    pub duration: Option<f64>,
    /// Rating in [0, 5].
    pub rating: Option<f64>,
    /// Last scrape time.
    pub last_scraped: DateTime<Utc>,
}

impl CourseDocument {
    /// Converts the document into a Tantivy document for the given schema.
    ///
    /// Facet values are lowercased so filters match case-insensitively; absent
    /// optional values are simply left out.
    pub(crate) fn to_tantivy(&self, schema: &IndexSchema) -> TantivyDocument {
        let mut doc = TantivyDocument::new();

        doc.add_text(schema.url, &self.url);
        doc.add_text(schema.title, &self.title);
        doc.add_text(schema.description, &self.description);
        doc.add_text(schema.keywords, self.keywords.join(","));

        let facets = [
            (schema.category, &self.category),
            (schema.level, &self.level),
            (schema.platform, &self.platform),
            (schema.instructor, &self.instructor),
        ];
        for (field, value) in facets {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                doc.add_text(field, value.to_lowercase());
            }
        }

        if let Some(duration) = self.duration {
            doc.add_f64(schema.duration, duration);
        }
        if let Some(rating) = self.rating {
            doc.add_f64(schema.rating, rating);
        }
        doc.add_date(schema.last_scraped, to_tantivy_date(self.last_scraped));

        doc
    }
}

/// Converts a chrono timestamp to a Tantivy date (second precision).
pub(crate) fn to_tantivy_date(time: DateTime<Utc>) -> IndexDate {
    IndexDate::from_timestamp_secs(time.timestamp())
}

/// Converts a Tantivy date back to a chrono timestamp.
pub(crate) fn from_tantivy_date(time: IndexDate) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.into_timestamp_secs(), 0)
}
