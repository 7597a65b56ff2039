//! Structured filter expressions and their compilation to Tantivy queries.
//!
//! Filters compose as a boolean tree: facet terms, inclusive numeric and date
//! ranges, and `And` / `Or` / `Not` nodes. Free text is handled separately by the
//! searcher; a filter only restricts the candidate set and never contributes to
//! relevance.

use std::ops::Bound;

use chrono::{DateTime, Utc};
use tantivy::{
    Term,
    query::{AllQuery, BooleanQuery, Occur, Query, RangeQuery, TermQuery},
    schema::{Field, IndexRecordOption},
};

use crate::{
    document::to_tantivy_date,
    schema::{IndexSchema, names},
};

/// Highest rating a course can carry.
const MAX_RATING: f64 = 5.0;

/// Categorical fields matched by exact, case-insensitive term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    /// Course category.
    Category,
    /// Course level.
    Level,
    /// Hosting platform.
    Platform,
    /// Instructor name.
    Instructor,
}

impl Facet {
    /// Returns the schema field for this facet.
    fn field(self, schema: &IndexSchema) -> Field {
        match self {
            Self::Category => schema.category,
            Self::Level => schema.level,
            Self::Platform => schema.platform,
            Self::Instructor => schema.instructor,
        }
    }
}

/// Numeric fields that accept range filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    /// Duration in hours.
    Duration,
    /// Rating in [0, 5].
    Rating,
}

impl NumericField {
    /// Schema field name.
    fn name(self) -> &'static str {
        match self {
            Self::Duration => names::DURATION,
            Self::Rating => names::RATING,
        }
    }
}

/// A structured filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact facet match.
    Term {
        /// Facet to match.
        facet: Facet,
        /// Value, compared case-insensitively.
        value: String,
    },
    /// Inclusive numeric range; a missing bound is open.
    NumericRange {
        /// Field to restrict.
        field: NumericField,
        /// Lower bound.
        min: Option<f64>,
        /// Upper bound.
        max: Option<f64>,
    },
    /// Inclusive range over the last-scraped timestamp.
    DateRange {
        /// Earliest time.
        from: Option<DateTime<Utc>>,
        /// Latest time.
        to: Option<DateTime<Utc>>,
    },
    /// All children must match.
    And(Vec<Filter>),
    /// At least one child must match.
    Or(Vec<Filter>),
    /// The child must not match.
    Not(Box<Filter>),
}

impl Filter {
    /// Creates a facet term filter.
    pub fn term(facet: Facet, value: impl Into<String>) -> Self {
        Self::Term {
            facet,
            value: value.into(),
        }
    }

    /// Creates a facet filter matching any of `values`.
    pub fn any_of<S: AsRef<str>>(facet: Facet, values: &[S]) -> Self {
        Self::Or(
            values
                .iter()
                .map(|v| Self::term(facet, v.as_ref()))
                .collect(),
        )
    }

    /// Creates a numeric range filter.
    pub fn range(field: NumericField, min: Option<f64>, max: Option<f64>) -> Self {
        Self::NumericRange { field, min, max }
    }

    /// Negates a filter.
    pub fn negate(filter: Self) -> Self {
        Self::Not(Box::new(filter))
    }

    /// Drops the parts of the filter that cannot be satisfied meaningfully.
    ///
    /// Empty facet values, NaN bounds, inverted ranges and empty groups are
    /// removed; rating bounds are clamped into [0, 5]. Returns `None` when nothing
    /// restrictive is left.
    pub fn sanitize(self) -> Option<Self> {
        match self {
            Self::Term { facet, value } => {
                let value = value.trim();
                (!value.is_empty()).then(|| Self::term(facet, value))
            }
            Self::NumericRange { field, min, max } => {
                let clamp = |v: f64| match field {
                    NumericField::Rating => v.clamp(0.0, MAX_RATING),
                    NumericField::Duration => v,
                };
                let min = min.filter(|v| !v.is_nan()).map(clamp);
                let max = max.filter(|v| !v.is_nan()).map(clamp);
                match (min, max) {
                    (None, None) => None,
                    (Some(lo), Some(hi)) if lo > hi => None,
                    _ => Some(Self::NumericRange { field, min, max }),
                }
            }
            Self::DateRange { from, to } => match (from, to) {
                (None, None) => None,
                (Some(from), Some(to)) if from > to => None,
                _ => Some(Self::DateRange { from, to }),
            },
            Self::And(children) => Self::sanitize_group(children, Self::And),
            Self::Or(children) => Self::sanitize_group(children, Self::Or),
            Self::Not(child) => child.sanitize().map(Self::negate),
        }
    }

    /// Sanitizes every child, collapsing single-element groups.
    fn sanitize_group(children: Vec<Self>, make: fn(Vec<Self>) -> Self) -> Option<Self> {
        let mut kept: Vec<Self> = children.into_iter().filter_map(Self::sanitize).collect();
        match kept.len() {
            0 => None,
            1 => kept.pop(),
            _ => Some(make(kept)),
        }
    }

    /// Compiles the filter into a Tantivy query.
    pub(crate) fn compile(&self, schema: &IndexSchema) -> Box<dyn Query> {
        match self {
            Self::Term { facet, value } => {
                let term = Term::from_field_text(facet.field(schema), &value.to_lowercase());
                Box::new(TermQuery::new(term, IndexRecordOption::Basic))
            }
            Self::NumericRange { field, min, max } => Box::new(RangeQuery::new_f64_bounds(
                field.name().to_string(),
                inclusive(*min),
                inclusive(*max),
            )),
            Self::DateRange { from, to } => Box::new(RangeQuery::new_date_bounds(
                names::LAST_SCRAPED.to_string(),
                inclusive(from.map(to_tantivy_date)),
                inclusive(to.map(to_tantivy_date)),
            )),
            Self::And(children) => Box::new(BooleanQuery::new(
                children
                    .iter()
                    .map(|c| (Occur::Must, c.compile(schema)))
                    .collect(),
            )),
            Self::Or(children) => Box::new(BooleanQuery::new(
                children
                    .iter()
                    .map(|c| (Occur::Should, c.compile(schema)))
                    .collect(),
            )),
            // A purely negative boolean query matches nothing, so anchor it on all docs
            Self::Not(child) => Box::new(BooleanQuery::new(vec![
                (Occur::Must, Box::new(AllQuery) as Box<dyn Query>),
                (Occur::MustNot, child.compile(schema)),
            ])),
        }
    }
}

/// Maps an optional bound to an inclusive range bound.
fn inclusive<T>(value: Option<T>) -> Bound<T> {
    value.map_or(Bound::Unbounded, Bound::Included)
}
