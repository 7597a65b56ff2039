//! Corpus-wide inverse document frequency statistics.
//!
//! The table is rebuilt from the full course corpus after every ingestion batch
//! and may be stale between rebuilds.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{Stopwords, tokenize};

/// Trait for providing IDF values for terms.
///
/// This abstraction allows the extractor to work with different IDF sources,
/// such as a freshly computed table or a cached one.
pub trait IdfProvider {
    /// Returns the IDF value for a term.
    ///
    /// Returns `None` when no corpus statistics are available at all, in which
    /// case the extractor falls back to plain term frequency.
    fn idf(&self, term: &str) -> Option<f64>;
}

/// Document frequencies over a corpus of course texts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdfTable {
    /// Number of documents in the corpus.
    documents: usize,
    /// Number of documents containing each term.
    document_counts: HashMap<String, usize>,
}

impl IdfTable {
    /// Computes document frequencies over `(title, description)` pairs.
    pub fn compute<'a, I>(corpus: I, stopwords: &Stopwords) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = Self::default();
        for (title, description) in corpus {
            table.documents += 1;
            let unique: HashSet<String> = tokenize(title, description, stopwords).collect();
            for term in unique {
                *table.document_counts.entry(term).or_insert(0) += 1;
            }
        }
        table
    }

    /// Number of documents the table was computed from.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Number of documents containing `term`.
    pub fn document_count(&self, term: &str) -> usize {
        self.document_counts.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.document_counts.len()
    }

    /// Returns true if the table was computed from an empty corpus.
    pub fn is_empty(&self) -> bool {
        self.documents == 0
    }
}

impl IdfProvider for IdfTable {
    /// `ln(N / (1 + document_count(term)))`.
    fn idf(&self, term: &str) -> Option<f64> {
        if self.documents == 0 {
            return None;
        }
        let df = self.document_count(term) as f64;
        Some((self.documents as f64 / (1.0 + df)).ln())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn corpus() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Python for Data Analysis", "pandas and numpy with python"),
            ("Watercolor Painting", "brushes and pigments"),
            ("Deep Learning with Python", "neural networks"),
            ("Oil Painting", "canvas"),
        ]
    }

    #[test]
    fn counts_documents_not_occurrences() {
        let table = IdfTable::compute(corpus(), &Stopwords::new());
        assert_eq!(table.documents(), 4);
        // "python" appears three times but in two documents
        assert_eq!(table.document_count("python"), 2);
        assert_eq!(table.document_count("painting"), 2);
        assert_eq!(table.document_count("canvas"), 1);
        assert_eq!(table.document_count("missing"), 0);
    }

    #[test]
    fn idf_formula() {
        let table = IdfTable::compute(corpus(), &Stopwords::new());
        let expected = (4.0_f64 / 2.0).ln();
        assert!((table.idf("canvas").unwrap() - expected).abs() < 1e-12);

        let unseen = (4.0_f64 / 1.0).ln();
        assert!((table.idf("rust").unwrap() - unseen).abs() < 1e-12);
    }

    #[test]
    fn rarer_terms_have_higher_idf() {
        let table = IdfTable::compute(corpus(), &Stopwords::new());
        assert!(table.idf("canvas").unwrap() > table.idf("python").unwrap());
    }

    #[test]
    fn empty_table_has_no_idf() {
        let table = IdfTable::default();
        assert!(table.is_empty());
        assert_eq!(table.idf("python"), None);
    }

    #[test]
    fn survives_serialization() {
        let table = IdfTable::compute(corpus(), &Stopwords::new());
        let json = serde_json::to_string(&table).unwrap();
        let back: IdfTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
