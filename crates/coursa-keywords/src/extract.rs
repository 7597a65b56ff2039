//! Corpus-aware TF-IDF keyword extraction.
//!
//! Terms that are frequent in a course's title and description but rare across the
//! corpus get the highest scores. The score formula is `frequency × idf`; without
//! corpus statistics every term has an IDF of 1.0 and ranking is by frequency alone.

use std::{cmp::Ordering, collections::HashMap};

use crate::{IdfProvider, Stopwords, tokenize};

/// A keyword with its TF-IDF score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredKeyword {
    /// The keyword.
    pub term: String,
    /// Term frequency times IDF.
    pub score: f64,
}

/// Corpus-aware TF-IDF keyword extractor.
pub struct KeywordExtractor<'a, P: IdfProvider> {
    /// Provider for IDF values from the corpus.
    idf_provider: &'a P,
    /// Stopwords to filter out.
    stopwords: &'a Stopwords,
    /// Maximum number of keywords returned.
    top_n: usize,
}

impl<'a, P: IdfProvider> KeywordExtractor<'a, P> {
    /// Creates a new extractor returning at most `top_n` keywords.
    pub fn new(idf_provider: &'a P, stopwords: &'a Stopwords, top_n: usize) -> Self {
        Self {
            idf_provider,
            stopwords,
            top_n,
        }
    }

    /// Extracts keywords from a title and description, most salient first.
    pub fn extract(&self, title: &str, description: &str) -> Vec<String> {
        self.extract_scored(title, description)
            .into_iter()
            .map(|k| k.term)
            .collect()
    }

    /// Extracts keywords with their scores, most salient first.
    ///
    /// Ties keep the order in which terms first appear in the text.
    pub fn extract_scored(&self, title: &str, description: &str) -> Vec<ScoredKeyword> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, u32> = HashMap::new();

        for token in tokenize(title, description, self.stopwords) {
            let count = counts.entry(token.clone()).or_insert(0);
            if *count == 0 {
                order.push(token);
            }
            *count += 1;
        }

        let mut scored: Vec<ScoredKeyword> = order
            .into_iter()
            .map(|term| {
                let tf = f64::from(counts.get(&term).copied().unwrap_or(0));
                let idf = self.idf_provider.idf(&term).unwrap_or(1.0);
                ScoredKeyword {
                    term,
                    score: tf * idf,
                }
            })
            .collect();

        // Stable sort: equal scores stay in first-appearance order
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(self.top_n);
        scored
    }
}

/// Extracts at most `top_n` keywords from a title and description.
pub fn extract_keywords<P: IdfProvider>(
    title: &str,
    description: &str,
    idf: &P,
    stopwords: &Stopwords,
    top_n: usize,
) -> Vec<String> {
    KeywordExtractor::new(idf, stopwords, top_n).extract(title, description)
}
