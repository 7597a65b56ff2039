//! Keyword extraction for coursa.
//!
//! Turns a course's free text into a ranked list of salient terms. Text is
//! lowercased, anything that is not an ASCII letter becomes whitespace, and
//! stopwords and tokens of two characters or fewer are dropped. The remaining
//! terms are scored by term frequency times corpus IDF.

#![warn(missing_docs)]

mod extract;
mod idf;
mod stopwords;

pub use extract::{KeywordExtractor, ScoredKeyword, extract_keywords};
pub use idf::{IdfProvider, IdfTable};
pub use stopwords::Stopwords;

/// Tokens of this length or shorter are dropped.
const MAX_DROPPED_LENGTH: usize = 2;

/// Tokenizes a title and description into candidate keyword terms.
///
/// Terms are yielded in text order; duplicates are preserved.
pub fn tokenize<'a>(
    title: &str,
    description: &str,
    stopwords: &'a Stopwords,
) -> impl Iterator<Item = String> + 'a {
    let text = clean_text(&format!("{title} {description}"));
    text.split_whitespace()
        .map(str::to_string)
        .filter(move |t| t.len() > MAX_DROPPED_LENGTH && !stopwords.contains(t))
        .collect::<Vec<_>>()
        .into_iter()
}

/// Lowercases text and replaces every non-letter character with a space.
fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() { c } else { ' ' })
        .collect()
}
