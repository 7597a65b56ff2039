//! Stopword filtering for keyword extraction.
//!
//! This module provides stopword detection combining:
//! - Standard English stopwords from the `stop-words` crate
//! - Words that appear in almost every course listing ("course", "certificate", ...)
//! - Extra words supplied through configuration
//!
//! The set is built once and never mutated afterwards; callers pass it to the
//! extractor explicitly.

use std::collections::HashSet;

use stop_words::LANGUAGE;

/// An immutable stopword filter.
///
/// Uses a `HashSet` for O(1) lookup performance. All words are stored in
/// lowercase for case-insensitive matching.
#[derive(Debug, Clone)]
pub struct Stopwords {
    /// Lowercased stopwords.
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwords {
    /// Creates a stopword filter with the English and course-domain lists.
    pub fn new() -> Self {
        Self::with_extra(&[] as &[&str])
    }

    /// Creates a stopword filter with the built-in lists plus `extra` words.
    pub fn with_extra<S: AsRef<str>>(extra: &[S]) -> Self {
        let mut words: HashSet<String> = HashSet::new();

        let mut add_words = |slice: &[&str]| {
            for word in slice {
                words.insert(word.to_ascii_lowercase());
            }
        };

        add_words(stop_words::get(LANGUAGE::English));
        add_words(COURSE_STOPWORDS);

        for word in extra {
            words.insert(word.as_ref().to_lowercase());
        }

        Self { words }
    }

    /// Checks if a term is a stopword.
    ///
    /// The check is case-insensitive for ASCII characters.
    pub fn contains(&self, term: &str) -> bool {
        let lower = term.to_ascii_lowercase();
        self.words.contains(&lower)
    }

    /// Returns the total number of stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no stopwords are configured.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Words common to nearly every course listing that say nothing about its content.
static COURSE_STOPWORDS: &[&str] = &[
    "course", "learn", "program", "certification", "certificate", "online", "introduction",
    "specialization", "professional", "development", "fundamentals", "basics", "free", "enroll",
    "foundational", "career", "beginner", "advanced", "intermediate", "study", "module", "topic",
    "topics", "week", "weeks", "duration", "available", "upcoming", "upskill", "path", "skills",
    "skill", "level", "including", "knowledge", "understanding", "ability", "abilities",
    "concepts", "intended", "audience", "build", "building", "practical", "theory", "hands",
    "projects", "project", "work", "works", "real", "world", "case", "cases", "basic", "part",
    "parts", "intros", "intro", "become",
];
