//! Text analysis pipeline for course titles, descriptions and keywords.
//!
//! Implements a four-stage text analysis pipeline:
//! 1. `SimpleTokenizer` - splits on whitespace and punctuation (commas included,
//!    so the comma-joined keyword list tokenizes naturally)
//! 2. `LowerCaser` - converts tokens to lowercase
//! 3. `RemoveLongFilter` - removes tokens longer than 40 bytes
//! 4. `Stemmer` - applies language-specific stemming
//!
//! The stemmer language is configurable via the `stemmer` setting in `.coursa.toml`.

use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, TextAnalyzer,
};

use crate::IndexError;

/// Name of the custom tokenizer registered with Tantivy.
pub const COURSE_TOKENIZER: &str = "course_text";

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Parses a stemmer language string into a Tantivy `Language`.
pub fn parse_language(name: &str) -> Result<Language, IndexError> {
    match name.to_lowercase().as_str() {
        "arabic" => Ok(Language::Arabic),
        "danish" => Ok(Language::Danish),
        "dutch" => Ok(Language::Dutch),
        "english" => Ok(Language::English),
        "finnish" => Ok(Language::Finnish),
        "french" => Ok(Language::French),
        "german" => Ok(Language::German),
        "greek" => Ok(Language::Greek),
        "hungarian" => Ok(Language::Hungarian),
        "italian" => Ok(Language::Italian),
        "norwegian" => Ok(Language::Norwegian),
        "portuguese" => Ok(Language::Portuguese),
        "romanian" => Ok(Language::Romanian),
        "russian" => Ok(Language::Russian),
        "spanish" => Ok(Language::Spanish),
        "swedish" => Ok(Language::Swedish),
        "tamil" => Ok(Language::Tamil),
        "turkish" => Ok(Language::Turkish),
        other => Err(IndexError::InvalidLanguage(other.to_string())),
    }
}

/// Builds the course text analyzer with the specified stemmer language.
pub fn build_analyzer(language: Language) -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
        .filter(Stemmer::new(language))
        .build()
}

/// Builds the course text analyzer from a language name string.
pub fn build_analyzer_from_name(language_name: &str) -> Result<TextAnalyzer, IndexError> {
    let language = parse_language(language_name)?;
    Ok(build_analyzer(language))
}

#[cfg(test)]
mod test {
    use std::iter;

    use tantivy::tokenizer::TokenStream;

    use super::*;

    fn tokens(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
        let mut stream = analyzer.token_stream(text);
        iter::from_fn(|| stream.next().map(|t| t.text.clone())).collect()
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(parse_language("English").unwrap(), Language::English);
        assert_eq!(parse_language("SPANISH").unwrap(), Language::Spanish);
    }

    #[test]
    fn parse_invalid_language() {
        let err = parse_language("klingon").unwrap_err();
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn analyzer_lowercases_and_stems() {
        let mut analyzer = build_analyzer(Language::English);
        assert_eq!(tokens(&mut analyzer, "Machine LEARNING"), vec!["machin", "learn"]);
    }

    #[test]
    fn analyzer_splits_comma_joined_keywords() {
        let mut analyzer = build_analyzer(Language::English);
        assert_eq!(
            tokens(&mut analyzer, "python,pandas,numpy"),
            vec!["python", "panda", "numpi"]
        );
    }

    #[test]
    fn analyzer_removes_long_tokens() {
        let mut analyzer = build_analyzer(Language::English);
        let text = format!("short {} word", "a".repeat(50));
        assert_eq!(tokens(&mut analyzer, &text), vec!["short", "word"]);
    }
}
