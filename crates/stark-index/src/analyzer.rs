//! Text analysis pipeline for the stark retrieval index.
//!
//! Titles, queries and rendered product documents all pass through the same analyzer:
//! 1. `SimpleTokenizer` - splits on whitespace and punctuation
//! 2. `LowerCaser` - converts tokens to lowercase
//! 3. `RemoveLongFilter` - drops tokens longer than 40 bytes (ASINs in URLs, hashes)
//! 4. `Stemmer` - applies language-specific stemming
//!
//! The stemmer language comes from `search.stemmer` in `.stark.toml`.

use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, TextAnalyzer,
};

use crate::IndexError;

/// Name of the custom tokenizer registered with Tantivy.
pub const STARK_TOKENIZER: &str = "stark_text";

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Stemmer languages accepted in configuration, by lowercase name.
pub const STEMMER_LANGUAGES: [(&str, Language); 18] = [
    ("arabic", Language::Arabic),
    ("danish", Language::Danish),
    ("dutch", Language::Dutch),
    ("english", Language::English),
    ("finnish", Language::Finnish),
    ("french", Language::French),
    ("german", Language::German),
    ("greek", Language::Greek),
    ("hungarian", Language::Hungarian),
    ("italian", Language::Italian),
    ("norwegian", Language::Norwegian),
    ("portuguese", Language::Portuguese),
    ("romanian", Language::Romanian),
    ("russian", Language::Russian),
    ("spanish", Language::Spanish),
    ("swedish", Language::Swedish),
    ("tamil", Language::Tamil),
    ("turkish", Language::Turkish),
];

/// Parses a stemmer language name, ignoring case.
pub fn parse_language(name: &str) -> Result<Language, IndexError> {
    let lowered = name.to_lowercase();
    STEMMER_LANGUAGES
        .iter()
        .find(|(candidate, _)| *candidate == lowered)
        .map(|(_, language)| *language)
        .ok_or(IndexError::InvalidLanguage(lowered))
}

/// Builds the analyzer for `language`.
pub fn build_analyzer(language: Language) -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
        .filter(Stemmer::new(language))
        .build()
}

/// Builds the analyzer from a configured language name.
pub fn build_analyzer_from_name(language_name: &str) -> Result<TextAnalyzer, IndexError> {
    parse_language(language_name).map(build_analyzer)
}
