//! Text normalisation shared by the hashing embedder and the explainer.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\b\w+\b").expect("valid word regex");
}

/// Tokens shorter than this never count as overlap evidence.
pub const MIN_TOKEN_LEN: usize = 3;

/// Stop words excluded from overlap and hashing.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "in", "of", "to", "is", "was",
    "for", "on", "with", "this", "that", "are", "were", "be", "been",
    "by", "from", "we", "our", "their", "which", "also", "as", "at",
    "it", "its", "not", "but", "into", "other", "such", "used", "use",
    "treatment", "disease", "disorder", "patients",
];

/// Lower-cased word tokens in text order, duplicates kept.
pub fn words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Distinct meaningful tokens: lower-cased, at least [`MIN_TOKEN_LEN`]
/// characters, stop words removed. Sorted, so callers get stable output.
pub fn content_tokens(text: &str) -> BTreeSet<String> {
    words(text)
        .into_iter()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN && !is_stop_word(t))
        .collect()
}
