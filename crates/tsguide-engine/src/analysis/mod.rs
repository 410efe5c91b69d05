//! Query analysis: intent, domain, concepts, complexity, and level
//!
//! Each classifier is a data-driven rule table evaluated over the
//! NFKC-normalized, lowercased words of the query, so rules can be tested
//! and extended independently of the analyzer that combines them.

mod analyzer;
mod concepts;
mod domain;
mod intent;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

pub use analyzer::QueryAnalyzer;
pub use concepts::ConceptExtractor;
pub use domain::{DomainExtractor, DomainRule};
pub use intent::{IntentClassifier, IntentRule};

/// Domain assigned when no domain keyword matches
pub const GENERAL_DOMAIN: &str = "general";

/// NFKC-normalize, strip control characters, and lowercase
pub fn normalize(text: &str) -> String {
    text.nfkc()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .to_lowercase()
}

/// Lowercased words of a query, in order
pub fn words(text: &str) -> Vec<String> {
    normalize(text)
        .unicode_words()
        .map(str::to_string)
        .collect()
}

/// Whether `phrase` occurs in `words` as a contiguous run of whole words
pub(crate) fn contains_phrase(words: &[String], phrase: &[String]) -> bool {
    if phrase.is_empty() || phrase.len() > words.len() {
        return false;
    }
    words.windows(phrase.len()).any(|window| window == phrase)
}
