use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use tsguide_knowledge::KnowledgeBase;
use unicode_normalization::UnicodeNormalization;

/// Words and hyphenated compounds, e.g. "SUCI", "5G-AKA", "EAP-AKA'"
static TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9']+(?:-[A-Za-z0-9']+)*").expect("term pattern is valid")
});

#[rustfmt::skip]
const BUILTIN_TERMS: &[&str] = &[
    // generations
    "2G", "3G", "4G", "5G", "LTE", "NR", "EPS", "5GS", "5GC",
    // protocols
    "NAS", "RRC", "PDCP", "RLC", "MAC", "NGAP", "S1AP", "GTP", "SIP",
    // authentication
    "AKA", "5G-AKA", "EPS-AKA", "EAP-AKA", "EAP-AKA'",
    // identities
    "SUCI", "SUPI", "GUTI", "IMSI",
    // network functions
    "AMF", "SMF", "UPF", "AUSF", "SEAF", "UDM", "CHF", "MME", "NSSF",
    // sessions and slicing
    "PDU", "QoS", "NSSAI", "S-NSSAI",
];

/// Recognizes known terms in the case-sensitive query text
#[derive(Debug, Clone)]
pub struct ConceptExtractor {
    terms: HashSet<String>,
}

impl ConceptExtractor {
    /// Extractor over the built-in term list
    pub fn new() -> Self {
        Self::with_terms(BUILTIN_TERMS.iter().copied())
    }

    /// Extractor over a custom term list
    pub fn with_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }

    /// Built-in terms plus every concept and protocol name in the knowledge base
    pub fn with_knowledge(knowledge: &KnowledgeBase) -> Self {
        let mut extractor = Self::new();
        extractor.extend(
            knowledge
                .concepts()
                .map(|concept| concept.name.clone())
                .chain(knowledge.protocols().map(|protocol| protocol.name.clone())),
        );
        extractor
    }

    /// Add terms to the dictionary
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, terms: I) {
        self.terms.extend(terms);
    }

    /// Whether a term is in the dictionary
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    /// Number of dictionary terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Recognized terms in first-seen order, without duplicates.
    ///
    /// A hyphenated token matches as a whole compound when the dictionary has
    /// it; otherwise its parts are matched, longest compound first.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let normalized: String = text.nfkc().collect();
        let mut seen = HashSet::new();
        let mut concepts = Vec::new();

        for token in TERM.find_iter(&normalized) {
            let parts: Vec<&str> = token.as_str().split('-').collect();
            let mut start = 0;
            while start < parts.len() {
                let found = (start + 1..=parts.len())
                    .rev()
                    .find_map(|end| self.lookup(&parts[start..end].join("-")).map(|t| (t, end)));
                match found {
                    Some((term, end)) => {
                        if seen.insert(term) {
                            concepts.push(term.to_string());
                        }
                        start = end;
                    }
                    None => start += 1,
                }
            }
        }

        debug!("Recognized concepts {:?}", concepts);
        concepts
    }

    fn lookup(&self, candidate: &str) -> Option<&str> {
        self.terms
            .get(candidate)
            .or_else(|| self.terms.get(candidate.trim_matches('\'')))
            .map(String::as_str)
    }
}

impl Default for ConceptExtractor {
    fn default() -> Self {
        Self::new()
    }
}
