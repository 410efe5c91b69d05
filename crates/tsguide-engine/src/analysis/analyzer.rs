use tracing::debug;
use tsguide_knowledge::KnowledgeBase;

use super::{words, ConceptExtractor, DomainExtractor, IntentClassifier};
use crate::{
    error::{EngineError, Result},
    models::{Query, QueryAnalysis, QueryIntent, UserLevel},
};

/// Turns a free-text query into a typed [`QueryAnalysis`]
#[derive(Debug, Clone, Default)]
pub struct QueryAnalyzer {
    intents: IntentClassifier,
    domains: DomainExtractor,
    concepts: ConceptExtractor,
    default_level: UserLevel,
}

impl QueryAnalyzer {
    /// Analyzer with built-in rule tables and term list
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer whose term list also covers the knowledge base's concepts and protocols
    pub fn with_knowledge(knowledge: &KnowledgeBase) -> Self {
        Self {
            concepts: ConceptExtractor::with_knowledge(knowledge),
            ..Self::default()
        }
    }

    /// Level used when a query does not state one
    pub fn with_default_level(mut self, level: UserLevel) -> Self {
        self.default_level = level;
        self
    }

    /// Replace the intent rule table
    pub fn with_intent_classifier(mut self, intents: IntentClassifier) -> Self {
        self.intents = intents;
        self
    }

    /// Replace the domain rule table
    pub fn with_domain_extractor(mut self, domains: DomainExtractor) -> Self {
        self.domains = domains;
        self
    }

    /// Classify a query.
    ///
    /// Pure: the same query always yields the same analysis. Fails only when
    /// the query text is empty or whitespace.
    pub fn analyze(&self, query: &Query) -> Result<QueryAnalysis> {
        let text = query.text.trim();
        if text.is_empty() {
            return Err(EngineError::EmptyQuery);
        }

        let words = words(text);
        let intent = self.intents.classify(&words);
        let domain = self.domains.extract(&words);
        let concepts = self.concepts.extract(text);
        let complexity = complexity(words.len(), concepts.len(), intent);
        let user_level = query.user_level.unwrap_or(self.default_level);

        debug!(
            "Analyzed query: intent={}, domain={}, concepts={}, complexity={:.2}, level={}",
            intent,
            domain,
            concepts.len(),
            complexity,
            user_level
        );

        Ok(QueryAnalysis {
            intent,
            domain,
            concepts,
            complexity,
            user_level,
        })
    }
}

/// `1.0 + 0.1 * words + 0.5 * concepts + intent weight`
pub(crate) fn complexity(word_count: usize, concept_count: usize, intent: QueryIntent) -> f32 {
    let intent_weight = match intent {
        QueryIntent::Comparison => 1.5,
        QueryIntent::Implementation => 1.2,
        QueryIntent::Learning => 0.6,
        QueryIntent::Discovery => 0.4,
    };
    1.0 + 0.1 * word_count as f32 + 0.5 * concept_count as f32 + intent_weight
}
