//! Relevance ranking of specifications against a free-text topic

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::Specification;

/// Words that never count as topic tokens
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "do", "does", "for", "from", "how", "in",
    "is", "it", "of", "on", "or", "the", "to", "what", "with",
];

/// Weights for the three scoring factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    /// Per key topic exactly equal to a topic token
    pub key_topic: u32,
    /// Per search keyword containing a topic token
    pub search_keyword: u32,
    /// Title contains the whole topic
    pub title: u32,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            key_topic: 3,
            search_keyword: 2,
            title: 1,
        }
    }
}

/// Scores and orders specifications by relevance to a topic
#[derive(Debug, Clone, Default)]
pub struct RelevanceRanker {
    weights: RankingWeights,
}

impl RelevanceRanker {
    /// Create a ranker with default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ranker with custom weights
    pub fn with_weights(weights: RankingWeights) -> Self {
        Self { weights }
    }

    /// Weights in use
    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Split a topic into lowercase, de-duplicated tokens.
    ///
    /// Hyphens and apostrophes stay inside tokens so "5G-AKA" and "EAP-AKA'"
    /// survive intact.
    pub fn tokenize(topic: &str) -> Vec<String> {
        let lowered = topic.to_lowercase();
        let mut seen = HashSet::new();
        lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
            .map(|token| token.trim_matches('-').trim_start_matches('\''))
            .filter(|token| token.chars().count() >= 2 && !STOP_WORDS.contains(token))
            .filter(|token| seen.insert(token.to_string()))
            .map(str::to_string)
            .collect()
    }

    /// Score one specification against a topic
    pub fn score(&self, topic: &str, spec: &Specification) -> u32 {
        let tokens = Self::tokenize(topic);
        self.score_tokens(topic.trim().to_lowercase().as_str(), &tokens, spec)
    }

    fn score_tokens(&self, topic: &str, tokens: &[String], spec: &Specification) -> u32 {
        if tokens.is_empty() {
            return 0;
        }

        let key_topic_hits = spec
            .key_topics
            .iter()
            .filter(|key_topic| {
                let key_topic = key_topic.to_lowercase();
                tokens.iter().any(|token| *token == key_topic)
            })
            .count() as u32;

        let keyword_hits = spec
            .search_keywords
            .iter()
            .filter(|keyword| {
                let keyword = keyword.to_lowercase();
                tokens.iter().any(|token| keyword.contains(token.as_str()))
            })
            .count() as u32;

        let title_hit = u32::from(!topic.is_empty() && spec.title.to_lowercase().contains(topic));

        self.weights.key_topic * key_topic_hits
            + self.weights.search_keyword * keyword_hits
            + self.weights.title * title_hit
    }

    /// Rank candidates, keeping their scores.
    ///
    /// Zero scores are dropped; ties fall back to ascending id.
    pub fn rank_with_scores<'a, I>(&self, topic: &str, candidates: I) -> Vec<(&'a Specification, u32)>
    where
        I: IntoIterator<Item = &'a Specification>,
    {
        let normalized = topic.trim().to_lowercase();
        let tokens = Self::tokenize(&normalized);

        let mut scored: Vec<(&Specification, u32)> = candidates
            .into_iter()
            .map(|spec| (spec, self.score_tokens(&normalized, &tokens, spec)))
            .filter(|(_, score)| *score > 0)
            .collect();

        scored.sort_by(|(a, score_a), (b, score_b)| {
            score_b.cmp(score_a).then_with(|| a.id.cmp(&b.id))
        });
        scored.dedup_by(|(a, _), (b, _)| a.id == b.id);
        scored
    }

    /// Rank candidates by descending relevance
    pub fn rank<'a, I>(&self, topic: &str, candidates: I) -> Vec<&'a Specification>
    where
        I: IntoIterator<Item = &'a Specification>,
    {
        self.rank_with_scores(topic, candidates)
            .into_iter()
            .map(|(spec, _)| spec)
            .collect()
    }
}
