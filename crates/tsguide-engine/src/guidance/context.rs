use std::collections::{BTreeSet, HashSet};

use tsguide_knowledge::{
    Concept, KnowledgeBase, Protocol, RelevanceRanker, ResearchPattern, SearchPattern,
    Specification,
};

use super::{confidence::Evidence, level::LevelProfile};
use crate::models::{GuidanceKind, Query, QueryAnalysis};

const FALLBACK_TOPICS: &[&str] = &[
    "3GPP specification series and numbering",
    "Stage 2 architecture versus Stage 3 protocol specifications",
    "Release planning and change requests",
];

/// A recognized query term and whatever the knowledge base holds for it
#[derive(Debug, Clone, Copy)]
pub struct ConceptEntry<'a> {
    /// Term as written in the query
    pub name: &'a str,
    /// Glossary record, when the catalog has one
    pub concept: Option<&'a Concept>,
    /// Protocol record, when the term names a protocol
    pub protocol: Option<&'a Protocol>,
}

/// One side of a comparison
#[derive(Debug, Clone, Copy)]
pub enum ComparisonItem<'a> {
    /// A recognized term
    Concept(ConceptEntry<'a>),
    /// A ranked specification
    Specification(&'a Specification),
}

impl<'a> ConceptEntry<'a> {
    /// Look a term up, `None` when the knowledge base holds neither record
    pub fn resolve(name: &'a str, knowledge: &'a KnowledgeBase) -> Option<Self> {
        let concept = knowledge.get_concept(name);
        let protocol = knowledge.get_protocol(name);
        (concept.is_some() || protocol.is_some()).then_some(Self {
            name,
            concept,
            protocol,
        })
    }

    /// Expanded name
    pub fn full_name(&self) -> &'a str {
        match (self.concept, self.protocol) {
            (Some(concept), _) => &concept.full_name,
            (None, Some(protocol)) => &protocol.full_name,
            (None, None) => self.name,
        }
    }

    /// Concept category, "protocol" for protocol-only entries
    pub fn category(&self) -> &'a str {
        self.concept.map_or("protocol", |concept| concept.category.as_str())
    }

    /// Plain-language description
    pub fn description(&self) -> &'a str {
        match (self.concept, self.protocol) {
            (Some(concept), _) if !concept.description.is_empty() => &concept.description,
            (_, Some(protocol)) => &protocol.purpose,
            _ => "",
        }
    }

    /// Ids of the specifications defining the term
    pub fn spec_ids(&self) -> Vec<&'a String> {
        match (self.concept, self.protocol) {
            (Some(concept), _) => concept.related_specs.iter().collect(),
            (None, Some(protocol)) => protocol.defining_specs.iter().collect(),
            (None, None) => Vec::new(),
        }
    }
}

impl ComparisonItem<'_> {
    /// Display name
    pub fn name(&self) -> &str {
        match self {
            ComparisonItem::Concept(entry) => entry.name,
            ComparisonItem::Specification(spec) => &spec.id,
        }
    }
}

/// Everything the section builders read, resolved once per request
#[derive(Debug)]
pub struct GuidanceContext<'a> {
    pub(crate) query: &'a Query,
    pub(crate) analysis: &'a QueryAnalysis,
    pub(crate) kind: GuidanceKind,
    pub(crate) profile: LevelProfile,
    pub(crate) knowledge: &'a KnowledgeBase,
    pub(crate) topic: String,
    pub(crate) search_pattern: Option<&'a SearchPattern>,
    pub(crate) ranked: Vec<&'a Specification>,
    pub(crate) specifications: Vec<&'a Specification>,
    pub(crate) concepts: Vec<ConceptEntry<'a>>,
    pub(crate) pattern: Option<&'a ResearchPattern>,
}

impl<'a> GuidanceContext<'a> {
    /// Resolve lookups for one query
    pub fn new(
        query: &'a Query,
        analysis: &'a QueryAnalysis,
        knowledge: &'a KnowledgeBase,
        ranker: &RelevanceRanker,
    ) -> Self {
        let kind = GuidanceKind::from(analysis.intent);
        let profile = LevelProfile::for_level(analysis.user_level);
        let topic = ranking_topic(analysis);
        let ranked = ranker.rank(&topic, knowledge.specifications());

        let search_pattern = if analysis.has_domain() {
            knowledge.get_search_pattern_for_domain(&analysis.domain)
        } else {
            None
        };

        let specifications: Vec<&Specification> = if ranked.is_empty() {
            search_pattern
                .into_iter()
                .flat_map(|pattern| pattern.starting_specs.iter())
                .filter_map(|id| knowledge.get_specification(id))
                .take(profile.max_specifications)
                .collect()
        } else {
            ranked.iter().copied().take(profile.max_specifications).collect()
        };

        // Terms without a catalog record stay out of the guidance
        let concepts = analysis
            .concepts
            .iter()
            .filter_map(|name| ConceptEntry::resolve(name, knowledge))
            .collect();

        let candidates = knowledge.patterns_for(analysis.intent.as_str());
        let pattern = candidates
            .iter()
            .find(|pattern| pattern.applicable_for.contains(&analysis.domain))
            .or_else(|| candidates.first())
            .copied();

        Self {
            query,
            analysis,
            kind,
            profile,
            knowledge,
            topic,
            search_pattern,
            ranked,
            specifications,
            concepts,
            pattern,
        }
    }

    /// Topic string the specifications were ranked against
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Level profile in effect
    pub fn profile(&self) -> &LevelProfile {
        &self.profile
    }

    /// Specifications listed in the guidance, most relevant first
    pub fn specifications(&self) -> &[&'a Specification] {
        &self.specifications
    }

    pub(crate) fn evidence(&self) -> Evidence {
        Evidence {
            domain_resolved: self.analysis.has_domain(),
            search_pattern: self.search_pattern.is_some(),
            concepts: self.analysis.concepts.len(),
            ranked_specifications: self.ranked.len(),
        }
    }

    /// Domain in prose, e.g. "session management"
    pub(crate) fn domain_label(&self) -> String {
        if self.analysis.has_domain() {
            self.analysis.domain.replace('_', " ")
        } else {
            "3GPP specifications".to_string()
        }
    }

    /// What the question is about: the catalog-backed terms, else the domain
    pub(crate) fn subject(&self) -> String {
        let names: Vec<&str> = self.concepts.iter().map(|entry| entry.name).collect();
        match names.as_slice() {
            [] => self.domain_label(),
            [only] => only.to_string(),
            [first, second] => format!("{} and {}", first, second),
            many => many.join(", "),
        }
    }

    /// Listed specifications reordered so in-list dependencies come first
    pub(crate) fn reading_order(&self) -> Vec<&'a Specification> {
        let listed: HashSet<&str> = self.specifications.iter().map(|s| s.id.as_str()).collect();
        let mut placed: HashSet<&str> = HashSet::new();
        let mut order = Vec::with_capacity(self.specifications.len());
        let mut remaining: Vec<&'a Specification> = self.specifications.clone();

        while !remaining.is_empty() {
            let ready = remaining.iter().position(|spec| {
                spec.dependencies
                    .iter()
                    .all(|dep| !listed.contains(dep.as_str()) || placed.contains(dep.as_str()))
            });
            // A dependency cycle keeps relevance order for the rest
            let next = remaining.remove(ready.unwrap_or(0));
            placed.insert(next.id.as_str());
            order.push(next);
        }
        order
    }

    /// Items to compare: two or more recognized terms, else the top specifications
    pub(crate) fn comparison_items(&self) -> Vec<ComparisonItem<'a>> {
        if self.concepts.len() >= 2 {
            self.concepts.iter().copied().map(ComparisonItem::Concept).collect()
        } else {
            self.specifications
                .iter()
                .take(3)
                .copied()
                .map(ComparisonItem::Specification)
                .collect()
        }
    }

    /// Specifications with implementation notes for the topic
    pub(crate) fn implementation_specifications(&self) -> Vec<&'a Specification> {
        let mut specs = self.knowledge.get_implementation_guidance_for_topic(&self.topic);
        if specs.is_empty() {
            specs = self
                .specifications
                .iter()
                .copied()
                .filter(|spec| spec.has_implementation_notes())
                .collect();
        }
        specs.truncate(self.profile.max_specifications);
        specs
    }

    /// Protocols behind the recognized terms and listed specifications
    pub(crate) fn protocols(&self) -> Vec<&'a Protocol> {
        let mut seen = BTreeSet::new();
        self.concepts
            .iter()
            .filter_map(|entry| entry.protocol)
            .chain(
                self.specifications
                    .iter()
                    .flat_map(|spec| self.knowledge.protocols_for_specification(&spec.id)),
            )
            .filter(|protocol| seen.insert(protocol.name.as_str()))
            .collect()
    }

    /// Specification ids from a record that resolve in the knowledge base
    pub(crate) fn known_ids<'s, I>(&self, ids: I) -> Vec<&'s str>
    where
        I: IntoIterator<Item = &'s String>,
    {
        ids.into_iter()
            .filter(|id| self.knowledge.get_specification(id).is_some())
            .map(String::as_str)
            .collect()
    }

    /// Adjacent topics, never empty
    pub(crate) fn related_topics(&self) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(pattern) = self.search_pattern {
            candidates.extend(pattern.keywords.iter().cloned());
        }
        for protocol in self.concepts.iter().filter_map(|entry| entry.protocol) {
            candidates.extend(
                protocol
                    .related_protocols
                    .iter()
                    .filter(|name| self.knowledge.get_protocol(name).is_some())
                    .cloned(),
            );
        }
        if let Some(top) = self.specifications.first() {
            candidates.extend(top.key_topics.iter().cloned());
            candidates.extend(
                self.knowledge
                    .get_related_specifications(&top.id)
                    .iter()
                    .take(2)
                    .map(|related| format!("{} ({})", related.id, related.title)),
            );
        }

        let query = self.query.text.to_lowercase();
        let mut seen = HashSet::new();
        let mut topics: Vec<String> = candidates
            .into_iter()
            .filter(|topic| {
                let key = topic.to_lowercase();
                !query.contains(&key) && seen.insert(key)
            })
            .collect();

        if topics.is_empty() {
            topics = FALLBACK_TOPICS.iter().map(|topic| topic.to_string()).collect();
        }
        topics.truncate(self.profile.max_related_topics);
        topics
    }
}

fn ranking_topic(analysis: &QueryAnalysis) -> String {
    let mut parts = Vec::with_capacity(analysis.concepts.len() + 1);
    if analysis.has_domain() {
        parts.push(analysis.domain.replace('_', " "));
    }
    parts.extend(analysis.concepts.iter().cloned());
    parts.join(" ")
}
