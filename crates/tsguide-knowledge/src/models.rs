//! Catalog records for 3GPP specifications, protocols, concepts, and research patterns

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A 3GPP Technical Specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    /// Unique identifier, e.g. "TS 33.501"
    pub id: String,
    /// Series number, e.g. "33"
    pub series: String,
    /// Official title
    pub title: String,
    /// Owning working group, e.g. "SA3"
    pub working_group: String,
    /// What the specification covers
    pub purpose: String,
    /// Topics the specification is authoritative for
    #[serde(default)]
    pub key_topics: BTreeSet<String>,
    /// Free-text search keywords
    #[serde(default)]
    pub search_keywords: BTreeSet<String>,
    /// Ids of specifications this one builds on
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
    /// Practical notes for implementers, in reading order
    #[serde(default)]
    pub implementation_notes: Vec<String>,
}

impl Specification {
    /// Whether the specification carries implementer notes
    pub fn has_implementation_notes(&self) -> bool {
        !self.implementation_notes.is_empty()
    }

    /// Key topics and search keywords, lowercased
    pub fn keywords(&self) -> impl Iterator<Item = String> + '_ {
        self.key_topics
            .iter()
            .chain(self.search_keywords.iter())
            .map(|k| k.to_lowercase())
    }
}

/// A signaling or user-plane protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protocol {
    /// Short name, e.g. "NAS"
    pub name: String,
    /// Expanded name
    pub full_name: String,
    /// Protocol stack layer
    pub layer: String,
    /// What the protocol does
    pub purpose: String,
    /// Specifications that define the protocol
    #[serde(default)]
    pub defining_specs: BTreeSet<String>,
    /// Names of protocols it interacts with
    #[serde(default)]
    pub related_protocols: BTreeSet<String>,
    /// Main procedures, in typical execution order
    #[serde(default)]
    pub procedures: Vec<String>,
}

/// A glossary concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Acronym or short name, e.g. "SUCI"
    pub name: String,
    /// Expanded name
    pub full_name: String,
    /// Grouping such as "identity" or "procedure"
    pub category: String,
    /// Plain-language explanation
    #[serde(default)]
    pub description: String,
    /// Specifications that define the concept
    #[serde(default)]
    pub related_specs: Vec<String>,
}

/// One phase of a research pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchStep {
    /// Phase name
    pub phase: String,
    /// Work to do in this phase
    #[serde(default)]
    pub tasks: Vec<String>,
    /// What the phase should produce
    #[serde(default)]
    pub deliverables: Vec<String>,
    /// Practical advice
    #[serde(default)]
    pub tips: Vec<String>,
}

/// A reusable, step-by-step approach to researching a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchPattern {
    /// Unique name
    pub name: String,
    /// Short description
    pub description: String,
    /// Intents or domains the pattern applies to
    #[serde(default)]
    pub applicable_for: BTreeSet<String>,
    /// Rough effort estimate, e.g. "2-3 days"
    pub time_estimate: String,
    /// Ordered phases
    #[serde(default)]
    pub steps: Vec<ResearchStep>,
    /// Expected results of following the pattern
    #[serde(default)]
    pub expected_outputs: Vec<String>,
    /// Mistakes commonly made along the way
    #[serde(default)]
    pub common_pitfalls: Vec<String>,
}

/// Search template for a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPattern {
    /// Domain name, e.g. "authentication"
    pub domain: String,
    /// Keywords worth searching for
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    /// Specification series to browse
    #[serde(default)]
    pub series: BTreeSet<String>,
    /// Where to start reading
    #[serde(default)]
    pub starting_specs: BTreeSet<String>,
}

/// Raw on-disk catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog format/content version
    #[serde(default)]
    pub version: String,
    /// Specification records
    #[serde(default)]
    pub specifications: Vec<Specification>,
    /// Protocol records
    #[serde(default)]
    pub protocols: Vec<Protocol>,
    /// Concept records
    #[serde(default)]
    pub concepts: Vec<Concept>,
    /// Research pattern records
    #[serde(default)]
    pub research_patterns: Vec<ResearchPattern>,
    /// Domain search templates
    #[serde(default)]
    pub search_patterns: Vec<SearchPattern>,
}

/// Entry counts of a loaded knowledge base
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeStats {
    /// Number of specifications
    pub specifications: usize,
    /// Number of protocols
    pub protocols: usize,
    /// Number of concepts
    pub concepts: usize,
    /// Number of research patterns
    pub research_patterns: usize,
    /// Number of domain search templates
    pub search_patterns: usize,
    /// Distinct lowercase keywords in the specification index
    pub indexed_keywords: usize,
}
