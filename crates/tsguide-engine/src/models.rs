//! Query, analysis, and guidance data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// Experience level the guidance is calibrated for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserLevel {
    /// New to 3GPP specifications
    Beginner,
    /// Familiar with the basics
    #[default]
    Intermediate,
    /// Works with the specifications daily
    Expert,
}

impl UserLevel {
    /// All levels, least experienced first
    pub fn all() -> &'static [UserLevel] {
        &[UserLevel::Beginner, UserLevel::Intermediate, UserLevel::Expert]
    }

    /// Level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserLevel::Beginner => "beginner",
            UserLevel::Intermediate => "intermediate",
            UserLevel::Expert => "expert",
        }
    }

    /// Parse a level name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "novice" => Some(UserLevel::Beginner),
            "intermediate" => Some(UserLevel::Intermediate),
            "expert" | "advanced" => Some(UserLevel::Expert),
            _ => None,
        }
    }

    /// Pick the value matching this level
    pub fn pick<T>(&self, beginner: T, intermediate: T, expert: T) -> T {
        match self {
            UserLevel::Beginner => beginner,
            UserLevel::Intermediate => intermediate,
            UserLevel::Expert => expert,
        }
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller-supplied question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Free-text question
    pub text: String,
    /// Optional experience level of the asker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_level: Option<UserLevel>,
}

impl Query {
    /// Create a query without a level
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user_level: None,
        }
    }

    /// Set the asker's level
    pub fn with_level(mut self, level: UserLevel) -> Self {
        self.user_level = Some(level);
        self
    }
}

/// What the asker wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryIntent {
    /// Find relevant specifications
    Discovery,
    /// Understand a concept or protocol
    Learning,
    /// Build something from the specifications
    Implementation,
    /// Contrast two or more items
    Comparison,
}

impl QueryIntent {
    /// Intent name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryIntent::Discovery => "discovery",
            QueryIntent::Learning => "learning",
            QueryIntent::Implementation => "implementation",
            QueryIntent::Comparison => "comparison",
        }
    }
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed classification of a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    /// Classified intent
    pub intent: QueryIntent,
    /// Topic domain, "general" when nothing matched
    pub domain: String,
    /// Recognized terms in first-seen order, without duplicates
    pub concepts: Vec<String>,
    /// Positive complexity estimate
    pub complexity: f32,
    /// Resolved experience level
    pub user_level: UserLevel,
}

impl QueryAnalysis {
    /// Whether a specific domain was recognized
    pub fn has_domain(&self) -> bool {
        !self.domain.is_empty() && self.domain != crate::analysis::GENERAL_DOMAIN
    }
}

/// Shape of a guidance document, one per intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceKind {
    /// Specification list for discovery questions
    Discovery,
    /// Explanations and a learning path
    Learning,
    /// Requirements, steps, and pitfalls
    Implementation,
    /// Side-by-side comparison
    Comparison,
}

impl GuidanceKind {
    /// Kind name as string
    pub fn as_str(&self) -> &'static str {
        QueryIntent::from(*self).as_str()
    }
}

impl From<GuidanceKind> for QueryIntent {
    fn from(kind: GuidanceKind) -> Self {
        match kind {
            GuidanceKind::Discovery => QueryIntent::Discovery,
            GuidanceKind::Learning => QueryIntent::Learning,
            GuidanceKind::Implementation => QueryIntent::Implementation,
            GuidanceKind::Comparison => QueryIntent::Comparison,
        }
    }
}

impl fmt::Display for GuidanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<QueryIntent> for GuidanceKind {
    fn from(intent: QueryIntent) -> Self {
        match intent {
            QueryIntent::Discovery => GuidanceKind::Discovery,
            QueryIntent::Learning => GuidanceKind::Learning,
            QueryIntent::Implementation => GuidanceKind::Implementation,
            QueryIntent::Comparison => GuidanceKind::Comparison,
        }
    }
}

/// Kinds of guidance sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Framing of the answer
    Overview,
    /// Ranked specifications
    SpecificationList,
    /// Adjacent topics worth exploring
    RelatedTopics,
    /// Explanation of recognized concepts
    ConceptExplanation,
    /// Ordered study plan
    LearningPath,
    /// What an implementation must satisfy
    Requirements,
    /// Ordered implementation work
    ImplementationSteps,
    /// Common mistakes
    Pitfalls,
    /// Side-by-side attributes of compared items
    ComparisonTable,
    /// Pairwise differences between compared items
    Differences,
    /// Acronyms expanded for newcomers
    Glossary,
    /// Dependencies, procedures, and layers for practitioners
    TechnicalDetails,
}

impl SectionKind {
    /// Section kind name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Overview => "overview",
            SectionKind::SpecificationList => "specification_list",
            SectionKind::RelatedTopics => "related_topics",
            SectionKind::ConceptExplanation => "concept_explanation",
            SectionKind::LearningPath => "learning_path",
            SectionKind::Requirements => "requirements",
            SectionKind::ImplementationSteps => "implementation_steps",
            SectionKind::Pitfalls => "pitfalls",
            SectionKind::ComparisonTable => "comparison_table",
            SectionKind::Differences => "differences",
            SectionKind::Glossary => "glossary",
            SectionKind::TechnicalDetails => "technical_details",
        }
    }
}

/// One titled block of guidance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section kind
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Heading
    pub title: String,
    /// Body text
    pub content: String,
}

impl Section {
    /// Create a section
    pub fn new(kind: SectionKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A leveled, structured answer to a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "guidance")]
pub struct Guidance {
    /// Shape of the document
    pub kind: GuidanceKind,
    /// One-paragraph answer
    pub summary: String,
    /// Ordered sections
    pub sections: Vec<Section>,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// Suggested follow-up actions, never empty
    pub next_steps: Vec<String>,
    /// Adjacent topics, never empty
    pub related_topics: Vec<String>,
    /// Ids of every specification named in the guidance
    pub referenced_specifications: Vec<String>,
}

impl Guidance {
    /// First section of a kind
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    /// Section kinds in order
    pub fn section_kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|section| section.kind).collect()
    }
}
