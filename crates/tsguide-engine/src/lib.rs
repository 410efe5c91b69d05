//! Query analysis and adaptive guidance for 3GPP specifications
//!
//! Turns a free-text question into a typed [`QueryAnalysis`] (intent, domain,
//! recognized concepts, complexity, user level), then into a leveled
//! [`Guidance`] document built from the knowledge base:
//!
//! - [`QueryAnalyzer`]: rule-table intent, domain, and concept classification
//! - [`GuidanceGenerator`]: per-intent section tables, level adaptation, confidence
//! - [`GuidanceEngine`]: facade owning the shared `Arc<KnowledgeBase>`
//!
//! # Example
//!
//! ```ignore
//! use tsguide_engine::{EngineConfig, GuidanceEngine, Query, UserLevel};
//!
//! let engine = GuidanceEngine::from_config(&EngineConfig::default())?;
//! let query = Query::new("compare 5G-AKA vs EPS-AKA").with_level(UserLevel::Beginner);
//! let guidance = engine.answer(&query)?;
//! println!("{}", guidance.summary);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod di;
pub mod engine;
pub mod error;
pub mod guidance;
pub mod models;

pub use analysis::{
    ConceptExtractor, DomainExtractor, DomainRule, IntentClassifier, IntentRule, QueryAnalyzer,
    GENERAL_DOMAIN,
};
pub use config::{ConfidenceWeights, ConfigLoader, EngineConfig, KnowledgeConfig, LoggingConfig};
pub use engine::GuidanceEngine;
pub use error::{ConfigError, EngineError, Result};
pub use guidance::{GuidanceGenerator, LevelProfile};
pub use models::{
    Guidance, GuidanceKind, Query, QueryAnalysis, QueryIntent, Section, SectionKind, UserLevel,
};
pub use tsguide_knowledge::{KnowledgeBase, RankingWeights, RelevanceRanker};
