//! Knowledge base for 3GPP specification guidance
//!
//! Holds the catalog the guidance engine reads from:
//! - **Specifications**: TS metadata, key topics, dependencies, implementer notes
//! - **Protocols** and **Concepts**: glossary records looked up by name
//! - **Research patterns**: step-by-step approaches for discovery, learning,
//!   implementation, and comparison work
//! - **Search patterns**: per-domain keyword and starting-point templates
//!
//! The catalog is loaded once and never mutated afterwards, so a single
//! `Arc<KnowledgeBase>` can be shared by every request.
//!
//! # Example
//!
//! ```ignore
//! use tsguide_knowledge::KnowledgeBase;
//!
//! let kb = KnowledgeBase::load_default()?;
//! for spec in kb.suggest_specifications_for_topic("5G authentication") {
//!     println!("{}: {}", spec.id, spec.title);
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod di;
pub mod error;
pub mod knowledge_base;
pub mod models;
pub mod relevance;

pub use error::{KnowledgeError, Result};
pub use knowledge_base::KnowledgeBase;
pub use models::{
    Catalog, Concept, KnowledgeStats, Protocol, ResearchPattern, ResearchStep, SearchPattern,
    Specification,
};
pub use relevance::{RankingWeights, RelevanceRanker};
