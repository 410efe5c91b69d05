//! Leveled guidance assembly
//!
//! A [`GuidanceContext`] resolves every knowledge-base lookup for one query,
//! then the section table of the query's [`GuidanceKind`](crate::models::GuidanceKind)
//! builds the document. Level-gated extras follow the required sections.

mod confidence;
mod context;
mod generator;
mod level;
mod sections;

pub use confidence::{confidence, Evidence};
pub use context::{ComparisonItem, ConceptEntry, GuidanceContext};
pub use generator::GuidanceGenerator;
pub use level::LevelProfile;
pub use sections::{level_extras, summary, SectionBuilder};
