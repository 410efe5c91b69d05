//! Engine facade wiring the analyzer and generator to one knowledge base

use std::sync::Arc;

use tracing::{debug, info};
use tsguide_knowledge::KnowledgeBase;

use crate::{
    analysis::QueryAnalyzer,
    config::EngineConfig,
    error::Result,
    guidance::GuidanceGenerator,
    models::{Guidance, Query, QueryAnalysis},
};

/// Answers queries against an immutable knowledge base snapshot.
///
/// Holds no mutable state, so one engine behind an `Arc` can serve
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct GuidanceEngine {
    knowledge: Arc<KnowledgeBase>,
    analyzer: QueryAnalyzer,
    generator: GuidanceGenerator,
}

impl GuidanceEngine {
    /// Load the configured catalog, or the embedded one, and build the engine.
    ///
    /// Also installs the global tracing subscriber at `logging.level` unless
    /// one is already set.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        if tsguide_common::init_tracing(&config.logging.level) {
            debug!("Tracing initialized at {}", config.logging.level);
        }
        let knowledge = match &config.knowledge.catalog_path {
            Some(path) => {
                info!("Loading catalog from {}", path.display());
                KnowledgeBase::load_from_path(path)?
            }
            None => KnowledgeBase::load_default()?,
        };
        Ok(Self::with_knowledge(Arc::new(knowledge), config))
    }

    /// Build the engine over an already-loaded knowledge base
    pub fn with_knowledge(knowledge: Arc<KnowledgeBase>, config: &EngineConfig) -> Self {
        let analyzer =
            QueryAnalyzer::with_knowledge(&knowledge).with_default_level(config.default_user_level);
        let generator = GuidanceGenerator::with_config(Arc::clone(&knowledge), config);
        Self {
            knowledge,
            analyzer,
            generator,
        }
    }

    /// Knowledge base snapshot
    pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge
    }

    /// Classify a query; fails with `EngineError::EmptyQuery` on blank text
    pub fn analyze_query(&self, query: &Query) -> Result<QueryAnalysis> {
        self.analyzer.analyze(query)
    }

    /// Build guidance for an analyzed query; never fails
    pub fn generate_guidance(&self, query: &Query, analysis: &QueryAnalysis) -> Guidance {
        self.generator.generate(query, analysis)
    }

    /// Analyze then generate
    pub fn answer(&self, query: &Query) -> Result<Guidance> {
        let analysis = self.analyze_query(query)?;
        Ok(self.generate_guidance(query, &analysis))
    }
}
