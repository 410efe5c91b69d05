use std::{collections::BTreeSet, sync::Arc};

use tracing::info;
use tsguide_knowledge::{KnowledgeBase, RelevanceRanker};

use super::{
    confidence::confidence,
    context::{ComparisonItem, GuidanceContext},
    sections::{level_extras, summary},
};
use crate::{
    config::{ConfidenceWeights, EngineConfig},
    models::{Guidance, GuidanceKind, Query, QueryAnalysis, UserLevel},
};

const FALLBACK_STEP: &str =
    "Rephrase the question with a specific protocol, feature, or specification number";

/// Assembles [`Guidance`] from a query analysis and knowledge-base lookups
#[derive(Debug, Clone)]
pub struct GuidanceGenerator {
    knowledge: Arc<KnowledgeBase>,
    ranker: RelevanceRanker,
    weights: ConfidenceWeights,
}

impl GuidanceGenerator {
    /// Generator with default ranking and confidence weights
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            knowledge,
            ranker: RelevanceRanker::new(),
            weights: ConfidenceWeights::default(),
        }
    }

    /// Generator with weights taken from configuration
    pub fn with_config(knowledge: Arc<KnowledgeBase>, config: &EngineConfig) -> Self {
        Self {
            knowledge,
            ranker: RelevanceRanker::with_weights(config.ranking),
            weights: config.confidence,
        }
    }

    /// Knowledge base the generator reads
    pub fn knowledge(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge
    }

    /// Build guidance for an analyzed query.
    ///
    /// Never fails: lookup misses degrade to generic content.
    pub fn generate(&self, query: &Query, analysis: &QueryAnalysis) -> Guidance {
        let ctx = GuidanceContext::new(query, analysis, &self.knowledge, &self.ranker);

        let sections: Vec<_> = ctx
            .kind
            .section_plan()
            .iter()
            .copied()
            .chain(level_extras(&ctx))
            .map(|(_, build)| build(&ctx))
            .collect();

        let summary = summary(&ctx);
        let confidence = confidence(&ctx.evidence(), &self.weights);
        let next_steps = next_steps(&ctx);
        let related_topics = ctx.related_topics();

        let mut mentioned = summary.clone();
        for text in sections
            .iter()
            .map(|section| section.content.as_str())
            .chain(next_steps.iter().map(String::as_str))
            .chain(related_topics.iter().map(String::as_str))
        {
            mentioned.push('\n');
            mentioned.push_str(text);
        }
        let referenced_specifications = referenced_specifications(&self.knowledge, &mentioned);

        info!(
            "Generated {} guidance: level={}, confidence={:.2}, sections={}, specifications={}",
            ctx.kind,
            analysis.user_level,
            confidence,
            sections.len(),
            referenced_specifications.len()
        );

        Guidance {
            kind: ctx.kind,
            summary,
            sections,
            confidence,
            next_steps,
            related_topics,
            referenced_specifications,
        }
    }
}

fn next_steps(ctx: &GuidanceContext<'_>) -> Vec<String> {
    let mut steps = Vec::new();

    match ctx.kind {
        GuidanceKind::Discovery => {
            if let Some(first) = ctx.specifications.first() {
                steps.push(format!("Open {} and read its scope clause", first.id));
                if let Some(related) = ctx.knowledge.get_related_specifications(&first.id).first() {
                    steps.push(format!(
                        "Then look at {}, which overlaps with {}",
                        related.id, first.id
                    ));
                }
            }
        }
        GuidanceKind::Learning => {
            if let Some(first) = ctx.reading_order().first() {
                steps.push(format!("Start reading with {}", first.id));
            }
            if let Some(procedure) = ctx
                .protocols()
                .first()
                .and_then(|protocol| protocol.procedures.first())
            {
                steps.push(format!("Walk through the {} procedure end to end", procedure));
            }
        }
        GuidanceKind::Implementation => {
            if let Some(first) = ctx.implementation_specifications().first() {
                steps.push(format!("Build a requirements checklist from {}", first.id));
            }
            steps.push("Set up conformance tests before the first integration run".to_string());
        }
        GuidanceKind::Comparison => {
            let mut ids = BTreeSet::new();
            for item in ctx.comparison_items() {
                match item {
                    ComparisonItem::Concept(entry) => {
                        ids.extend(ctx.known_ids(entry.spec_ids()));
                    }
                    ComparisonItem::Specification(spec) => {
                        ids.insert(spec.id.as_str());
                    }
                }
            }
            if !ids.is_empty() {
                steps.push(format!(
                    "Read the defining specifications side by side: {}",
                    ids.into_iter().collect::<Vec<_>>().join(", ")
                ));
            }
        }
    }

    if let Some(pattern) = ctx.pattern {
        steps.push(format!(
            "Follow the {} approach ({})",
            pattern.name, pattern.time_estimate
        ));
    }
    match ctx.profile.level {
        UserLevel::Beginner => {
            steps.push("Review the glossary terms before opening the specifications".to_string())
        }
        UserLevel::Expert => steps.push(
            "Check the latest release of each listed specification for change requests"
                .to_string(),
        ),
        UserLevel::Intermediate => {}
    }

    if steps.is_empty() {
        steps.push(FALLBACK_STEP.to_string());
    }
    steps
}

/// Ids of catalog specifications mentioned in `text`, in order of first mention
fn referenced_specifications(knowledge: &KnowledgeBase, text: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = knowledge
        .specifications()
        .filter_map(|spec| first_mention(text, &spec.id).map(|position| (position, spec.id.as_str())))
        .collect();
    found.sort_unstable();
    found.into_iter().map(|(_, id)| id.to_string()).collect()
}

fn first_mention(text: &str, id: &str) -> Option<usize> {
    text.match_indices(id)
        .map(|(position, _)| position)
        .find(|position| {
            !text[position + id.len()..].starts_with(|c: char| c.is_ascii_digit() || c == '-')
        })
}
