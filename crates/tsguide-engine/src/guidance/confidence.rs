use crate::config::ConfidenceWeights;

/// Evidence gathered while generating guidance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evidence {
    /// A domain other than "general" was resolved
    pub domain_resolved: bool,
    /// The resolved domain has a search pattern
    pub search_pattern: bool,
    /// Number of recognized concepts
    pub concepts: usize,
    /// Number of ranked specifications
    pub ranked_specifications: usize,
}

/// Confidence in [0, 1].
///
/// Zero only when there is no domain, no concept, and no ranked specification.
pub fn confidence(evidence: &Evidence, weights: &ConfidenceWeights) -> f32 {
    let domain = match (evidence.domain_resolved, evidence.search_pattern) {
        (true, true) => weights.search_pattern,
        (true, false) => weights.domain_only,
        (false, _) => 0.0,
    };
    let concepts = graded(
        evidence.concepts,
        weights.concept,
        weights.extra_concept,
        weights.concept_cap,
    );
    let specifications = graded(
        evidence.ranked_specifications,
        weights.specification,
        weights.extra_specification,
        weights.specification_cap,
    );

    (domain + concepts + specifications).clamp(0.0, 1.0)
}

fn graded(count: usize, base: f32, extra: f32, cap: f32) -> f32 {
    match count {
        0 => 0.0,
        n => (base + extra * (n - 1) as f32).min(cap),
    }
}
