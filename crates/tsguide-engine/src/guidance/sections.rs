//! Section builders and the per-kind dispatch table

use std::collections::BTreeSet;

use tsguide_knowledge::Specification;

use super::context::{ComparisonItem, ConceptEntry, GuidanceContext};
use crate::models::{GuidanceKind, Section, SectionKind, UserLevel};

/// Builds one section from the resolved context
pub type SectionBuilder = for<'c, 'a> fn(&'c GuidanceContext<'a>) -> Section;

const DISCOVERY_PLAN: &[(SectionKind, SectionBuilder)] = &[
    (SectionKind::Overview, overview as SectionBuilder),
    (SectionKind::SpecificationList, specification_list as SectionBuilder),
    (SectionKind::RelatedTopics, related_topics as SectionBuilder),
];

const LEARNING_PLAN: &[(SectionKind, SectionBuilder)] = &[
    (SectionKind::Overview, overview as SectionBuilder),
    (SectionKind::ConceptExplanation, concept_explanation as SectionBuilder),
    (SectionKind::LearningPath, learning_path as SectionBuilder),
];

const IMPLEMENTATION_PLAN: &[(SectionKind, SectionBuilder)] = &[
    (SectionKind::Overview, overview as SectionBuilder),
    (SectionKind::Requirements, requirements as SectionBuilder),
    (SectionKind::ImplementationSteps, implementation_steps as SectionBuilder),
    (SectionKind::Pitfalls, pitfalls as SectionBuilder),
];

const COMPARISON_PLAN: &[(SectionKind, SectionBuilder)] = &[
    (SectionKind::Overview, overview as SectionBuilder),
    (SectionKind::ComparisonTable, comparison_table as SectionBuilder),
    (SectionKind::Differences, differences as SectionBuilder),
];

impl GuidanceKind {
    /// Required sections, in order, with their builders
    pub fn section_plan(&self) -> &'static [(SectionKind, SectionBuilder)] {
        match self {
            GuidanceKind::Discovery => DISCOVERY_PLAN,
            GuidanceKind::Learning => LEARNING_PLAN,
            GuidanceKind::Implementation => IMPLEMENTATION_PLAN,
            GuidanceKind::Comparison => COMPARISON_PLAN,
        }
    }
}

/// Level-gated sections appended after the required ones
pub fn level_extras(ctx: &GuidanceContext<'_>) -> Vec<(SectionKind, SectionBuilder)> {
    let mut extras: Vec<(SectionKind, SectionBuilder)> = Vec::new();
    if ctx.profile.glossary {
        extras.push((SectionKind::Glossary, glossary as SectionBuilder));
    }
    if ctx.profile.technical_details {
        extras.push((SectionKind::TechnicalDetails, technical_details as SectionBuilder));
    }
    extras
}

/// One-paragraph answer, worded per level
pub fn summary(ctx: &GuidanceContext<'_>) -> String {
    let lead = match ctx.kind {
        GuidanceKind::Discovery => format!("specifications covering {}", ctx.subject()),
        GuidanceKind::Learning => {
            let plural = ctx.concepts.len() > 1
                || (ctx.concepts.is_empty() && !ctx.analysis.has_domain());
            format!("how {} {}", ctx.subject(), if plural { "work" } else { "works" })
        }
        GuidanceKind::Implementation => format!("implementing {}", ctx.subject()),
        GuidanceKind::Comparison => format!("how {} compare", comparison_names(ctx)),
    };
    let specs = &ctx.specifications;

    match (ctx.profile.level, specs.first()) {
        (UserLevel::Beginner, Some(first)) => format!(
            "This guide walks you through {}. Start with {} ({}), then work through the sections in order; new terms are explained in the glossary.",
            lead, first.title, first.id
        ),
        (UserLevel::Beginner, None) => format!(
            "This guide walks you through {}. The catalog has no exact match, so it points to general starting material and explains the terms involved.",
            lead
        ),
        (UserLevel::Intermediate, Some(_)) => format!(
            "Guidance on {}, anchored on {}.",
            lead,
            id_list(specs.iter().take(3).copied())
        ),
        (UserLevel::Intermediate, None) => {
            format!("Guidance on {}; no catalog specification matched directly.", lead)
        }
        (UserLevel::Expert, Some(_)) => {
            format!("{}: {}.", capitalize(&lead), id_list(specs.iter().copied()))
        }
        (UserLevel::Expert, None) => format!("{}: no direct catalog match.", capitalize(&lead)),
    }
}

fn overview(ctx: &GuidanceContext<'_>) -> Section {
    let subject = ctx.subject();
    let count = ctx.specifications.len();
    let level = ctx.profile.level;

    let mut content = match ctx.kind {
        GuidanceKind::Discovery => level.pick(
            format!(
                "3GPP publishes its standards as Technical Specifications (TS), grouped into numbered series. For {}, {} specifications in the catalog are good places to start; each entry below says what it covers.",
                subject, count
            ),
            format!("{} catalog specifications cover {}{}.", count, subject, series_note(ctx)),
            format!("{}: {} matches{}.", subject, count, series_note(ctx)),
        ),
        GuidanceKind::Learning => level.pick(
            format!(
                "This explanation introduces {} step by step. It starts with what each term means and ends with the specifications to read, in order.",
                subject
            ),
            format!("Key concepts and a reading path for {}.", subject),
            format!("{}: definitions and normative references.", subject),
        ),
        GuidanceKind::Implementation => level.pick(
            format!(
                "Implementing {} means turning specification requirements into working code. The sections below list what the specifications require, the order to build things in, and mistakes to avoid.",
                subject
            ),
            format!("Requirements and an implementation plan for {}.", subject),
            format!("{}: normative requirements and build plan.", subject),
        ),
        GuidanceKind::Comparison => {
            let names = comparison_names(ctx);
            level.pick(
                format!(
                    "Comparing {} side by side shows how each one approaches the same problem. The table lists the items, then the differences are spelled out.",
                    names
                ),
                format!("Side-by-side comparison of {}.", names),
                format!("{}: comparison.", names),
            )
        }
    };

    if level != UserLevel::Expert {
        if let Some(pattern) = ctx.pattern {
            content.push_str(&format!(
                " {} Expect this to take about {}.",
                pattern.description, pattern.time_estimate
            ));
        }
    }
    if ctx.specifications.is_empty() && ctx.concepts.is_empty() {
        content.push_str(" The catalog has no direct match, so the guidance below stays general.");
    }

    Section::new(SectionKind::Overview, "Overview", content)
}

fn specification_list(ctx: &GuidanceContext<'_>) -> Section {
    let content = if ctx.specifications.is_empty() {
        "No catalog specification matches this query. Name a protocol or feature such as NAS, RRC, or SUCI to narrow the search.".to_string()
    } else {
        lines(ctx.specifications.iter().map(|spec| {
            let deps = spec.dependencies.iter().cloned().collect::<Vec<_>>().join(", ");
            match ctx.profile.level {
                UserLevel::Beginner => format!("- {}: {}. {}", spec.id, spec.title, spec.purpose),
                UserLevel::Intermediate if !deps.is_empty() => format!(
                    "- {} ({}): {} [depends on {}]",
                    spec.id, spec.working_group, spec.title, deps
                ),
                UserLevel::Intermediate => {
                    format!("- {} ({}): {}", spec.id, spec.working_group, spec.title)
                }
                UserLevel::Expert if !deps.is_empty() => {
                    format!("- {} [{}] {}; deps: {}", spec.id, spec.working_group, spec.title, deps)
                }
                UserLevel::Expert => format!("- {} [{}] {}", spec.id, spec.working_group, spec.title),
            }
        }))
    };

    Section::new(SectionKind::SpecificationList, "Relevant specifications", content)
}

fn related_topics(ctx: &GuidanceContext<'_>) -> Section {
    let topics = ctx.related_topics();
    let mut content = lines(topics.iter().map(|topic| format!("- {}", topic)));
    if ctx.profile.level == UserLevel::Beginner {
        content.insert_str(0, "Once the basics are clear, these topics are natural next reads:\n");
    }
    Section::new(SectionKind::RelatedTopics, "Related topics", content)
}

fn concept_explanation(ctx: &GuidanceContext<'_>) -> Section {
    let content = if ctx.concepts.is_empty() {
        match ctx.search_pattern {
            Some(pattern) => format!(
                "No specific term was recognized. Questions about {} usually involve: {}.",
                ctx.domain_label(),
                pattern.keywords.iter().cloned().collect::<Vec<_>>().join(", ")
            ),
            None => "No specific term was recognized. Name a protocol or feature (for example NAS or SUCI) for a focused explanation.".to_string(),
        }
    } else {
        lines(ctx.concepts.iter().map(|entry| explain(ctx, entry)))
    };

    Section::new(SectionKind::ConceptExplanation, "Concepts", content)
}

fn explain(ctx: &GuidanceContext<'_>, entry: &ConceptEntry<'_>) -> String {
    let Some(concept) = entry.concept else {
        return format!(
            "- {} ({}): {}",
            entry.name,
            entry.full_name(),
            entry.description()
        );
    };

    let specs = ctx.known_ids(entry.spec_ids()).join(", ");
    let mut line = match ctx.profile.level {
        UserLevel::Beginner if !concept.description.is_empty() => format!(
            "- {} ({}): {}",
            concept.name, concept.full_name, concept.description
        ),
        UserLevel::Beginner => format!(
            "- {} ({}) is a {} concept.",
            concept.name, concept.full_name, concept.category
        ),
        UserLevel::Intermediate => {
            let mut line = format!(
                "- {} ({}, {}): {}",
                concept.name, concept.full_name, concept.category, concept.description
            );
            if !specs.is_empty() {
                line.push_str(&format!(" Defined in {}.", specs));
            }
            line
        }
        UserLevel::Expert => {
            let mut line = format!("- {}: {} [{}]", concept.name, concept.full_name, concept.category);
            if !specs.is_empty() {
                line.push_str(&format!("; see {}", specs));
            }
            line
        }
    };

    if ctx.profile.procedures {
        if let Some(protocol) = entry.protocol {
            line.push_str(&format!(
                "; {} layer, procedures: {}",
                protocol.layer,
                protocol.procedures.join(", ")
            ));
        }
    }
    line
}

fn learning_path(ctx: &GuidanceContext<'_>) -> Section {
    let order = ctx.reading_order();
    let mut content = if order.is_empty() {
        match ctx.pattern {
            Some(pattern) => numbered(pattern.steps.iter().map(|step| {
                format!("{}: {}", step.phase, step.tasks.join("; "))
            })),
            None => "1. Read the architecture specification of the topic\n2. Follow one procedure end to end\n3. Study the message definitions".to_string(),
        }
    } else {
        numbered(order.iter().map(|spec| match ctx.profile.level {
            UserLevel::Beginner => format!("Read {} ({}): {}", spec.id, spec.title, spec.purpose),
            UserLevel::Intermediate => format!("{}: {}", spec.id, spec.title),
            UserLevel::Expert => {
                let deps = ctx.known_ids(&spec.dependencies);
                if deps.is_empty() {
                    spec.id.clone()
                } else {
                    format!("{} (after {})", spec.id, deps.join(", "))
                }
            }
        }))
    };

    if let Some(pattern) = ctx.pattern {
        match ctx.profile.level {
            UserLevel::Beginner => {
                let tips: Vec<&str> = pattern
                    .steps
                    .iter()
                    .flat_map(|step| step.tips.iter().map(String::as_str))
                    .collect();
                if !tips.is_empty() {
                    content.push_str("\n\nTips:\n");
                    content.push_str(&lines(tips.iter().map(|tip| format!("- {}", tip))));
                }
            }
            UserLevel::Intermediate => {
                let phases: Vec<&str> = pattern.steps.iter().map(|s| s.phase.as_str()).collect();
                content.push_str(&format!("\n\nApproach: {}", phases.join(" -> ")));
            }
            UserLevel::Expert => {}
        }
    }

    Section::new(SectionKind::LearningPath, "Learning path", content)
}

fn requirements(ctx: &GuidanceContext<'_>) -> Section {
    let specs = ctx.implementation_specifications();
    let content = if specs.is_empty() {
        let mut text = format!(
            "No catalog specification with implementation notes matches. Start from the normative Stage 3 specification for {}.",
            ctx.subject()
        );
        if !ctx.specifications.is_empty() {
            text.push_str(&format!(
                " Closest matches: {}.",
                id_list(ctx.specifications.iter().copied())
            ));
        }
        text
    } else {
        lines(specs.iter().map(|spec| match ctx.profile.level {
            UserLevel::Beginner => format!(
                "- {} ({}): {}",
                spec.id,
                spec.title,
                spec.implementation_notes.first().map(String::as_str).unwrap_or_default()
            ),
            UserLevel::Intermediate => format!(
                "- {}: {}",
                spec.id,
                spec.implementation_notes.iter().take(2).cloned().collect::<Vec<_>>().join(" ")
            ),
            UserLevel::Expert => {
                let mut block = format!("- {}", spec.id);
                for note in &spec.implementation_notes {
                    block.push_str(&format!("\n  - {}", note));
                }
                block
            }
        }))
    };

    Section::new(SectionKind::Requirements, "Requirements", content)
}

fn implementation_steps(ctx: &GuidanceContext<'_>) -> Section {
    let mut content = match ctx.pattern {
        Some(pattern) => numbered(pattern.steps.iter().map(|step| {
            let mut line = format!("{}: {}", step.phase, step.tasks.join("; "));
            match ctx.profile.level {
                UserLevel::Beginner if !step.tips.is_empty() => {
                    line.push_str(&format!(" (tip: {})", step.tips.join(" ")));
                }
                UserLevel::Intermediate if !step.deliverables.is_empty() => {
                    line.push_str(&format!(" -> {}", step.deliverables.join(", ")));
                }
                _ => {}
            }
            line
        })),
        None => numbered(
            [
                "Extract the normative requirements",
                "Design components and message codecs",
                "Implement and run conformance tests",
            ]
            .iter()
            .map(|step| step.to_string()),
        ),
    };

    if let Some(first) = ctx.implementation_specifications().first() {
        content.push_str(&format!("\n\nPrimary reference: {} ({})", first.id, first.title));
    }

    Section::new(SectionKind::ImplementationSteps, "Implementation steps", content)
}

fn pitfalls(ctx: &GuidanceContext<'_>) -> Section {
    let mut items: Vec<String> = ctx
        .pattern
        .map(|pattern| pattern.common_pitfalls.clone())
        .unwrap_or_default();
    if items.is_empty() {
        items = vec![
            "Implementing from an outdated release".to_string(),
            "Skipping error and timer paths".to_string(),
        ];
    }

    let content = match ctx.profile.level {
        UserLevel::Beginner => format!(
            "{}\n\nReview the requirements list with someone familiar with the specifications before writing code.",
            lines(items.iter().map(|item| format!("- {}", item)))
        ),
        UserLevel::Intermediate => lines(items.iter().map(|item| format!("- {}", item))),
        UserLevel::Expert => format!("Watch for: {}.", items.join("; ")),
    };
    Section::new(SectionKind::Pitfalls, "Common pitfalls", content)
}

fn comparison_table(ctx: &GuidanceContext<'_>) -> Section {
    let items = ctx.comparison_items();
    let level = ctx.profile.level;
    let mut rows: Vec<String> = Vec::with_capacity(items.len() + 2);

    let concepts = matches!(items.first(), Some(ComparisonItem::Concept(_)));
    let header: &[&str] = match (concepts, level) {
        (true, UserLevel::Beginner) => &["Item", "Full name", "What it is"],
        (true, UserLevel::Intermediate) => &["Item", "Full name", "Category", "Defined in"],
        (true, UserLevel::Expert) => &["Item", "Category", "Defined in"],
        (false, UserLevel::Expert) => &["Spec", "Working group", "Series"],
        (false, _) => &["Spec", "Title", "Working group"],
    };
    rows.push(format!("| {} |", header.join(" | ")));
    rows.push(format!("|{}", "---|".repeat(header.len())));

    for item in &items {
        let cells: Vec<String> = match item {
            ComparisonItem::Concept(entry) => {
                let specs = ctx.known_ids(entry.spec_ids()).join(", ");
                match level {
                    UserLevel::Beginner => vec![
                        entry.name.to_string(),
                        entry.full_name().to_string(),
                        entry.description().to_string(),
                    ],
                    UserLevel::Intermediate => vec![
                        entry.name.to_string(),
                        entry.full_name().to_string(),
                        entry.category().to_string(),
                        specs,
                    ],
                    UserLevel::Expert => {
                        vec![entry.name.to_string(), entry.category().to_string(), specs]
                    }
                }
            }
            ComparisonItem::Specification(spec) => match level {
                UserLevel::Expert => vec![
                    spec.id.clone(),
                    spec.working_group.clone(),
                    spec.series.clone(),
                ],
                _ => vec![spec.id.clone(), spec.title.clone(), spec.working_group.clone()],
            },
        };
        rows.push(format!("| {} |", cells.join(" | ")));
    }

    let mut content = rows.join("\n");
    if items.len() < 2 {
        content.push_str("\n\nName at least two items to get a full comparison.");
    }
    Section::new(SectionKind::ComparisonTable, "Comparison", content)
}

fn differences(ctx: &GuidanceContext<'_>) -> Section {
    let items = ctx.comparison_items();
    let mut entries = Vec::new();
    for (index, a) in items.iter().enumerate() {
        for b in &items[index + 1..] {
            entries.push(difference(ctx, a, b));
        }
    }

    let mut content = if entries.is_empty() {
        "Not enough items were recognized to list differences.".to_string()
    } else {
        lines(entries.into_iter())
    };
    if ctx.profile.level == UserLevel::Beginner {
        let tips: Vec<&str> = ctx
            .pattern
            .iter()
            .flat_map(|pattern| pattern.steps.iter())
            .flat_map(|step| step.tips.iter().map(String::as_str))
            .collect();
        if !tips.is_empty() {
            content.push_str(&format!("\n\nTip: {}", tips.join(" ")));
        }
    }
    Section::new(SectionKind::Differences, "Differences", content)
}

fn difference(ctx: &GuidanceContext<'_>, a: &ComparisonItem<'_>, b: &ComparisonItem<'_>) -> String {
    let expert = ctx.profile.level == UserLevel::Expert;
    match (a, b) {
        (ComparisonItem::Concept(x), ComparisonItem::Concept(y)) => {
            let x_specs: BTreeSet<&str> = ctx.known_ids(x.spec_ids()).into_iter().collect();
            let y_specs: BTreeSet<&str> = ctx.known_ids(y.spec_ids()).into_iter().collect();
            let only_x = join_set(x_specs.difference(&y_specs).copied());
            let only_y = join_set(y_specs.difference(&x_specs).copied());

            if expert {
                return format!(
                    "- {} vs {}: category {}/{}; specs {}/{}",
                    x.name,
                    y.name,
                    x.category(),
                    y.category(),
                    or_dash(&only_x),
                    or_dash(&only_y)
                );
            }

            let mut line = if x.category() == y.category() {
                format!("- {} and {} are both {} concepts.", x.name, y.name, x.category())
            } else {
                format!(
                    "- {} is a {} concept while {} is a {} concept.",
                    x.name,
                    x.category(),
                    y.name,
                    y.category()
                )
            };
            if !only_x.is_empty() || !only_y.is_empty() {
                line.push_str(&format!(
                    " {} is specified in {}; {} in {}.",
                    x.name,
                    or_dash(&only_x),
                    y.name,
                    or_dash(&only_y)
                ));
            }
            if ctx.profile.level == UserLevel::Beginner {
                line.push_str(&format!(" {} {}", x.description(), y.description()));
            }
            line
        }
        (ComparisonItem::Specification(x), ComparisonItem::Specification(y)) => {
            let only_x = join_set(x.key_topics.difference(&y.key_topics).map(String::as_str));
            let only_y = join_set(y.key_topics.difference(&x.key_topics).map(String::as_str));
            if expert {
                format!(
                    "- {} vs {}: {}/{}; topics {}/{}",
                    x.id, y.id, x.working_group, y.working_group, or_dash(&only_x), or_dash(&only_y)
                )
            } else {
                format!(
                    "- {} ({}) focuses on {} while {} ({}) focuses on {}.",
                    x.id,
                    x.working_group,
                    or_dash(&only_x),
                    y.id,
                    y.working_group,
                    or_dash(&only_y)
                )
            }
        }
        _ => format!("- {} and {} are different kinds of item.", a.name(), b.name()),
    }
}

fn glossary(ctx: &GuidanceContext<'_>) -> Section {
    let beginner = ctx.profile.level == UserLevel::Beginner;
    let mut seen = BTreeSet::new();
    let mut entries = vec!["- TS: Technical Specification, the 3GPP document prefix".to_string()];

    for concept in ctx.concepts.iter().filter_map(|entry| entry.concept) {
        if seen.insert(concept.name.as_str()) {
            entries.push(if beginner && !concept.description.is_empty() {
                format!("- {}: {}. {}", concept.name, concept.full_name, concept.description)
            } else {
                format!("- {}: {}", concept.name, concept.full_name)
            });
        }
    }
    for protocol in ctx.protocols() {
        if seen.insert(protocol.name.as_str()) {
            entries.push(if beginner {
                format!("- {}: {}. {}", protocol.name, protocol.full_name, protocol.purpose)
            } else {
                format!("- {}: {}", protocol.name, protocol.full_name)
            });
        }
    }

    Section::new(SectionKind::Glossary, "Glossary", lines(entries.into_iter()))
}

fn technical_details(ctx: &GuidanceContext<'_>) -> Section {
    let mut blocks: Vec<String> = ctx
        .specifications
        .iter()
        .map(|spec| {
            let deps = ctx.known_ids(&spec.dependencies);
            let mut line = format!(
                "- {}: depends on {}",
                spec.id,
                if deps.is_empty() { "none".to_string() } else { deps.join(", ") }
            );
            if ctx.profile.procedures {
                for protocol in ctx.knowledge.protocols_for_specification(&spec.id) {
                    line.push_str(&format!(
                        "; {} ({} layer): {}",
                        protocol.name,
                        protocol.layer,
                        protocol.procedures.join(", ")
                    ));
                }
            }
            line
        })
        .collect();

    if let Some(pattern) = ctx.search_pattern.filter(|pattern| !pattern.series.is_empty()) {
        let series: Vec<&str> = pattern.series.iter().map(String::as_str).collect();
        blocks.push(format!("- Series to browse: {}", series.join(", ")));
    }
    let content = if blocks.is_empty() {
        "No specification details are available for this query.".to_string()
    } else {
        lines(blocks.into_iter())
    };
    Section::new(SectionKind::TechnicalDetails, "Technical details", content)
}

fn series_note(ctx: &GuidanceContext<'_>) -> String {
    match ctx.search_pattern {
        Some(pattern) if !pattern.series.is_empty() => format!(
            " in series {}",
            pattern.series.iter().cloned().collect::<Vec<_>>().join(", ")
        ),
        _ => String::new(),
    }
}

fn comparison_names(ctx: &GuidanceContext<'_>) -> String {
    let items = ctx.comparison_items();
    match items.as_slice() {
        [] => ctx.subject(),
        [only] => only.name().to_string(),
        many => many.iter().map(ComparisonItem::name).collect::<Vec<_>>().join(" and "),
    }
}

fn id_list<'s>(specs: impl Iterator<Item = &'s Specification>) -> String {
    specs.map(|spec| spec.id.as_str()).collect::<Vec<_>>().join(", ")
}

fn join_set<'s>(items: impl Iterator<Item = &'s str>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

fn lines(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join("\n")
}

fn numbered(items: impl Iterator<Item = String>) -> String {
    lines(items.enumerate().map(|(i, item)| format!("{}. {}", i + 1, item)))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plans_start_with_overview() {
        for kind in [
            GuidanceKind::Discovery,
            GuidanceKind::Learning,
            GuidanceKind::Implementation,
            GuidanceKind::Comparison,
        ] {
            let plan = kind.section_plan();
            assert_eq!(plan[0].0, SectionKind::Overview);
        }
    }

    #[test]
    fn test_plan_kinds() {
        let kinds: Vec<SectionKind> = GuidanceKind::Implementation
            .section_plan()
            .iter()
            .map(|(kind, _)| *kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Overview,
                SectionKind::Requirements,
                SectionKind::ImplementationSteps,
                SectionKind::Pitfalls,
            ]
        );
    }

    fn with_context<R>(text: &str, level: UserLevel, f: impl FnOnce(&GuidanceContext<'_>) -> R) -> R {
        use crate::{analysis::QueryAnalyzer, models::Query};
        use tsguide_knowledge::{KnowledgeBase, RelevanceRanker};

        let kb = KnowledgeBase::load_default().unwrap();
        let query = Query::new(text).with_level(level);
        let analysis = QueryAnalyzer::with_knowledge(&kb).analyze(&query).unwrap();
        let context = GuidanceContext::new(&query, &analysis, &kb, &RelevanceRanker::new());
        f(&context)
    }

    #[test]
    fn test_learning_summary_reads_naturally() {
        let single = with_context("explain how NAS protocol works", UserLevel::Intermediate, summary);
        assert!(single.starts_with("Guidance on how NAS works"), "{}", single);

        let pair = with_context("explain NAS and RRC", UserLevel::Intermediate, summary);
        assert!(pair.starts_with("Guidance on how NAS and RRC work"), "{}", pair);

        let expert = with_context("explain NAS and RRC", UserLevel::Expert, summary);
        assert!(expert.starts_with("How NAS and RRC work"), "{}", expert);
        assert!(!expert.contains("introduction to"));
    }

    #[test]
    fn test_pitfalls_differ_per_level() {
        let text = "implement SUCI encryption for identity protection";
        let beginner = with_context(text, UserLevel::Beginner, pitfalls).content;
        let intermediate = with_context(text, UserLevel::Intermediate, pitfalls).content;
        let expert = with_context(text, UserLevel::Expert, pitfalls).content;

        assert_ne!(intermediate, expert);
        assert_ne!(beginner, intermediate);
        assert!(intermediate.starts_with("- "));
        assert!(expert.starts_with("Watch for: "));
        assert!(!expert.contains('\n'));
    }

    #[test]
    fn test_unbacked_terms_stay_out_of_concepts() {
        use crate::{analysis::QueryAnalyzer, models::Query};
        use tsguide_knowledge::{Catalog, KnowledgeBase, RelevanceRanker};

        let catalog: Catalog = serde_json::from_value(serde_json::json!({
            "concepts": [
                {"name": "NAS", "full_name": "Non-Access Stratum", "category": "protocol"}
            ]
        }))
        .unwrap();
        let kb = KnowledgeBase::from_catalog(catalog).unwrap();
        let query = Query::new("compare IMSI vs NAS vs MAC").with_level(UserLevel::Intermediate);
        let analysis = QueryAnalyzer::with_knowledge(&kb).analyze(&query).unwrap();
        assert_eq!(analysis.concepts, vec!["IMSI", "NAS", "MAC"]);

        let ctx = GuidanceContext::new(&query, &analysis, &kb, &RelevanceRanker::new());
        let explained = concept_explanation(&ctx).content;
        assert!(explained.contains("NAS"));
        assert!(!explained.contains("IMSI"));
        assert!(!explained.contains("MAC"));
        assert!(!summary(&ctx).contains("IMSI"));
        assert!(!comparison_table(&ctx).content.contains("IMSI"));
    }

    #[test]
    fn test_numbered_and_capitalize() {
        let text = numbered(["a".to_string(), "b".to_string()].into_iter());
        assert_eq!(text, "1. a\n2. b");
        assert_eq!(capitalize("how x compare"), "How x compare");
        assert_eq!(or_dash(""), "-");
    }
}
