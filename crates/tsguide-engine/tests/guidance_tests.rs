//! Guidance generation through the engine facade

use std::sync::Arc;

use tsguide_engine::{
    EngineConfig, Guidance, GuidanceEngine, GuidanceKind, KnowledgeBase, Query, SectionKind,
    UserLevel,
};
use tsguide_knowledge::Catalog;

const EXAMPLE_QUERIES: &[&str] = &[
    "find specifications for 5G authentication",
    "explain how NAS protocol works",
    "implement SUCI encryption for identity protection",
    "compare 5G-AKA vs EPS-AKA authentication procedures",
];

fn engine() -> GuidanceEngine {
    GuidanceEngine::from_config(&EngineConfig::default()).unwrap()
}

fn answer(engine: &GuidanceEngine, text: &str, level: UserLevel) -> Guidance {
    engine.answer(&Query::new(text).with_level(level)).unwrap()
}

#[test]
fn test_required_sections_per_intent() {
    let engine = engine();
    let expected = [
        (
            EXAMPLE_QUERIES[0],
            GuidanceKind::Discovery,
            vec![
                SectionKind::Overview,
                SectionKind::SpecificationList,
                SectionKind::RelatedTopics,
            ],
        ),
        (
            EXAMPLE_QUERIES[1],
            GuidanceKind::Learning,
            vec![
                SectionKind::Overview,
                SectionKind::ConceptExplanation,
                SectionKind::LearningPath,
            ],
        ),
        (
            EXAMPLE_QUERIES[2],
            GuidanceKind::Implementation,
            vec![
                SectionKind::Overview,
                SectionKind::Requirements,
                SectionKind::ImplementationSteps,
                SectionKind::Pitfalls,
            ],
        ),
        (
            EXAMPLE_QUERIES[3],
            GuidanceKind::Comparison,
            vec![
                SectionKind::Overview,
                SectionKind::ComparisonTable,
                SectionKind::Differences,
            ],
        ),
    ];

    for (text, kind, required) in expected {
        for level in UserLevel::all() {
            let guidance = answer(&engine, text, *level);
            assert_eq!(guidance.kind, kind, "{}", text);
            let kinds = guidance.section_kinds();
            assert_eq!(&kinds[..required.len()], required.as_slice(), "{} ({})", text, level);
        }
    }
}

#[test]
fn test_levels_change_summary_and_sections() {
    let engine = engine();
    for text in EXAMPLE_QUERIES {
        let beginner = answer(&engine, text, UserLevel::Beginner);
        let expert = answer(&engine, text, UserLevel::Expert);

        assert_ne!(beginner.summary, expert.summary, "{}", text);
        assert_ne!(beginner.section_kinds(), expert.section_kinds(), "{}", text);
        assert!(beginner.section(SectionKind::Glossary).is_some());
        assert!(beginner.section(SectionKind::TechnicalDetails).is_none());
        assert!(expert.section(SectionKind::Glossary).is_none());
        assert!(expert.section(SectionKind::TechnicalDetails).is_some());
    }
}

#[test]
fn test_level_changes_section_content() {
    let engine = engine();
    let beginner = answer(&engine, EXAMPLE_QUERIES[1], UserLevel::Beginner);
    let expert = answer(&engine, EXAMPLE_QUERIES[1], UserLevel::Expert);

    let overview = |g: &Guidance| g.section(SectionKind::Overview).unwrap().content.clone();
    assert_ne!(overview(&beginner), overview(&expert));
    assert!(overview(&beginner).len() > overview(&expert).len());
}

#[test]
fn test_confidence_with_concept_and_specification() {
    let engine = engine();
    for text in EXAMPLE_QUERIES {
        let query = Query::new(*text);
        let analysis = engine.analyze_query(&query).unwrap();
        let guidance = engine.generate_guidance(&query, &analysis);

        assert!(!analysis.concepts.is_empty());
        assert!(!guidance.referenced_specifications.is_empty());
        assert!(guidance.confidence > 0.5, "{}: {}", text, guidance.confidence);
        assert!(guidance.confidence <= 1.0);
    }
}

#[test]
fn test_next_steps_and_related_topics_always_present() {
    let engine = engine();
    let texts = EXAMPLE_QUERIES
        .iter()
        .copied()
        .chain(["pizza recipes", "what is it", "compare them"]);
    for text in texts {
        for level in UserLevel::all() {
            let guidance = answer(&engine, text, *level);
            assert!(!guidance.next_steps.is_empty(), "{} ({})", text, level);
            assert!(!guidance.related_topics.is_empty(), "{} ({})", text, level);
        }
    }
}

#[test]
fn test_references_exist_in_knowledge_base() {
    let engine = engine();
    let kb = Arc::clone(engine.knowledge());
    for text in EXAMPLE_QUERIES {
        for level in UserLevel::all() {
            let guidance = answer(&engine, text, *level);
            for id in &guidance.referenced_specifications {
                assert!(kb.get_specification(id).is_some(), "{} in {}", id, text);
            }
        }
    }
}

#[test]
fn test_specification_limit_per_level() {
    let engine = engine();
    let text = "find specifications for 5G authentication";
    let listed = |level| {
        answer(&engine, text, level)
            .section(SectionKind::SpecificationList)
            .unwrap()
            .content
            .lines()
            .filter(|line| line.starts_with("- TS"))
            .count()
    };
    assert!(listed(UserLevel::Beginner) <= 3);
    assert!(listed(UserLevel::Expert) <= 8);
    assert!(listed(UserLevel::Expert) >= listed(UserLevel::Beginner));
}

#[test]
fn test_general_domain_falls_back() {
    let engine = engine();
    let guidance = answer(&engine, "pizza recipes", UserLevel::Beginner);

    assert_eq!(guidance.kind, GuidanceKind::Discovery);
    assert_eq!(guidance.confidence, 0.0);
    assert!(guidance.referenced_specifications.is_empty());
    let list = guidance.section(SectionKind::SpecificationList).unwrap();
    assert!(list.content.contains("No catalog specification"));
}

#[test]
fn test_domain_fallback_uses_starting_specs() {
    // Nothing ranks for "mobility", so the domain's starting specs are listed
    let catalog: Catalog = serde_json::from_value(serde_json::json!({
        "version": "fallback",
        "specifications": [
            {
                "id": "TS 23.502",
                "series": "23",
                "title": "Procedures for the 5G System",
                "working_group": "SA2",
                "purpose": "Stage 2 procedures"
            },
            {
                "id": "TS 38.300",
                "series": "38",
                "title": "NR overall description",
                "working_group": "RAN2",
                "purpose": "Radio overview"
            }
        ],
        "search_patterns": [
            {
                "domain": "mobility",
                "keywords": ["handover"],
                "starting_specs": ["TS 23.502", "TS 99.999"]
            }
        ]
    }))
    .unwrap();
    let kb = Arc::new(KnowledgeBase::from_catalog(catalog).unwrap());
    let engine = GuidanceEngine::with_knowledge(Arc::clone(&kb), &EngineConfig::default());

    let guidance = answer(&engine, "find handover specs", UserLevel::Intermediate);
    let list = guidance.section(SectionKind::SpecificationList).unwrap();
    assert!(list.content.contains("TS 23.502"));
    assert!(!list.content.contains("TS 99.999"));
    assert_eq!(guidance.referenced_specifications, vec!["TS 23.502"]);
    // Domain with a search pattern, nothing else
    assert!((guidance.confidence - 0.25).abs() < 1e-6);
}

#[test]
fn test_related_topics_name_only_catalog_protocols() {
    let catalog: Catalog = serde_json::from_value(serde_json::json!({
        "specifications": [
            {
                "id": "TS 24.501",
                "series": "24",
                "title": "NAS protocol for 5GS",
                "working_group": "CT1",
                "purpose": "Stage 3 NAS",
                "key_topics": ["nas"]
            }
        ],
        "protocols": [
            {
                "name": "NAS",
                "full_name": "Non-Access Stratum",
                "layer": "L3",
                "purpose": "Core signaling",
                "defining_specs": ["TS 24.501"],
                "related_protocols": ["RRC", "GHOSTP"]
            },
            {
                "name": "RRC",
                "full_name": "Radio Resource Control",
                "layer": "L3",
                "purpose": "Radio signaling",
                "related_protocols": ["NAS"]
            }
        ]
    }))
    .unwrap();
    let kb = Arc::new(KnowledgeBase::from_catalog(catalog).unwrap());
    let engine = GuidanceEngine::with_knowledge(Arc::clone(&kb), &EngineConfig::default());

    let guidance = answer(&engine, "find NAS protocol specs", UserLevel::Intermediate);
    assert_eq!(guidance.related_topics, vec!["RRC"]);
    assert!(kb.get_protocol("GHOSTP").is_none());
    for section in &guidance.sections {
        assert!(!section.content.contains("GHOSTP"), "{:?}", section.kind);
    }
}

#[test]
fn test_unbacked_terms_not_presented_as_concepts() {
    let engine = engine();
    for term in ["IMSI", "MAC", "S-NSSAI", "5GC"] {
        assert!(
            engine.knowledge().get_concept(term).is_some()
                || engine.knowledge().get_protocol(term).is_some(),
            "{} has no catalog record",
            term
        );
    }

    let guidance = answer(&engine, "explain IMSI and MAC", UserLevel::Intermediate);
    let concepts = guidance.section(SectionKind::ConceptExplanation).unwrap();
    assert!(concepts.content.contains("International Mobile Subscriber Identity"));
    assert!(concepts.content.contains("Medium Access Control"));
}

#[test]
fn test_comparison_table_lists_both_items() {
    let engine = engine();
    let guidance = answer(&engine, EXAMPLE_QUERIES[3], UserLevel::Intermediate);
    let table = guidance.section(SectionKind::ComparisonTable).unwrap();

    assert!(table.content.contains("5G-AKA"));
    assert!(table.content.contains("EPS-AKA"));
    assert!(table.content.contains("TS 33.501"));
    assert!(table.content.contains("TS 33.401"));

    let differences = guidance.section(SectionKind::Differences).unwrap();
    assert!(differences.content.contains("5G-AKA"));
}

#[test]
fn test_guidance_serializes_with_type_tag() {
    let engine = engine();
    let guidance = answer(&engine, EXAMPLE_QUERIES[0], UserLevel::Intermediate);
    let value = serde_json::to_value(&guidance).unwrap();

    assert_eq!(value["type"], "guidance");
    assert_eq!(value["sections"][0]["type"], "overview");
    assert!(value["next_steps"].as_array().is_some_and(|steps| !steps.is_empty()));
}

#[tokio::test]
async fn test_concurrent_answers_match_sequential() {
    let engine = Arc::new(engine());
    let expected: Vec<Guidance> = EXAMPLE_QUERIES
        .iter()
        .map(|text| answer(&engine, text, UserLevel::Expert))
        .collect();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let text = EXAMPLE_QUERIES[i % EXAMPLE_QUERIES.len()];
            tokio::task::spawn_blocking(move || (i, answer(&engine, text, UserLevel::Expert)))
        })
        .collect();

    for handle in handles {
        let (i, guidance) = handle.await.unwrap();
        assert_eq!(guidance, expected[i % EXAMPLE_QUERIES.len()]);
    }
}
