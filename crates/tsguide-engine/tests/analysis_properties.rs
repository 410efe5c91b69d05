//! Property-based tests for query analysis
//!
//! For any non-empty query: complexity is positive, the level resolves to the
//! supplied one or intermediate, analysis is idempotent, and adding a concept
//! never lowers complexity for the same intent.

use proptest::prelude::*;
use tsguide_engine::{Query, QueryAnalyzer, UserLevel};

fn query_text() -> impl Strategy<Value = String> {
    let words = prop_oneof![
        Just("find"),
        Just("explain"),
        Just("implement"),
        Just("compare"),
        Just("vs"),
        Just("how"),
        Just("does"),
        Just("5G"),
        Just("NAS"),
        Just("SUCI"),
        Just("EPS-AKA"),
        Just("handover"),
        Just("charging"),
        Just("the"),
        Just("pizza"),
    ];
    prop::collection::vec(words, 1..8).prop_map(|words| words.join(" "))
}

fn level() -> impl Strategy<Value = Option<UserLevel>> {
    prop_oneof![
        Just(None),
        Just(Some(UserLevel::Beginner)),
        Just(Some(UserLevel::Intermediate)),
        Just(Some(UserLevel::Expert)),
    ]
}

fn query(text: String, level: Option<UserLevel>) -> Query {
    Query {
        text,
        user_level: level,
    }
}

proptest! {
    #[test]
    fn prop_complexity_is_positive(text in query_text(), level in level()) {
        let analysis = QueryAnalyzer::new().analyze(&query(text, level)).unwrap();
        prop_assert!(analysis.complexity > 0.0);
    }

    #[test]
    fn prop_level_resolution(text in query_text(), level in level()) {
        let analysis = QueryAnalyzer::new().analyze(&query(text, level)).unwrap();
        prop_assert_eq!(analysis.user_level, level.unwrap_or(UserLevel::Intermediate));
    }

    #[test]
    fn prop_analysis_is_idempotent(text in query_text(), level in level()) {
        let analyzer = QueryAnalyzer::new();
        let query = query(text, level);
        prop_assert_eq!(analyzer.analyze(&query).unwrap(), analyzer.analyze(&query).unwrap());
    }

    #[test]
    fn prop_concepts_are_unique(text in query_text()) {
        let analysis = QueryAnalyzer::new().analyze(&Query::new(text)).unwrap();
        let mut sorted = analysis.concepts.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), analysis.concepts.len());
    }

    #[test]
    fn prop_extra_concept_never_lowers_complexity(text in query_text()) {
        let analyzer = QueryAnalyzer::new();
        let base = analyzer.analyze(&Query::new(text.clone())).unwrap();
        let extended = analyzer.analyze(&Query::new(format!("{} SUPI", text))).unwrap();

        prop_assert_eq!(base.intent, extended.intent);
        prop_assert!(extended.concepts.len() >= base.concepts.len());
        prop_assert!(extended.complexity >= base.complexity);
    }
}
