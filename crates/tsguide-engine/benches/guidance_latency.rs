use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tsguide_engine::{EngineConfig, GuidanceEngine, Query, UserLevel};

fn benchmark_analyze(c: &mut Criterion) {
    let engine = GuidanceEngine::from_config(&EngineConfig::default()).unwrap();
    let query = black_box(Query::new("compare 5G-AKA vs EPS-AKA authentication procedures"));

    c.bench_function("analyze_query", |b| b.iter(|| engine.analyze_query(&query)));
}

fn benchmark_answer(c: &mut Criterion) {
    let engine = GuidanceEngine::from_config(&EngineConfig::default()).unwrap();
    let queries: Vec<Query> = [
        "find specifications for 5G authentication",
        "explain how NAS protocol works",
        "implement SUCI encryption for identity protection",
        "compare 5G-AKA vs EPS-AKA authentication procedures",
    ]
    .iter()
    .map(|text| Query::new(*text).with_level(UserLevel::Expert))
    .collect();

    c.bench_function("answer_all_intents", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(engine.answer(black_box(query)).ok());
            }
        })
    });
}

criterion_group!(benches, benchmark_analyze, benchmark_answer);
criterion_main!(benches);
