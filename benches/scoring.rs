//! Criterion benches for the hot path: feature transform, rule evaluation,
//! and a full pipeline pass with an in-memory store.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fraudgate::config::{FeaturesConfig, RulesConfig};
use fraudgate::error::EngineError;
use fraudgate::features::{FeatureTransformer, FeatureVector, FittedScaler};
use fraudgate::history::NoHistory;
use fraudgate::model::RiskModel;
use fraudgate::pipeline::{ScoreRequest, ScoringPipeline};
use fraudgate::rules::RuleEngine;
use fraudgate::store::MemoryAlertStore;
use fraudgate::transaction::{Channel, Transaction};
use std::sync::Arc;

struct StubModel;

impl RiskModel for StubModel {
    fn score(&self, _features: &FeatureVector) -> Result<f64, EngineError> {
        Ok(0.42)
    }
}

fn sample_transaction() -> Transaction {
    Transaction {
        transaction_id: "bench-tx".into(),
        customer_id: "C1".into(),
        transaction_amount: 12_500.0,
        channel: Channel::Mobile,
        account_age_days: 45,
        kyc_verified: true,
        timestamp: chrono::DateTime::parse_from_rfc3339("2025-06-18T14:30:00+00:00").unwrap(),
    }
}

fn bench_transform(c: &mut Criterion) {
    let transformer = FeatureTransformer::new(FeaturesConfig::default(), FittedScaler::identity());
    let tx = sample_transaction();
    c.bench_function("feature_transform", |b| {
        b.iter(|| transformer.transform(black_box(&tx)))
    });
}

fn bench_rules(c: &mut Criterion) {
    let engine = RuleEngine::with_default_rules(&RulesConfig::default());
    let tx = sample_transaction();
    c.bench_function("rule_evaluate", |b| {
        b.iter(|| engine.evaluate(black_box(&tx), None))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let pipeline = ScoringPipeline::new(
        FeatureTransformer::new(FeaturesConfig::default(), FittedScaler::identity()),
        Arc::new(StubModel),
        RuleEngine::with_default_rules(&RulesConfig::default()),
        Arc::new(MemoryAlertStore::new()),
        Arc::new(NoHistory),
        None,
        0.3,
    );
    let req = ScoreRequest {
        customer_id: Some("C1".into()),
        transaction_amount: Some(250.0),
        kyc_verified: Some(1),
        account_age_days: Some(500),
        channel: Some("POS".into()),
        timestamp: Some("2025-06-18T14:30:00+00:00".into()),
        transaction_id: None,
    };
    c.bench_function("score_legitimate", |b| {
        b.iter(|| pipeline.score(black_box(&req)).unwrap())
    });
}

criterion_group!(benches, bench_transform, bench_rules, bench_pipeline);
criterion_main!(benches);
