use common::{FeatureSet, FeatureVector, UseCase, UserId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{LinearModel, Model};
use orchestration::{Collaborators, Command, MessageBus};
use services::{FeatureStore, InferenceEngine, ModelRegistry, Trainer};

fn make_feature_set(users: usize) -> FeatureSet {
    (0..users)
        .map(|i| {
            let features = FeatureVector::from([
                ("watch_count".to_string(), i as f64),
                ("rating_avg".to_string(), (i % 5) as f64),
            ]);
            (UserId::new(format!("user-{i}")), features)
        })
        .collect()
}

fn make_model() -> Model {
    LinearModel::default()
        .with_weight("watch_count", 0.01)
        .with_weight("rating_avg", 0.2)
        .with_bias(0.1)
        .into()
}

fn make_bus(users: usize) -> MessageBus {
    let handler = Collaborators {
        inference: InferenceEngine::new(),
        model_registry: ModelRegistry::from_models([(UseCase::new("bench"), make_model())]),
        feature_store: FeatureStore::new().with_current_features("bench", make_feature_set(users)),
        trainer: Trainer::new(),
    }
    .into_command_handler();
    MessageBus::with_handler(handler)
}

fn bench_cold_prediction(c: &mut Criterion) {
    c.bench_function("bus/cold_prediction_100_users", |b| {
        b.iter(|| {
            let mut bus = make_bus(100);
            bus.dispatch(Command::get_prediction("bench", "user-42"))
                .unwrap();
        });
    });
}

fn bench_warm_prediction(c: &mut Criterion) {
    let mut bus = make_bus(100);
    // First dispatch provisions the model and features.
    bus.dispatch(Command::get_prediction("bench", "user-0"))
        .unwrap();

    c.bench_function("bus/warm_prediction", |b| {
        b.iter(|| {
            bus.dispatch(Command::get_prediction("bench", "user-42"))
                .unwrap();
        });
    });
}

fn bench_cold_prediction_10k(c: &mut Criterion) {
    c.bench_function("bus/cold_prediction_10000_users", |b| {
        b.iter(|| {
            let mut bus = make_bus(10_000);
            bus.dispatch(Command::get_prediction("bench", "user-4242"))
                .unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_cold_prediction,
    bench_warm_prediction,
    bench_cold_prediction_10k,
);
criterion_main!(benches);
