use anacomus::anomaly::{AnomalyDetector, IsolationForest};
use anacomus::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use rand::prelude::*;

fn create_request_features(n_rows: usize) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(0);
    Array2::from_shape_fn((n_rows, 4), |(_, c)| match c {
        0 => rng.gen::<f64>() * 1000.0,
        1 => rng.gen_range(1..4) as f64,
        2 => rng.gen_range(0..10) as f64,
        _ => rng.gen_range(0..2) as f64,
    })
}

fn bench_forest(c: &mut Criterion) {
    let mut group = c.benchmark_group("isolation_forest");
    group.sample_size(20);

    for n_rows in [6usize, 256, 4096].iter() {
        let x = create_request_features(*n_rows);

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &x, |b, x| {
            b.iter(|| {
                let mut forest = IsolationForest::new().with_contamination(0.1).with_seed(42);
                forest.fit(black_box(x)).unwrap();
                forest
            })
        });

        let mut fitted = IsolationForest::new().with_contamination(0.1).with_seed(42);
        fitted.fit(&x).unwrap();
        group.bench_with_input(BenchmarkId::new("predict", n_rows), &x, |b, x| {
            b.iter(|| fitted.predict(black_box(x)).unwrap())
        });
    }

    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let sweep = AnomalySweep::new(AnalysisConfig::new().with_plots(false));
    let scenario = Scenario::builtin(ScenarioKind::ScatterLabeled);

    c.bench_function("sweep_builtin_scatter", |b| {
        b.iter(|| sweep.run(black_box(&scenario)).unwrap())
    });
}

criterion_group!(benches, bench_forest, bench_sweep);
criterion_main!(benches);
