use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use squeeze_cluster::{DensityCluster, DensityClusterConfig, EstimationMethod, Setting};

fn synthetic_scores(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            // 90% normal mass around zero, 10% shifted anomalies.
            let noise: f64 = (0..4).map(|_| rng.random_range(-0.05..0.05)).sum();
            if i % 10 == 0 {
                0.8 + noise
            } else {
                noise
            }
        })
        .collect()
}

fn bench_density_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("density_cluster");
    let scores = synthetic_scores(10_000, 42);

    let histogram = DensityCluster::new(
        DensityClusterConfig::default()
            .with_method(EstimationMethod::Histogram)
            .with_max_normal_deviation(Setting::Fixed(0.2)),
    );
    group.bench_function("histogram_auto_n10000", |b| {
        b.iter(|| histogram.cluster(black_box(&scores)).unwrap())
    });

    let kde_scores = synthetic_scores(1_000, 7);
    let kernel = DensityCluster::new(
        DensityClusterConfig::default()
            .with_method(EstimationMethod::Kernel)
            .with_max_normal_deviation(Setting::Fixed(0.2)),
    );
    group.bench_function("kde_n1000", |b| {
        b.iter(|| kernel.cluster(black_box(&kde_scores)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_density_cluster);
criterion_main!(benches);
