use rand::prelude::*;
use squeeze_cluster::cluster::auto_window_size;
use squeeze_cluster::{
    Bandwidth, DensityCluster, DensityClusterConfig, Error, EstimationMethod, Setting,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn histogram_config(width: Setting<f64>, threshold: f64) -> DensityClusterConfig {
    DensityClusterConfig::default()
        .with_method(EstimationMethod::Histogram)
        .with_bar_width(width)
        .with_max_normal_deviation(Setting::Fixed(threshold))
}

/// 200 scores in [0.25, 0.45] followed by 50 in [3.5, 3.7].
fn bimodal(seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scores: Vec<f64> = (0..200).map(|_| rng.random_range(0.25..0.45)).collect();
    scores.extend((0..50).map(|_| rng.random_range(3.5..3.7)));
    scores
}

#[test]
fn zeros_and_fives_with_unit_bars() {
    init_logger();
    let scores = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 5.0, 5.0, 5.0, 5.0];
    let outcome = DensityCluster::new(histogram_config(Setting::Fixed(1.0), 1.0))
        .cluster(&scores)
        .unwrap();
    assert_eq!(outcome.clusters, vec![vec![10, 11, 12, 13, 14]]);
}

#[test]
fn tight_normal_mass_yields_no_cluster() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(7);
    // Sum of uniforms: bell-shaped around zero, |x| <= 0.2.
    let scores: Vec<f64> = (0..500)
        .map(|_| (0..4).map(|_| rng.random_range(-0.05..0.05)).sum())
        .collect();
    let outcome = DensityCluster::new(histogram_config(Setting::Auto, 0.5))
        .cluster(&scores)
        .unwrap();
    assert!(outcome.is_empty());
}

#[test]
fn bimodal_keeps_only_far_mode() {
    init_logger();
    let scores = bimodal(42);
    let outcome = DensityCluster::new(histogram_config(Setting::Fixed(1.0), 1.0))
        .cluster(&scores)
        .unwrap();
    assert_eq!(outcome.len(), 1);
    assert_eq!(outcome.clusters[0], (200..250).collect::<Vec<_>>());
}

#[test]
fn kernel_strategy_separates_far_mode() {
    init_logger();
    let near = (0..200).map(|i| -0.05 + 0.1 * i as f64 / 199.0);
    let far = (0..50).map(|i| 2.95 + 0.1 * i as f64 / 49.0);
    let scores: Vec<f64> = near.chain(far).collect();

    let config = DensityClusterConfig {
        density_estimation_method: EstimationMethod::Kernel,
        kde_bw_method: Bandwidth::Scott,
        max_normal_deviation: Setting::Fixed(1.0),
        ..Default::default()
    };
    let outcome = DensityCluster::new(config).cluster(&scores).unwrap();
    assert_eq!(outcome.len(), 1);
    let cluster = &outcome.clusters[0];
    assert!(cluster.iter().all(|&i| i >= 200));
    assert!(cluster.len() >= 45);
}

#[test]
fn weighted_histogram_assigns_by_value() {
    init_logger();
    let values = vec![
        vec![0.3, 0.35, 0.4],
        vec![0.3, 0.4, 0.45],
        vec![3.5, 3.6, 3.7],
    ];
    // The 3.7 score carries no weight but still lands in the far cluster.
    let weights = vec![
        vec![1.0, 1.0, 1.0],
        vec![1.0, 1.0, 1.0],
        vec![0.5, 0.5, 0.0],
    ];
    let config = DensityClusterConfig::default()
        .with_method(EstimationMethod::WeightedHistogram)
        .with_bar_width(Setting::Fixed(1.0))
        .with_max_normal_deviation(Setting::Fixed(1.0));
    let outcome = DensityCluster::new(config)
        .cluster_weighted(&values, &weights)
        .unwrap();
    assert_eq!(outcome.clusters, vec![vec![6, 7, 8]]);
}

#[test]
fn weighted_strategy_rejects_flat_input() {
    let config = DensityClusterConfig::default().with_method(EstimationMethod::WeightedHistogram);
    let err = DensityCluster::new(config).cluster(&[0.0, 1.0]).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}

#[test]
fn auto_threshold_threads_into_later_calls() {
    init_logger();
    let first = bimodal(1);
    let config = histogram_config(Setting::Fixed(1.0), 0.0).with_max_normal_deviation(Setting::Auto);
    let clusterer = DensityCluster::new(config);
    let outcome = clusterer.cluster(&first).unwrap();
    let expected = first.iter().map(|x| x.abs()).sum::<f64>() / first.len() as f64;
    assert!((outcome.max_normal_deviation - expected).abs() < 1e-12);

    // A second array with a much larger mean |score| would resolve differently;
    // a frozen clusterer keeps the first threshold.
    let second: Vec<f64> = bimodal(2).into_iter().map(|x| x + 10.0).collect();
    let frozen = clusterer.clone().with_max_normal_deviation(outcome.max_normal_deviation);
    assert_eq!(
        frozen.cluster(&second).unwrap().max_normal_deviation,
        outcome.max_normal_deviation
    );
    assert!(clusterer.cluster(&second).unwrap().max_normal_deviation > 10.0);
}

#[test]
fn auto_window_scales_with_positive_bins() {
    let small = vec![0.01; 20];
    let large = vec![0.01; 200];
    assert_eq!(auto_window_size(&small), 2);
    assert_eq!(auto_window_size(&large), 20);
}

#[test]
fn config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cluster.json");
    std::fs::write(
        &path,
        r#"{ "density_estimation_method": "histogram", "histogram_bar_width": 1.0,
             "max_normal_deviation": 1.0 }"#,
    )
    .unwrap();
    let config = DensityClusterConfig::from_json_file(&path).unwrap();
    let outcome = DensityCluster::new(config)
        .cluster(&[0.0, 0.0, 0.0, 5.0, 5.0])
        .unwrap();
    assert_eq!(outcome.clusters, vec![vec![3, 4]]);
}

#[test]
fn near_duplicate_normal_mass_does_not_blow_up_bins() {
    init_logger();
    // Exact zeros plus float dust give an IQR of 1e-300 over a unit range.
    let mut scores = vec![0.0; 600];
    scores.extend(vec![1e-300; 300]);
    scores.extend(vec![1.0; 100]);
    let outcome = DensityCluster::default().cluster(&scores).unwrap();
    assert_eq!(outcome.clusters, vec![(900..1000).collect::<Vec<_>>()]);
}
