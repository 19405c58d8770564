//! Kernel, histogram and weighted-histogram clustering on one synthetic score set.

use squeeze_cluster::{DensityCluster, DensityClusterConfig, EstimationMethod, Setting};

fn main() {
    env_logger::init();

    // Normal mass near zero plus two anomalous groups.
    let mut scores: Vec<f64> = (0..60).map(|i| ((i as f64) * 0.7).sin() * 0.05).collect();
    scores.extend((0..12).map(|i| 0.6 + (i as f64) * 0.01));
    scores.extend((0..8).map(|i| -0.9 - (i as f64) * 0.01));

    for method in [EstimationMethod::Kernel, EstimationMethod::Histogram] {
        let config = DensityClusterConfig::default()
            .with_method(method)
            .with_max_normal_deviation(Setting::Auto);
        let outcome = DensityCluster::new(config).cluster(&scores).unwrap();
        println!(
            "=== {} (max normal deviation {:.3}) ===",
            method.name(),
            outcome.max_normal_deviation
        );
        for (k, cluster) in outcome.clusters.iter().enumerate() {
            let values: Vec<String> = cluster.iter().map(|&i| format!("{:.2}", scores[i])).collect();
            println!("  cluster {k}: {} scores [{}]", cluster.len(), values.join(", "));
        }
    }

    // Probability-weighted variant: each candidate has two possible scores.
    let rows: Vec<Vec<f64>> = scores.iter().map(|&s| vec![s, s * 0.9]).collect();
    let weights: Vec<Vec<f64>> = rows.iter().map(|_| vec![0.7, 0.3]).collect();
    let config = DensityClusterConfig::default()
        .with_method(EstimationMethod::WeightedHistogram)
        .with_max_normal_deviation(Setting::Auto);
    let outcome = DensityCluster::new(config)
        .cluster_weighted(&rows, &weights)
        .unwrap();
    println!("=== histogram_prob ===");
    for (k, cluster) in outcome.clusters.iter().enumerate() {
        let candidates: Vec<usize> = cluster.iter().map(|&i| i / 2).collect();
        println!("  cluster {k}: candidates {candidates:?}");
    }
}
