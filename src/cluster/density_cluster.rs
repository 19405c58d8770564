//! The density clustering pipeline.
//!
//! ```text
//! scores ─▶ density estimate ─▶ trailing smoothing ─▶ extrema ─▶ clusters
//! ```
//!
//! Every local maximum of the smoothed density is a candidate cluster centre.
//! Its interval runs between the nearest boundaries (local minima) on either
//! side, and the cluster is every score inside that closed interval. Candidates
//! whose mean |score| is below `max_normal_deviation` look like the normal
//! mass around zero and are dropped.

use std::fmt;
use std::sync::Arc;

use log::debug;

use super::density::{DensityEstimator, Scores};
use super::extrema::{self, Extrema};
use super::smoothing;
use super::traits::Clustering;
use super::util;
use crate::config::{DensityClusterConfig, Setting};
use crate::error::Result;
use crate::plot::{self, DensityFigure, FigureWriter, DENSITY_FIGURE_SUFFIX};

/// Result of one clustering call.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOutcome {
    /// Index sets into the flattened scores, ordered by the position of their maximum.
    pub clusters: Vec<Vec<usize>>,
    /// Threshold used for this call. When configured as `auto` this is the value the
    /// call resolved; pass it to [`DensityCluster::with_max_normal_deviation`] to reuse it.
    pub max_normal_deviation: f64,
}

impl ClusterOutcome {
    /// Number of retained clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether no cluster was retained.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// One-dimensional density-based clusterer for deviation scores.
#[derive(Clone)]
pub struct DensityCluster {
    config: DensityClusterConfig,
    estimator: DensityEstimator,
    figure_writer: Arc<dyn FigureWriter>,
}

impl fmt::Debug for DensityCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DensityCluster")
            .field("config", &self.config)
            .field("estimator", &self.estimator)
            .finish_non_exhaustive()
    }
}

impl Default for DensityCluster {
    fn default() -> Self {
        Self::new(DensityClusterConfig::default())
    }
}

impl DensityCluster {
    /// Create a clusterer. The configuration is validated on every call.
    pub fn new(config: DensityClusterConfig) -> Self {
        Self {
            estimator: DensityEstimator::from_config(&config),
            config,
            figure_writer: plot::default_writer(),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &DensityClusterConfig {
        &self.config
    }

    /// The density estimation strategy in use.
    pub fn estimator(&self) -> &DensityEstimator {
        &self.estimator
    }

    /// Fix the normal-deviation threshold, e.g. to one resolved by an earlier call.
    pub fn with_max_normal_deviation(mut self, threshold: f64) -> Self {
        self.config.max_normal_deviation = Setting::Fixed(threshold);
        self
    }

    /// Replace the writer used for debug figures.
    pub fn with_figure_writer(mut self, writer: Arc<dyn FigureWriter>) -> Self {
        self.figure_writer = writer;
        self
    }

    /// Threshold for `scores`: the configured value, or mean |score| when `auto`.
    pub fn resolve_max_normal_deviation(&self, scores: &[f64]) -> f64 {
        self.config.max_normal_deviation.resolve_with(|| {
            let threshold = util::mean_abs(scores.iter().copied());
            debug!("max normal {threshold}");
            threshold
        })
    }

    /// Cluster a 1-D score array.
    pub fn cluster(&self, scores: &[f64]) -> Result<ClusterOutcome> {
        self.cluster_scores(Scores::Flat(scores))
    }

    /// Cluster a 2-D score array with probability weights of the same shape.
    ///
    /// Only valid with the weighted histogram strategy. Indices in the result refer
    /// to the row-major flattening of `scores`.
    pub fn cluster_weighted(&self, scores: &[Vec<f64>], weights: &[Vec<f64>]) -> Result<ClusterOutcome> {
        self.cluster_scores(Scores::Weighted {
            values: scores,
            weights,
        })
    }

    /// Run the full pipeline.
    pub fn cluster_scores(&self, scores: Scores<'_>) -> Result<ClusterOutcome> {
        self.config.validate()?;
        let flat = scores.flatten()?;

        let estimate = self.estimator.estimate(scores)?;
        let window = self.config.cluster_smooth_window_size.resolve_with(|| {
            let window = smoothing::auto_window_size(&estimate.density);
            debug!(
                "auto window size: {window} {}",
                estimate.density.iter().filter(|&&d| d > 0.0).count()
            );
            window
        });
        let smoothed = smoothing::smooth(&estimate.density, window)?;

        let threshold = self.resolve_max_normal_deviation(&flat);
        let extrema = extrema::local_extrema(&smoothed);
        let clusters = build_clusters(&flat, &estimate.positions, &extrema, threshold);

        if self.config.debug {
            self.write_figure(&flat, &estimate.positions, smoothed, &extrema, &clusters)?;
        }

        Ok(ClusterOutcome {
            clusters,
            max_normal_deviation: threshold,
        })
    }

    fn write_figure(
        &self,
        flat: &[f64],
        positions: &[f64],
        smoothed: Vec<f64>,
        extrema: &Extrema,
        clusters: &[Vec<usize>],
    ) -> Result<()> {
        let ranges: Vec<(f64, f64)> = clusters
            .iter()
            .map(|c| util::min_max(&c.iter().map(|&i| flat[i]).collect::<Vec<_>>()))
            .collect();
        for (lo, hi) in &ranges {
            debug!("cluster: [{lo}, {hi}]");
        }

        let figure = DensityFigure {
            scores: flat.to_vec(),
            positions: positions.to_vec(),
            smoothed,
            maxima: extrema.maxima.iter().map(|&i| positions[i]).collect(),
            minima: extrema.minima.iter().map(|&i| positions[i]).collect(),
            clusters: ranges,
        };
        let path = self.config.figure_path(DENSITY_FIGURE_SUFFIX);
        self.figure_writer.write(&figure, &path)?;
        debug!("density figure written to {}", path.display());
        Ok(())
    }
}

impl Clustering for DensityCluster {
    fn cluster_indices(&self, scores: &[f64]) -> Result<Vec<Vec<usize>>> {
        Ok(self.cluster(scores)?.clusters)
    }
}

/// Group `scores` around each maximum of the density sampled at `positions`.
///
/// A candidate is kept when its interval holds at least one score and the mean
/// |score| inside it is at least `max_normal_deviation`.
pub fn build_clusters(
    scores: &[f64],
    positions: &[f64],
    extrema: &Extrema,
    max_normal_deviation: f64,
) -> Vec<Vec<usize>> {
    let bounds = extrema::boundaries(positions, &extrema.minima);
    let mut clusters = Vec::new();
    for &m in &extrema.maxima {
        let x = positions[m];
        // bounds start at -inf and end at +inf, so both lookups stay in range.
        let left = bounds[util::search_sorted_right(&bounds, x) - 1];
        let right = bounds[util::search_sorted_left(&bounds, x)];

        let indices: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter(|(_, &v)| v >= left && v <= right)
            .map(|(i, _)| i)
            .collect();
        let mu = util::mean_abs(indices.iter().map(|&i| scores[i]));
        debug!("({left}, {right}), {mu}");

        if indices.is_empty() || mu < max_normal_deviation {
            continue;
        }
        clusters.push(indices);
    }
    clusters
}
