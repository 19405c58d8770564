//! Density estimation strategies.

use log::trace;

use super::histogram;
use super::kde::GaussianKde;
use super::util;
use crate::config::{Bandwidth, DensityClusterConfig, EstimationMethod, Setting};
use crate::error::{Error, Result};

/// Grid step of the kernel strategy.
pub const KDE_GRID_STEP: f64 = 0.01;

/// Scores handed to the clustering pipeline.
#[derive(Debug, Clone, Copy)]
pub enum Scores<'a> {
    /// One deviation score per candidate.
    Flat(&'a [f64]),
    /// Rows of scores with matching probability weights.
    Weighted {
        /// Row-major scores; every row has the same length.
        values: &'a [Vec<f64>],
        /// Weights with the same shape as `values`.
        weights: &'a [Vec<f64>],
    },
}

impl Scores<'_> {
    /// Check shape and finiteness; returns the flattened scores.
    pub fn flatten(&self) -> Result<Vec<f64>> {
        let flat = match *self {
            Scores::Flat(values) => values.to_vec(),
            Scores::Weighted { values, weights } => {
                let width = check_rows(values)?;
                if weights.len() != values.len() {
                    return Err(Error::DimensionMismatch {
                        expected: values.len(),
                        found: weights.len(),
                    });
                }
                for row in weights {
                    if row.len() != width {
                        return Err(Error::DimensionMismatch {
                            expected: width,
                            found: row.len(),
                        });
                    }
                }
                values.iter().flatten().copied().collect()
            }
        };
        if flat.is_empty() {
            return Err(Error::EmptyInput);
        }
        util::check_finite(&flat)?;
        Ok(flat)
    }

    fn flat_weights(&self) -> Option<Vec<f64>> {
        match *self {
            Scores::Flat(_) => None,
            Scores::Weighted { weights, .. } => Some(weights.iter().flatten().copied().collect()),
        }
    }
}

fn check_rows(values: &[Vec<f64>]) -> Result<usize> {
    let width = values.first().map_or(0, Vec::len);
    for row in values.iter().skip(1) {
        if row.len() != width {
            return Err(Error::DimensionMismatch {
                expected: width,
                found: row.len(),
            });
        }
    }
    Ok(width)
}

/// A sampled density curve.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityEstimate {
    /// Non-negative density values.
    pub density: Vec<f64>,
    /// Strictly increasing sample positions (grid points or bin centres).
    pub positions: Vec<f64>,
}

impl DensityEstimate {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.density.len()
    }

    /// Whether the estimate has no samples.
    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }
}

/// Density estimation strategy with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum DensityEstimator {
    /// Gaussian KDE evaluated on a 0.01 grid, then convolved with `conv_kernel`.
    Kernel {
        /// Bandwidth rule.
        bandwidth: Bandwidth,
        /// Optional per-sample weights.
        weights: Option<Vec<f64>>,
        /// Post-smoothing kernel (normalised by its sum).
        conv_kernel: Vec<f64>,
    },
    /// Histogram of a 1-D array.
    Histogram {
        /// Bar width.
        bar_width: Setting<f64>,
    },
    /// Probability-weighted histogram of a 2-D array.
    WeightedHistogram {
        /// Bar width.
        bar_width: Setting<f64>,
    },
}

impl DensityEstimator {
    /// Build the strategy selected by `config`.
    pub fn from_config(config: &DensityClusterConfig) -> Self {
        match config.density_estimation_method {
            EstimationMethod::Kernel => DensityEstimator::Kernel {
                bandwidth: config.kde_bw_method,
                weights: config.kde_weights.clone(),
                conv_kernel: config.density_smooth_conv_kernel.clone(),
            },
            EstimationMethod::Histogram => DensityEstimator::Histogram {
                bar_width: config.histogram_bar_width,
            },
            EstimationMethod::WeightedHistogram => DensityEstimator::WeightedHistogram {
                bar_width: config.histogram_bar_width,
            },
        }
    }

    /// The configuration tag of this strategy.
    pub fn method(&self) -> EstimationMethod {
        match self {
            DensityEstimator::Kernel { .. } => EstimationMethod::Kernel,
            DensityEstimator::Histogram { .. } => EstimationMethod::Histogram,
            DensityEstimator::WeightedHistogram { .. } => EstimationMethod::WeightedHistogram,
        }
    }

    /// Estimate the density of `scores`.
    pub fn estimate(&self, scores: Scores<'_>) -> Result<DensityEstimate> {
        let estimate = match (self, scores) {
            (
                DensityEstimator::Kernel {
                    bandwidth,
                    weights,
                    conv_kernel,
                },
                Scores::Flat(values),
            ) => {
                util::check_finite(values)?;
                kernel_density(values, weights.as_deref(), *bandwidth, conv_kernel)?
            }
            (DensityEstimator::Histogram { bar_width }, Scores::Flat(values)) => {
                if values.is_empty() {
                    return Err(Error::EmptyInput);
                }
                util::check_finite(values)?;
                let edges = match bar_width {
                    Setting::Auto => histogram::pad_edges(&histogram::auto_bin_edges(values)?),
                    Setting::Fixed(w) => fixed_edges(values, *w)?,
                };
                histogram_density(values, None, &edges)?
            }
            (DensityEstimator::WeightedHistogram { bar_width }, weighted @ Scores::Weighted { .. }) => {
                let values = weighted.flatten()?;
                let weights = weighted.flat_weights().unwrap_or_default();
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(Error::InvalidParameter {
                        name: "weights",
                        message: "must be finite and non-negative",
                    });
                }
                let edges = match bar_width {
                    Setting::Auto => {
                        let bins = histogram::weighted_fd_bins(&values, &weights)?;
                        histogram::pad_edges(&histogram::bin_edges_with_count(&values, bins)?)
                    }
                    Setting::Fixed(w) => fixed_edges(&values, *w)?,
                };
                histogram_density(&values, Some(&weights), &edges)?
            }
            (DensityEstimator::WeightedHistogram { .. }, Scores::Flat(_)) => {
                return Err(Error::ShapeMismatch {
                    method: self.method().name(),
                    expected: "2-D weighted",
                })
            }
            (_, Scores::Weighted { .. }) => {
                return Err(Error::ShapeMismatch {
                    method: self.method().name(),
                    expected: "1-D",
                })
            }
        };

        trace!(
            "{} estimate: {} samples over [{:?}, {:?}]",
            self.method().name(),
            estimate.len(),
            estimate.positions.first(),
            estimate.positions.last()
        );
        Ok(estimate)
    }
}

fn fixed_edges(values: &[f64], width: f64) -> Result<Vec<f64>> {
    if !(width.is_finite() && width > 0.0) {
        return Err(Error::InvalidParameter {
            name: "histogram_bar_width",
            message: "must be positive and finite",
        });
    }
    let (lo, hi) = util::min_max(values);
    histogram::fixed_width_edges(lo, hi, width)
}

fn histogram_density(values: &[f64], weights: Option<&[f64]>, edges: &[f64]) -> Result<DensityEstimate> {
    let density = histogram::density_histogram(values, weights, edges)?;
    Ok(DensityEstimate {
        density,
        positions: util::midpoints(edges),
    })
}

/// KDE on `[min, max)` with step [`KDE_GRID_STEP`], convolved with `conv_kernel`.
///
/// The full convolution is `k - 1` samples longer than the grid. Positions are
/// extended on the same step and centred on the kernel, so output `j` sits at
/// `min + (j - (k - 1) / 2) * step`.
fn kernel_density(
    values: &[f64],
    weights: Option<&[f64]>,
    bandwidth: Bandwidth,
    conv_kernel: &[f64],
) -> Result<DensityEstimate> {
    let kernel_sum: f64 = conv_kernel.iter().sum();
    if conv_kernel.is_empty() || !kernel_sum.is_finite() || kernel_sum == 0.0 {
        return Err(Error::InvalidParameter {
            name: "density_smooth_conv_kernel",
            message: "must be non-empty with a finite, non-zero sum",
        });
    }

    let kde = GaussianKde::fit(values, weights, bandwidth)?;
    let (lo, hi) = util::min_max(values);
    let grid = util::arange(lo, hi, KDE_GRID_STEP);
    if grid.is_empty() {
        return Err(Error::Degenerate("kernel grid is empty"));
    }

    let sampled = kde.evaluate(&grid);
    let density: Vec<f64> = util::convolve_full(&sampled, conv_kernel)
        .into_iter()
        // A kernel with negative taps can push tails below zero.
        .map(|d| (d / kernel_sum).max(0.0))
        .collect();

    let offset = (conv_kernel.len() - 1) as f64 / 2.0;
    let positions = (0..density.len())
        .map(|j| lo + (j as f64 - offset) * KDE_GRID_STEP)
        .collect();

    Ok(DensityEstimate { density, positions })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(est: &DensityEstimate) {
        assert_eq!(est.density.len(), est.positions.len());
        assert!(est.density.iter().all(|&d| d >= 0.0));
        assert!(est.positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_histogram_fixed_width() {
        let values = [0.0, 0.0, 0.0, 5.0, 5.0];
        let est = DensityEstimator::Histogram {
            bar_width: Setting::Fixed(1.0),
        }
        .estimate(Scores::Flat(&values))
        .unwrap();
        assert_invariants(&est);
        assert_eq!(est.len(), 15);
        assert_eq!(est.positions[0], -5.5);
        assert_eq!(est.positions[6], 0.5);
    }

    #[test]
    fn test_histogram_auto_is_padded() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin()).collect();
        let est = DensityEstimator::Histogram {
            bar_width: Setting::Auto,
        }
        .estimate(Scores::Flat(&values))
        .unwrap();
        assert_invariants(&est);
        for i in 0..histogram::PAD_EDGES {
            assert_eq!(est.density[i], 0.0);
            assert_eq!(est.density[est.len() - 1 - i], 0.0);
        }
    }

    #[test]
    fn test_kernel_output_grows_by_kernel_len() {
        let values = [0.0, 0.1, 0.2, 0.5, 1.0];
        let est = DensityEstimator::Kernel {
            bandwidth: Bandwidth::Scott,
            weights: None,
            conv_kernel: vec![0.1, 0.8, 0.1],
        }
        .estimate(Scores::Flat(&values))
        .unwrap();
        assert_invariants(&est);
        let grid_len = util::arange(0.0, 1.0, KDE_GRID_STEP).len();
        assert_eq!(est.len(), grid_len + 2);
        assert!((est.positions[1] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_histogram() {
        let values = vec![vec![0.0, 0.1], vec![0.9, 1.0]];
        let weights = vec![vec![1.0, 1.0], vec![0.5, 0.5]];
        let est = DensityEstimator::WeightedHistogram {
            bar_width: Setting::Fixed(0.5),
        }
        .estimate(Scores::Weighted {
            values: &values,
            weights: &weights,
        })
        .unwrap();
        assert_invariants(&est);
        let auto = DensityEstimator::WeightedHistogram {
            bar_width: Setting::Auto,
        }
        .estimate(Scores::Weighted {
            values: &values,
            weights: &weights,
        })
        .unwrap();
        assert_invariants(&auto);
    }

    #[test]
    fn test_shape_mismatch() {
        let flat = [0.0, 1.0];
        let rows = vec![vec![0.0, 1.0]];
        let hist = DensityEstimator::Histogram {
            bar_width: Setting::Auto,
        };
        assert!(matches!(
            hist.estimate(Scores::Weighted {
                values: &rows,
                weights: &rows
            }),
            Err(Error::ShapeMismatch { method: "histogram", .. })
        ));
        let weighted = DensityEstimator::WeightedHistogram {
            bar_width: Setting::Auto,
        };
        assert!(matches!(
            weighted.estimate(Scores::Flat(&flat)),
            Err(Error::ShapeMismatch { method: "histogram_prob", .. })
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let values = vec![vec![0.0, 1.0], vec![2.0]];
        let weights = vec![vec![1.0, 1.0], vec![1.0]];
        let scores = Scores::Weighted {
            values: &values,
            weights: &weights,
        };
        assert!(matches!(
            scores.flatten(),
            Err(Error::DimensionMismatch { expected: 2, found: 1 })
        ));
    }
}
