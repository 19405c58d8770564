//! Density-based segmentation of deviation scores.
//!
//! Root-cause localization scores every candidate combination of dimension values
//! with a signed *deviation score*. Most candidates behave normally and pile up
//! near zero; the interesting ones form separate modes further out. This module
//! finds those modes.
//!
//! ## Pipeline
//!
//! 1. **Density estimate** ([`DensityEstimator`]): one of
//!    - a Gaussian kernel density estimate on a 0.01 grid, convolved with a small
//!      smoothing kernel,
//!    - a density-normalised histogram (fixed bar width or automatic edges),
//!    - a probability-weighted histogram of a 2-D score array.
//! 2. **Smoothing** ([`smooth()`]): trailing moving average, window either fixed or
//!    one tenth of the number of non-empty bins.
//! 3. **Extrema** ([`local_extrema`]): local maxima are cluster centres, local
//!    minima are cluster boundaries (neighbours wrap around).
//! 4. **Clusters** ([`build_clusters`]): all scores between the boundaries around a
//!    maximum, kept only if their mean |score| reaches `max_normal_deviation`.
//!
//! ## Normal-deviation threshold
//!
//! With `max_normal_deviation = "auto"` the threshold is the mean |score| of the
//! input. It is resolved per call and reported in [`ClusterOutcome`]; freeze it for
//! later calls with [`DensityCluster::with_max_normal_deviation`].
//!
//! ## Usage
//!
//! ```rust
//! use squeeze_cluster::{DensityCluster, DensityClusterConfig, EstimationMethod, Setting};
//!
//! let mut scores = vec![0.0; 10];
//! scores.extend([5.0; 5]);
//!
//! let config = DensityClusterConfig::default()
//!     .with_method(EstimationMethod::Histogram)
//!     .with_bar_width(Setting::Fixed(1.0))
//!     .with_max_normal_deviation(Setting::Fixed(1.0));
//!
//! let outcome = DensityCluster::new(config).cluster(&scores).unwrap();
//! assert_eq!(outcome.clusters, vec![vec![10, 11, 12, 13, 14]]);
//! ```

mod density;
mod density_cluster;
mod extrema;
pub(crate) mod histogram;
mod kde;
mod smoothing;
mod traits;
mod util;

pub use density::{DensityEstimate, DensityEstimator, Scores, KDE_GRID_STEP};
pub use density_cluster::{build_clusters, ClusterOutcome, DensityCluster};
pub use extrema::{boundaries, local_extrema, Extrema};
pub use histogram::{
    auto_bin_edges, bin_edges_with_count, density_histogram, fixed_width_edges, pad_edges,
    weighted_fd_bins, DENSITY_SCALE, MAX_BINS, PAD_EDGES, PAD_STEP,
};
pub use kde::GaussianKde;
pub use smoothing::{auto_window_size, smooth};
pub use traits::{Clustering, NOISE};
