//! One-dimensional density clustering of deviation scores.
//!
//! `squeeze-cluster` isolates groups of anomalous candidates from a deviation-score
//! array: it estimates the score density, smooths it, splits it at local minima and
//! keeps the modes whose magnitude stands out from the normal mass around zero.
//!
//! The primary API is under [`cluster`]:
//! - [`DensityCluster`] runs the whole pipeline from a [`DensityClusterConfig`]
//! - the individual stages (density estimate, smoothing, extrema, cluster building)
//!   are exposed for callers that want to inspect or recombine them
//!
//! Debug figures are produced through [`plot::FigureWriter`]; enable the `plot`
//! feature for SVG output.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod error;
pub mod plot;

pub use cluster::{
    ClusterOutcome, Clustering, DensityCluster, DensityEstimate, DensityEstimator, Scores, NOISE,
};
pub use config::{Bandwidth, DensityClusterConfig, EstimationMethod, Setting};
pub use error::{Error, Result};
