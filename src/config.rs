//! Tunables for [`DensityCluster`](crate::cluster::DensityCluster).
//!
//! The configuration is plain data: it can be built in code (starting from
//! [`DensityClusterConfig::default`]) or loaded from JSON. Fields that accept
//! either a number or the keyword `"auto"` use [`Setting`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placeholder replaced in [`DensityClusterConfig::fig_save_path`].
pub const SUFFIX_PLACEHOLDER: &str = "{suffix}";

/// A tunable that is either fixed by the caller or derived from the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SettingRepr<T>", into = "SettingRepr<T>")]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de>"
))]
pub enum Setting<T> {
    /// Resolve from the input on every call.
    Auto,
    /// Use this value as-is.
    Fixed(T),
}

impl<T: Copy> Setting<T> {
    /// The fixed value, if any.
    pub fn fixed(&self) -> Option<T> {
        match self {
            Setting::Auto => None,
            Setting::Fixed(v) => Some(*v),
        }
    }

    /// Return the fixed value or compute one with `auto`.
    pub fn resolve_with(&self, auto: impl FnOnce() -> T) -> T {
        match self {
            Setting::Auto => auto(),
            Setting::Fixed(v) => *v,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Auto => f.write_str("auto"),
            Setting::Fixed(v) => v.fmt(f),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SettingRepr<T> {
    Fixed(T),
    Keyword(String),
}

impl<T> TryFrom<SettingRepr<T>> for Setting<T> {
    type Error = String;

    fn try_from(repr: SettingRepr<T>) -> std::result::Result<Self, Self::Error> {
        match repr {
            SettingRepr::Fixed(v) => Ok(Setting::Fixed(v)),
            SettingRepr::Keyword(k) if k == "auto" => Ok(Setting::Auto),
            SettingRepr::Keyword(k) => Err(format!("expected \"auto\" or a number, got {k:?}")),
        }
    }
}

impl<T> From<Setting<T>> for SettingRepr<T> {
    fn from(setting: Setting<T>) -> Self {
        match setting {
            Setting::Auto => SettingRepr::Keyword("auto".to_string()),
            Setting::Fixed(v) => SettingRepr::Fixed(v),
        }
    }
}

/// Density estimation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstimationMethod {
    /// Gaussian kernel density estimate on a 0.01 grid.
    #[serde(rename = "kde")]
    Kernel,
    /// Density-normalised histogram of a 1-D score array.
    #[serde(rename = "histogram")]
    Histogram,
    /// Probability-weighted histogram of a 2-D score array.
    #[serde(rename = "histogram_prob")]
    WeightedHistogram,
}

impl EstimationMethod {
    /// Name used in configuration files and error messages.
    pub fn name(self) -> &'static str {
        match self {
            EstimationMethod::Kernel => "kde",
            EstimationMethod::Histogram => "histogram",
            EstimationMethod::WeightedHistogram => "histogram_prob",
        }
    }
}

/// Bandwidth rule for the kernel density estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BandwidthRepr", into = "BandwidthRepr")]
pub enum Bandwidth {
    /// Scott's rule: `n_eff^(-1/5)`.
    Scott,
    /// Silverman's rule: `(3 n_eff / 4)^(-1/5)`.
    Silverman,
    /// Fixed factor applied to the sample standard deviation.
    Factor(f64),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BandwidthRepr {
    Factor(f64),
    Rule(String),
}

impl TryFrom<BandwidthRepr> for Bandwidth {
    type Error = String;

    fn try_from(repr: BandwidthRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            BandwidthRepr::Factor(f) => Ok(Bandwidth::Factor(f)),
            BandwidthRepr::Rule(r) => match r.as_str() {
                "scott" => Ok(Bandwidth::Scott),
                "silverman" => Ok(Bandwidth::Silverman),
                other => Err(format!("unknown bandwidth rule {other:?}")),
            },
        }
    }
}

impl From<Bandwidth> for BandwidthRepr {
    fn from(bw: Bandwidth) -> Self {
        match bw {
            Bandwidth::Scott => BandwidthRepr::Rule("scott".to_string()),
            Bandwidth::Silverman => BandwidthRepr::Rule("silverman".to_string()),
            Bandwidth::Factor(f) => BandwidthRepr::Factor(f),
        }
    }
}

/// Configuration of the density clustering pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityClusterConfig {
    /// Which density estimate to cluster on.
    pub density_estimation_method: EstimationMethod,
    /// Bandwidth rule for [`EstimationMethod::Kernel`].
    pub kde_bw_method: Bandwidth,
    /// Per-sample weights for [`EstimationMethod::Kernel`]; uniform when `None`.
    pub kde_weights: Option<Vec<f64>>,
    /// Kernel convolved over the KDE curve (normalised by its sum).
    pub density_smooth_conv_kernel: Vec<f64>,
    /// Histogram bar width, or `auto` for data-driven bin edges.
    pub histogram_bar_width: Setting<f64>,
    /// Trailing moving-average window, or `auto` (positive bins / 10).
    pub cluster_smooth_window_size: Setting<usize>,
    /// Clusters whose mean |score| is below this are treated as normal mass.
    ///
    /// `auto` resolves to the mean |score| of the whole input.
    pub max_normal_deviation: Setting<f64>,
    /// Emit a density figure for every call.
    pub debug: bool,
    /// Figure path template; `{suffix}` is replaced by the figure kind.
    pub fig_save_path: String,
}

impl Default for DensityClusterConfig {
    fn default() -> Self {
        Self {
            density_estimation_method: EstimationMethod::Histogram,
            kde_bw_method: Bandwidth::Scott,
            kde_weights: None,
            density_smooth_conv_kernel: vec![0.1, 0.8, 0.1],
            histogram_bar_width: Setting::Auto,
            cluster_smooth_window_size: Setting::Auto,
            max_normal_deviation: Setting::Fixed(0.2),
            debug: false,
            fig_save_path: format!("./{SUFFIX_PLACEHOLDER}.svg"),
        }
    }
}

impl DensityClusterConfig {
    /// Set the estimation method.
    pub fn with_method(mut self, method: EstimationMethod) -> Self {
        self.density_estimation_method = method;
        self
    }

    /// Set the histogram bar width.
    pub fn with_bar_width(mut self, width: Setting<f64>) -> Self {
        self.histogram_bar_width = width;
        self
    }

    /// Set the smoothing window size.
    pub fn with_window_size(mut self, window: Setting<usize>) -> Self {
        self.cluster_smooth_window_size = window;
        self
    }

    /// Set the normal-deviation threshold.
    pub fn with_max_normal_deviation(mut self, threshold: Setting<f64>) -> Self {
        self.max_normal_deviation = threshold;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json_str(&data)
    }

    /// Figure path for the given suffix.
    pub fn figure_path(&self, suffix: &str) -> PathBuf {
        PathBuf::from(self.fig_save_path.replace(SUFFIX_PLACEHOLDER, suffix))
    }

    /// Check every tunable; called before any computation.
    pub fn validate(&self) -> Result<()> {
        if let Setting::Fixed(w) = self.histogram_bar_width {
            if !(w.is_finite() && w > 0.0) {
                return Err(Error::InvalidParameter {
                    name: "histogram_bar_width",
                    message: "must be positive and finite",
                });
            }
        }

        if self.cluster_smooth_window_size == Setting::Fixed(0) {
            return Err(Error::InvalidParameter {
                name: "cluster_smooth_window_size",
                message: "must be at least 1",
            });
        }

        if let Setting::Fixed(t) = self.max_normal_deviation {
            if !t.is_finite() {
                return Err(Error::InvalidParameter {
                    name: "max_normal_deviation",
                    message: "must be finite",
                });
            }
        }

        if let Bandwidth::Factor(f) = self.kde_bw_method {
            if !(f.is_finite() && f > 0.0) {
                return Err(Error::InvalidParameter {
                    name: "kde_bw_method",
                    message: "factor must be positive and finite",
                });
            }
        }

        if let Some(weights) = &self.kde_weights {
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(Error::InvalidParameter {
                    name: "kde_weights",
                    message: "must be finite and non-negative",
                });
            }
        }

        let kernel_sum: f64 = self.density_smooth_conv_kernel.iter().sum();
        if self.density_smooth_conv_kernel.is_empty() || !kernel_sum.is_finite() || kernel_sum == 0.0
        {
            return Err(Error::InvalidParameter {
                name: "density_smooth_conv_kernel",
                message: "must be non-empty with a finite, non-zero sum",
            });
        }

        Ok(())
    }
}
