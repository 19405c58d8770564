//! Bin-edge construction and density histograms.
//!
//! Edge policies:
//!
//! - **auto**: equal-width edges over the data range, with the bin width taken as the
//!   smaller of the Sturges and Freedman-Diaconis widths (the Freedman-Diaconis width
//!   is skipped when the IQR is zero). The weighted variant picks the bin *count* with
//!   a weighted Freedman-Diaconis rule instead. Either way the edges are then padded
//!   with [`PAD_EDGES`] extra edges on each side, [`PAD_STEP`] apart, so that a mode
//!   sitting on the outermost bin still has a neighbour to compare against.
//! - **fixed width `w`**: edges from `min - 6w` in steps of `w` up to (excluding)
//!   `max + 5w`.
//!
//! No policy produces more than [`MAX_BINS`] bins: the automatic rules fall back to
//! Sturges when Freedman-Diaconis would exceed it, explicit counts and widths fail.
//!
//! Histogram values are density-normalised and then divided by [`DENSITY_SCALE`].

use super::util;
use crate::error::{Error, Result};

/// Number of padding edges added below and above "auto" edges.
pub const PAD_EDGES: usize = 5;

/// Spacing of the padding edges.
pub const PAD_STEP: f64 = 0.1;

/// Divisor applied to every density-normalised histogram.
pub const DENSITY_SCALE: f64 = 100.0;

/// Upper bound on the number of bins of any histogram.
pub const MAX_BINS: usize = 1 << 20;

/// `ceil(span / width)` if it is a finite count within [`MAX_BINS`].
fn bin_count(span: f64, width: f64) -> Option<usize> {
    let count = (span / width).ceil().max(1.0);
    (count.is_finite() && count <= MAX_BINS as f64).then_some(count as usize)
}

fn edges_for_count(first: f64, last: f64, count: usize) -> Result<Vec<f64>> {
    match count.checked_add(1) {
        Some(edges) if count <= MAX_BINS => Ok(util::linspace(first, last, edges)),
        _ => Err(Error::Degenerate("too many bins")),
    }
}

/// Data range used for binning; widened by ±0.5 when all values coincide.
fn bin_range(values: &[f64]) -> (f64, f64) {
    let (lo, hi) = util::min_max(values);
    if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

/// Equal-width edges with the bin width chosen by the Sturges / Freedman-Diaconis rules.
pub fn auto_bin_edges(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(Error::EmptyInput);
    }
    let (first, last) = bin_range(values);
    let n = values.len() as f64;
    let (lo, hi) = util::min_max(values);
    let ptp = hi - lo;

    let sturges = ptp / (n.log2() + 1.0);
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let iqr = util::quantile_sorted(&sorted, 0.75) - util::quantile_sorted(&sorted, 0.25);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);

    let span = last - first;
    // A tiny positive IQR (values piled on one point) makes the FD width useless.
    let fd_count = if fd > 0.0 && fd < sturges {
        bin_count(span, fd)
    } else {
        None
    };
    let count = match fd_count {
        Some(count) => count,
        None if sturges > 0.0 => {
            bin_count(span, sturges).ok_or(Error::Degenerate("too many bins"))?
        }
        None => 1,
    };
    edges_for_count(first, last, count)
}

/// `count` equal-width bins over the data range.
pub fn bin_edges_with_count(values: &[f64], count: usize) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(Error::EmptyInput);
    }
    if count == 0 {
        return Err(Error::InvalidParameter {
            name: "bins",
            message: "must be at least 1",
        });
    }
    let (first, last) = bin_range(values);
    edges_for_count(first, last, count)
}

/// Weighted Freedman-Diaconis bin count.
///
/// Uses the weighted IQR and the number of positively weighted samples. Falls back
/// to the Sturges count when the weighted IQR is zero or the rule would exceed
/// [`MAX_BINS`].
pub fn weighted_fd_bins(values: &[f64], weights: &[f64]) -> Result<usize> {
    if values.len() != weights.len() {
        return Err(Error::DimensionMismatch {
            expected: values.len(),
            found: weights.len(),
        });
    }
    let n = weights.iter().filter(|&&w| w > 0.0).count();
    if n == 0 {
        return Err(Error::Degenerate("histogram weights sum to zero"));
    }
    let (lo, hi) = util::min_max(values);
    let ptp = hi - lo;
    let sturges = (n as f64).log2().ceil() as usize + 1;
    if ptp <= 0.0 {
        return Ok(1);
    }

    let iqr = util::weighted_quantile(values, weights, 0.75)
        - util::weighted_quantile(values, weights, 0.25);
    if !(iqr > 0.0) {
        return Ok(sturges);
    }
    let h = 2.0 * iqr * (n as f64).powf(-1.0 / 3.0);
    Ok(bin_count(ptp, h).unwrap_or(sturges))
}

/// Add [`PAD_EDGES`] edges below and above, spaced [`PAD_STEP`] apart.
pub fn pad_edges(edges: &[f64]) -> Vec<f64> {
    let (Some(&first), Some(&last)) = (edges.first(), edges.last()) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(edges.len() + 2 * PAD_EDGES);
    out.extend((1..=PAD_EDGES).rev().map(|i| first - PAD_STEP * i as f64));
    out.extend_from_slice(edges);
    out.extend((1..=PAD_EDGES).map(|i| last + PAD_STEP * i as f64));
    out
}

/// Edges from `min - 6w` to below `max + 5w`, step `w`.
pub fn fixed_width_edges(min: f64, max: f64, width: f64) -> Result<Vec<f64>> {
    let (start, stop) = (min - width * 6.0, max + width * 5.0);
    if bin_count(stop - start, width).is_none() {
        return Err(Error::Degenerate("too many bins"));
    }
    Ok(util::arange(start, stop, width))
}

/// Density-normalised histogram (optionally weighted), divided by [`DENSITY_SCALE`].
///
/// Bins are half-open except the last, which also includes its right edge. Values
/// outside the edges are ignored.
pub fn density_histogram(values: &[f64], weights: Option<&[f64]>, edges: &[f64]) -> Result<Vec<f64>> {
    if edges.len() < 2 {
        return Err(Error::InvalidParameter {
            name: "edges",
            message: "need at least two edges",
        });
    }
    if let Some(w) = weights {
        if w.len() != values.len() {
            return Err(Error::DimensionMismatch {
                expected: values.len(),
                found: w.len(),
            });
        }
    }

    let n_bins = edges.len() - 1;
    let first = edges[0];
    let last = edges[n_bins];
    let mut counts = vec![0.0f64; n_bins];
    for (i, &v) in values.iter().enumerate() {
        if v < first || v > last {
            continue;
        }
        let bin = if v == last {
            n_bins - 1
        } else {
            util::search_sorted_right(edges, v) - 1
        };
        counts[bin] += weights.map_or(1.0, |w| w[i]);
    }

    let total: f64 = counts.iter().sum();
    if !(total > 0.0) {
        return Err(Error::Degenerate("histogram has no mass inside its edges"));
    }
    Ok(counts
        .iter()
        .zip(edges.windows(2))
        .map(|(c, e)| c / (total * (e[1] - e[0])) / DENSITY_SCALE)
        .collect())
}
