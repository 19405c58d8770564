use crate::error::{Error, Result};

/// Fail on the first NaN or infinite value.
pub(crate) fn check_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(Error::NonFinite { index }),
        None => Ok(()),
    }
}

/// `(min, max)` of a non-empty slice of finite values.
pub(crate) fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Mean of `|x|` over the given values; `0.0` for an empty iterator.
pub(crate) fn mean_abs(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0f64, 0usize), |(s, n), v| (s + v.abs(), n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// `start, start + step, ...` for every value strictly below `stop`.
///
/// Values are computed as `start + i * step` rather than accumulated, so a
/// grid built twice from the same inputs is bit-identical.
pub(crate) fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    debug_assert!(step > 0.0);
    let len = ((stop - start) / step).ceil();
    if !(len.is_finite() && len > 0.0) {
        return Vec::new();
    }
    (0..len as usize).map(|i| start + i as f64 * step).collect()
}

/// `num` evenly spaced values over `[start, stop]`, both ends included.
pub(crate) fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut out: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            out[num - 1] = stop;
            out
        }
    }
}

/// Full-overlap discrete convolution; output length is `a.len() + b.len() - 1`.
pub(crate) fn convolve_full(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0f64; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &k) in b.iter().enumerate() {
            out[i + j] += x * k;
        }
    }
    out
}

/// Midpoints of adjacent edges.
pub(crate) fn midpoints(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
}

/// Linear-interpolated quantile of pre-sorted data (R-7, numpy's default).
pub(crate) fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let j = h.floor() as usize;
    let g = h - h.floor();
    if j + 1 >= n {
        sorted[n - 1]
    } else {
        (1.0 - g) * sorted[j] + g * sorted[j + 1]
    }
}

/// Weighted quantile with midpoint plotting positions.
///
/// Each sample sits at cumulative weight `(W_i - w_i / 2) / W`; `p` is
/// interpolated linearly between neighbouring positions and clamped to the
/// extreme samples outside them. Zero-weight samples are ignored.
pub(crate) fn weighted_quantile(values: &[f64], weights: &[f64], p: f64) -> f64 {
    debug_assert_eq!(values.len(), weights.len());
    let mut pairs: Vec<(f64, f64)> = values
        .iter()
        .zip(weights)
        .filter(|(_, &w)| w > 0.0)
        .map(|(&v, &w)| (v, w))
        .collect();
    if pairs.is_empty() {
        return f64::NAN;
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    let mut cum = 0.0;
    let positions: Vec<f64> = pairs
        .iter()
        .map(|(_, w)| {
            cum += w;
            (cum - w / 2.0) / total
        })
        .collect();

    let p = p.clamp(0.0, 1.0);
    if p <= positions[0] {
        return pairs[0].0;
    }
    let last = pairs.len() - 1;
    if p >= positions[last] {
        return pairs[last].0;
    }
    // positions[0] < p < positions[last], so 1 <= hi <= last.
    let hi = positions.partition_point(|&q| q < p);
    let lo = hi - 1;
    let span = positions[hi] - positions[lo];
    if span <= 0.0 {
        return pairs[hi].0;
    }
    let t = (p - positions[lo]) / span;
    pairs[lo].0 + t * (pairs[hi].0 - pairs[lo].0)
}

/// Index of the first element `> x` in an ascending slice (numpy `side='right'`).
#[inline]
pub(crate) fn search_sorted_right(sorted: &[f64], x: f64) -> usize {
    sorted.partition_point(|&v| v <= x)
}

/// Index of the first element `>= x` in an ascending slice (numpy `side='left'`).
#[inline]
pub(crate) fn search_sorted_left(sorted: &[f64], x: f64) -> usize {
    sorted.partition_point(|&v| v < x)
}
