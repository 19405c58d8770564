//! Local extrema of a density curve and the cluster boundaries they induce.
//!
//! Neighbours wrap around: the first sample is compared with the last. A local
//! maximum is strictly greater than both neighbours and has positive density; a
//! local minimum is less than or equal to both neighbours. Between any two maxima
//! there is therefore at least one minimum.

/// Indices of local maxima and minima, each in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extrema {
    /// Candidate cluster centres.
    pub maxima: Vec<usize>,
    /// Candidate cluster boundaries.
    pub minima: Vec<usize>,
}

/// Find local extrema of `density` with cyclic neighbours.
pub fn local_extrema(density: &[f64]) -> Extrema {
    let n = density.len();
    let mut extrema = Extrema::default();
    for (i, &d) in density.iter().enumerate() {
        let prev = density[(i + n - 1) % n];
        let next = density[(i + 1) % n];
        if d > prev && d > next && d > 0.0 {
            extrema.maxima.push(i);
        }
        if d <= prev && d <= next {
            extrema.minima.push(i);
        }
    }
    extrema
}

/// `[-inf, positions[minima]..., +inf]`, sorted ascending.
///
/// Minima found by [`local_extrema`] over strictly increasing positions are
/// already ascending; the sort makes the interval search independent of that.
pub fn boundaries(positions: &[f64], minima: &[usize]) -> Vec<f64> {
    let mut out = Vec::with_capacity(minima.len() + 2);
    out.push(f64::NEG_INFINITY);
    out.extend(minima.iter().map(|&i| positions[i]));
    out.push(f64::INFINITY);
    out.sort_by(|a, b| a.total_cmp(b));
    out
}
