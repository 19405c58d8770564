//! Trailing moving-average smoothing of a density curve.

use crate::error::{Error, Result};

/// Smooth `density` with an unweighted trailing window of `window` samples.
///
/// The first `window - 1` samples have no full window behind them and are
/// copied through unchanged; every later sample is the mean of itself and the
/// `window - 1` samples before it. The output always has the input's length.
pub fn smooth(density: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(Error::InvalidParameter {
            name: "window",
            message: "must be at least 1",
        });
    }

    let head = (window - 1).min(density.len());
    let mut out = Vec::with_capacity(density.len());
    out.extend_from_slice(&density[..head]);
    // Each window is summed from scratch: equal windows must give bit-identical
    // means, otherwise flat plateaus grow spurious extrema.
    out.extend(
        density
            .windows(window)
            .map(|w| w.iter().sum::<f64>() / window as f64),
    );

    debug_assert_eq!(out.len(), density.len());
    Ok(out)
}

/// Window size for `auto`: one tenth of the positive samples, at least 1.
pub fn auto_window_size(density: &[f64]) -> usize {
    let positive = density.iter().filter(|&&d| d > 0.0).count();
    (positive / 10).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_one_is_identity() {
        let d = [0.0, 1.0, 3.0, 2.0];
        assert_eq!(smooth(&d, 1).unwrap(), d.to_vec());
    }

    #[test]
    fn test_trailing_mean() {
        let d = [1.0, 2.0, 3.0, 4.0, 5.0];
        let s = smooth(&d, 3).unwrap();
        assert_eq!(s, vec![1.0, 2.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_window_longer_than_input_copies() {
        let d = [1.0, 2.0];
        assert_eq!(smooth(&d, 5).unwrap(), d.to_vec());
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(smooth(&[1.0], 0).is_err());
    }

    #[test]
    fn test_auto_window_size() {
        assert_eq!(auto_window_size(&[0.0; 50]), 1);
        assert_eq!(auto_window_size(&[1.0; 9]), 1);
        assert_eq!(auto_window_size(&[1.0; 25]), 2);
        let mut d = vec![0.0; 100];
        d.extend(vec![0.5; 100]);
        assert_eq!(auto_window_size(&d), 10);
    }
}
