//! Weighted Gaussian kernel density estimate over 1-D samples.
//!
//! The kernel width is the (weighted, unbiased) sample standard deviation
//! scaled by a bandwidth factor. With normalised weights `w`:
//!
//! ```text
//! var    = Σ w (x - μ)² / (1 - Σ w²)
//! n_eff  = 1 / Σ w²
//! scott  = n_eff^(-1/5)
//! silver = (3 n_eff / 4)^(-1/5)
//! f(x)   = Σ w_i N(x; x_i, var · factor²)
//! ```

use std::f64::consts::PI;

use crate::config::Bandwidth;
use crate::error::{Error, Result};

/// A fitted kernel density estimate.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    dataset: Vec<f64>,
    weights: Vec<f64>,
    factor: f64,
    kernel_var: f64,
}

impl GaussianKde {
    /// Fit on `data` with optional per-sample `weights` (uniform when `None`).
    pub fn fit(data: &[f64], weights: Option<&[f64]>, bandwidth: Bandwidth) -> Result<Self> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let weights = match weights {
            Some(w) if w.len() != n => {
                return Err(Error::DimensionMismatch {
                    expected: n,
                    found: w.len(),
                })
            }
            Some(w) => {
                let total: f64 = w.iter().sum();
                if !(total.is_finite() && total > 0.0) {
                    return Err(Error::Degenerate("kernel weights sum to zero"));
                }
                w.iter().map(|x| x / total).collect::<Vec<_>>()
            }
            None => vec![1.0 / n as f64; n],
        };

        let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
        let n_eff = 1.0 / sum_sq;
        let factor = match bandwidth {
            Bandwidth::Scott => n_eff.powf(-0.2),
            Bandwidth::Silverman => (n_eff * 3.0 / 4.0).powf(-0.2),
            Bandwidth::Factor(f) => f,
        };

        let mu: f64 = data.iter().zip(&weights).map(|(x, w)| w * x).sum();
        let denom = 1.0 - sum_sq;
        if denom <= 0.0 {
            return Err(Error::Degenerate("kernel estimate needs more than one weighted sample"));
        }
        let var = data
            .iter()
            .zip(&weights)
            .map(|(x, w)| w * (x - mu).powi(2))
            .sum::<f64>()
            / denom;
        let kernel_var = var * factor * factor;
        if !(kernel_var.is_finite() && kernel_var > 0.0) {
            return Err(Error::Degenerate("kernel estimate needs non-zero variance"));
        }

        Ok(Self {
            dataset: data.to_vec(),
            weights,
            factor,
            kernel_var,
        })
    }

    /// Bandwidth factor chosen by the rule.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Standard deviation of each Gaussian kernel.
    pub fn kernel_std(&self) -> f64 {
        self.kernel_var.sqrt()
    }

    /// Evaluate the density at every point.
    pub fn evaluate(&self, points: &[f64]) -> Vec<f64> {
        let norm = 1.0 / (2.0 * PI * self.kernel_var).sqrt();
        points
            .iter()
            .map(|&x| {
                self.dataset
                    .iter()
                    .zip(&self.weights)
                    .map(|(xi, w)| {
                        let d = x - xi;
                        w * (-0.5 * d * d / self.kernel_var).exp()
                    })
                    .sum::<f64>()
                    * norm
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kde_integrates_to_one() {
        let data = vec![-1.0, -0.5, 0.0, 0.2, 0.4, 1.5];
        let kde = GaussianKde::fit(&data, None, Bandwidth::Scott).unwrap();
        let step = 0.01;
        let grid: Vec<f64> = (0..1200).map(|i| -6.0 + i as f64 * step).collect();
        let area: f64 = kde.evaluate(&grid).iter().sum::<f64>() * step;
        assert!((area - 1.0).abs() < 1e-3, "area={area}");
    }

    #[test]
    fn test_scott_vs_silverman_factor() {
        let data: Vec<f64> = (0..32).map(|i| i as f64).collect();
        let scott = GaussianKde::fit(&data, None, Bandwidth::Scott).unwrap();
        let silverman = GaussianKde::fit(&data, None, Bandwidth::Silverman).unwrap();
        assert!((scott.factor() - 32f64.powf(-0.2)).abs() < 1e-12);
        assert!(silverman.factor() > scott.factor());
    }

    #[test]
    fn test_weights_shift_mass() {
        let data = vec![0.0, 1.0, 5.0];
        let kde = GaussianKde::fit(&data, Some(&[1.0, 1.0, 8.0]), Bandwidth::Factor(0.1)).unwrap();
        let d = kde.evaluate(&[0.0, 5.0]);
        assert!(d[1] > d[0]);
    }

    #[test]
    fn test_constant_data_is_degenerate() {
        let data = vec![2.0; 5];
        assert!(matches!(
            GaussianKde::fit(&data, None, Bandwidth::Scott),
            Err(Error::Degenerate(_))
        ));
    }

    #[test]
    fn test_weight_length_mismatch() {
        let data = vec![0.0, 1.0];
        assert!(matches!(
            GaussianKde::fit(&data, Some(&[1.0]), Bandwidth::Scott),
            Err(Error::DimensionMismatch { expected: 2, found: 1 })
        ));
    }
}
