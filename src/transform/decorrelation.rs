//! Decorrelation of time-correlated series.
//!
//! The estimator is a named capability behind [`DecorrelationEstimator`]:
//! given a series it reports the statistical inefficiency `g` (the spacing,
//! in samples, between effectively independent points) and the indices of a
//! decorrelated subsequence.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DecorrelationError {
    #[error("series has zero variance; statistical inefficiency is undefined")]
    ZeroVariance,
    #[error("series needs at least {needed} points, got {found}")]
    TooShort { needed: usize, found: usize },
}

pub trait DecorrelationEstimator {
    /// Statistical inefficiency `g >= 1` of the series.
    fn statistical_inefficiency(&self, series: &[f64]) -> Result<f64, DecorrelationError>;

    /// Indices of an approximately uncorrelated subsequence of a series of
    /// length `len` with inefficiency `g`.
    fn decorrelated_indices(&self, len: usize, g: f64) -> Vec<usize> {
        let mut indices: Vec<usize> = Vec::new();
        let mut n = 0usize;
        loop {
            let t = (n as f64 * g).round_ties_even() as usize;
            if t >= len {
                break;
            }
            if indices.last() != Some(&t) {
                indices.push(t);
            }
            n += 1;
        }
        indices
    }

    /// Estimate `g` and return the decorrelated indices in one call.
    fn subsample_indices(&self, series: &[f64]) -> Result<Vec<usize>, DecorrelationError> {
        let g = self.statistical_inefficiency(series)?;
        log::debug!("Statistical inefficiency g = {g:.3}");
        Ok(self.decorrelated_indices(series.len(), g))
    }
}

/// Direct-sum autocorrelation estimator.
///
/// The normalized autocorrelation `C(t)` is accumulated as
/// `g = 1 + 2 Σ C(t) (1 - t/N)` until `C(t)` first drops to zero or below
/// after `min_lag`.
#[derive(Debug, Clone, Copy)]
pub struct StatisticalInefficiency {
    /// Lags up to this one are always summed, whatever their sign.
    pub min_lag: usize,
    /// Grow the lag step by one after every term.
    pub fast: bool,
}

impl Default for StatisticalInefficiency {
    fn default() -> Self {
        Self {
            min_lag: 3,
            fast: false,
        }
    }
}

impl DecorrelationEstimator for StatisticalInefficiency {
    fn statistical_inefficiency(&self, series: &[f64]) -> Result<f64, DecorrelationError> {
        let n = series.len();
        if n < 2 {
            return Err(DecorrelationError::TooShort { needed: 2, found: n });
        }

        let mean = series.iter().sum::<f64>() / n as f64;
        let delta: Vec<f64> = series.iter().map(|v| v - mean).collect();
        let sigma2 = delta.iter().map(|d| d * d).sum::<f64>() / n as f64;
        if sigma2 == 0.0 {
            return Err(DecorrelationError::ZeroVariance);
        }

        let mut g = 1.0;
        let mut t = 1usize;
        let mut increment = 1usize;
        while t < n - 1 {
            let c = delta[..n - t]
                .iter()
                .zip(&delta[t..])
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / ((n - t) as f64 * sigma2);

            if c <= 0.0 && t > self.min_lag {
                break;
            }
            g += 2.0 * c * (1.0 - t as f64 / n as f64) * increment as f64;
            t += increment;
            if self.fast {
                increment += 1;
            }
        }

        Ok(g.max(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic LCG noise in [-0.5, 0.5).
    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 11) as f64 / (1u64 << 53) as f64 - 0.5
            })
            .collect()
    }

    fn ar1(n: usize, phi: f64) -> Vec<f64> {
        let eps = noise(n, 7);
        let mut out = Vec::with_capacity(n);
        let mut prev = 0.0;
        for e in eps {
            prev = phi * prev + e;
            out.push(prev);
        }
        out
    }

    #[test]
    fn white_noise_is_nearly_uncorrelated() {
        let g = StatisticalInefficiency::default()
            .statistical_inefficiency(&noise(5000, 42))
            .unwrap();
        assert!(g >= 1.0);
        assert!(g < 1.5, "g = {g}");
    }

    #[test]
    fn correlated_series_has_larger_g() {
        let est = StatisticalInefficiency::default();
        let g_white = est.statistical_inefficiency(&noise(5000, 42)).unwrap();
        let g_ar = est.statistical_inefficiency(&ar1(5000, 0.9)).unwrap();
        assert!(g_ar > 5.0 * g_white, "g_ar = {g_ar}, g_white = {g_white}");
    }

    #[test]
    fn constant_series_is_rejected() {
        let est = StatisticalInefficiency::default();
        assert_eq!(
            est.statistical_inefficiency(&[2.0; 10]),
            Err(DecorrelationError::ZeroVariance)
        );
        assert!(matches!(
            est.statistical_inefficiency(&[1.0]),
            Err(DecorrelationError::TooShort { .. })
        ));
    }

    #[test]
    fn indices_follow_rounded_multiples() {
        let est = StatisticalInefficiency::default();
        assert_eq!(est.decorrelated_indices(5, 1.0), vec![0, 1, 2, 3, 4]);
        assert_eq!(est.decorrelated_indices(10, 2.5), vec![0, 2, 5, 8]);
        assert_eq!(est.decorrelated_indices(7, 3.0), vec![0, 3, 6]);
        assert!(est.decorrelated_indices(0, 2.0).is_empty());
    }

    #[test]
    fn subsample_shortens_correlated_data() {
        let series = ar1(2000, 0.95);
        let idx = StatisticalInefficiency::default()
            .subsample_indices(&series)
            .unwrap();
        assert!(idx.len() < series.len() / 5);
        assert_eq!(idx[0], 0);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }
}
