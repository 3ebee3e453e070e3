use thiserror::Error;

use super::decorrelation::{DecorrelationError, DecorrelationEstimator};
use crate::data::{DataError, Series, SeriesSet};

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("moving average window must be between 1 and the series length ({len}), got {window}")]
    InvalidWindow { window: usize, len: usize },
    #[error("cannot split {len} points into {groups} groups")]
    InvalidGroups { len: usize, groups: usize },
    #[error("series '{label}': {source}")]
    Decorrelation {
        label: String,
        #[source]
        source: DecorrelationError,
    },
    #[error(transparent)]
    Data(#[from] DataError),
}

/// The single smoothing step applied before plotting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ProcessingMode {
    #[default]
    Raw,
    /// Keep only decorrelated samples.
    Subsample,
    /// Moving average over this many points; x is regenerated as
    /// `x_scale * i`.
    MovingAverage { window: usize, x_scale: f64 },
}

impl ProcessingMode {
    /// Build the mode from the two mutually exclusive options.
    pub fn from_options(subsample: bool, mean_window: Option<usize>, x_scale: f64) -> Result<Self, &'static str> {
        match (subsample, mean_window) {
            (true, Some(_)) => Err("subsampling and moving averages cannot be combined"),
            (true, None) => Ok(ProcessingMode::Subsample),
            (false, Some(0)) | (false, None) => Ok(ProcessingMode::Raw),
            (false, Some(window)) => Ok(ProcessingMode::MovingAverage { window, x_scale }),
        }
    }
}

/// Valid-range moving average (`np.convolve(y, ones(w)/w, 'valid')`).
///
/// Each window is summed on its own so a large value does not leave
/// rounding error behind once it drops out.
pub fn moving_average(y: &[f64], window: usize) -> Result<Vec<f64>, SeriesError> {
    if window == 0 || window > y.len() {
        return Err(SeriesError::InvalidWindow {
            window,
            len: y.len(),
        });
    }
    let w = window as f64;
    Ok(y
        .windows(window)
        .map(|win| {
            let first = win[0];
            if win.iter().all(|&v| v == first) {
                first
            } else {
                win.iter().sum::<f64>() / w
            }
        })
        .collect())
}

/// Split into `groups` contiguous pieces; the first `len % groups` pieces
/// get one extra element.
pub fn split_groups(values: &[f64], groups: usize) -> Result<Vec<Vec<f64>>, SeriesError> {
    if groups == 0 || groups > values.len() {
        return Err(SeriesError::InvalidGroups {
            len: values.len(),
            groups,
        });
    }
    let base = values.len() / groups;
    let extra = values.len() % groups;
    let mut out = Vec::with_capacity(groups);
    let mut start = 0;
    for g in 0..groups {
        let size = base + usize::from(g < extra);
        out.push(values[start..start + size].to_vec());
        start += size;
    }
    Ok(out)
}

/// Sorted divisors of `n`.
pub fn factorize(n: usize) -> Vec<usize> {
    let mut factors = Vec::new();
    let mut i = 1;
    while i * i <= n {
        if n % i == 0 {
            factors.push(i);
            if i != n / i {
                factors.push(n / i);
            }
        }
        i += 1;
    }
    factors.sort_unstable();
    factors
}

/// Apply the processing mode to every series in the set.
pub fn apply_mode(
    set: &SeriesSet,
    mode: ProcessingMode,
    estimator: &impl DecorrelationEstimator,
) -> Result<SeriesSet, SeriesError> {
    let series = set
        .iter()
        .map(|s| match mode {
            ProcessingMode::Raw => Ok(s.clone()),
            ProcessingMode::Subsample => subsample(s, estimator),
            ProcessingMode::MovingAverage { window, x_scale } => {
                let y = moving_average(&s.y, window)?;
                let x = (0..y.len()).map(|i| x_scale * i as f64).collect();
                Ok(Series::new(s.label.clone(), x, y)?)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SeriesSet::new(series))
}

/// Decorrelated subsequence of one series (x, y and errors alike).
pub fn subsample(series: &Series, estimator: &impl DecorrelationEstimator) -> Result<Series, SeriesError> {
    let indices = estimator
        .subsample_indices(&series.y)
        .map_err(|source| SeriesError::Decorrelation {
            label: series.label.clone(),
            source,
        })?;
    log::info!(
        "Series '{}': {} points subsampled to {}",
        series.label,
        series.len(),
        indices.len()
    );
    let pick = |v: &[f64]| indices.iter().map(|&i| v[i]).collect::<Vec<_>>();
    let mut out = Series::new(series.label.clone(), pick(&series.x), pick(&series.y))?;
    if let Some(err) = &series.err {
        out = out.with_errors(pick(err))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::decorrelation::StatisticalInefficiency;

    #[test]
    fn moving_average_length_and_values() {
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = moving_average(&y, 2).unwrap();
        assert_eq!(out, vec![1.5, 2.5, 3.5, 4.5]);
        assert_eq!(moving_average(&y, 5).unwrap(), vec![3.0]);
        for w in 1..=5 {
            assert_eq!(moving_average(&y, w).unwrap().len(), y.len() - w + 1);
        }
    }

    #[test]
    fn moving_average_of_constant_is_constant() {
        for c in [4.25, 0.1, 0.3, 1.1] {
            let y = vec![c; 50];
            let out = moving_average(&y, 7).unwrap();
            assert_eq!(out.len(), 44);
            assert!(out.iter().all(|&v| v == c), "{c}: {out:?}");
        }
    }

    #[test]
    fn spike_does_not_swamp_later_windows() {
        let out = moving_average(&[1e16, 1.0, 3.0, 5.0, 1.0, 1.0], 2).unwrap();
        assert_eq!(out, vec![5e15, 2.0, 4.0, 3.0, 1.0]);
    }

    #[test]
    fn moving_average_rejects_bad_windows() {
        assert!(moving_average(&[1.0, 2.0], 0).is_err());
        assert!(moving_average(&[1.0, 2.0], 3).is_err());
    }

    #[test]
    fn split_matches_array_split() {
        let v: Vec<f64> = (0..10).map(f64::from).collect();
        let parts = split_groups(&v, 3).unwrap();
        let sizes: Vec<usize> = parts.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        assert_eq!(parts[1], vec![4.0, 5.0, 6.0]);
        assert!(split_groups(&v, 0).is_err());
        assert!(split_groups(&v, 11).is_err());
    }

    #[test]
    fn factorize_lists_divisors() {
        assert_eq!(factorize(12), vec![1, 2, 3, 4, 6, 12]);
        assert_eq!(factorize(16), vec![1, 2, 4, 8, 16]);
        assert_eq!(factorize(1), vec![1]);
    }

    #[test]
    fn modes_are_exclusive() {
        assert!(ProcessingMode::from_options(true, Some(5), 1.0).is_err());
        assert_eq!(ProcessingMode::from_options(false, Some(0), 1.0), Ok(ProcessingMode::Raw));
        assert_eq!(
            ProcessingMode::from_options(false, Some(3), 0.5),
            Ok(ProcessingMode::MovingAverage { window: 3, x_scale: 0.5 })
        );
    }

    #[test]
    fn moving_average_mode_regenerates_x() {
        let s = Series::new("a", vec![10.0, 11.0, 12.0, 13.0], vec![1.0, 1.0, 1.0, 1.0]).unwrap();
        let set = SeriesSet::new(vec![s]);
        let mode = ProcessingMode::MovingAverage { window: 2, x_scale: 0.5 };
        let out = apply_mode(&set, mode, &StatisticalInefficiency::default()).unwrap();
        assert_eq!(out.series[0].x, vec![0.0, 0.5, 1.0]);
        assert_eq!(out.series[0].y, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn subsample_keeps_x_aligned() {
        let x: Vec<f64> = (0..200).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| (v / 10.0).sin()).collect();
        let s = Series::new("sin", x, y).unwrap();
        let out = subsample(&s, &StatisticalInefficiency::default()).unwrap();
        assert!(out.len() < s.len());
        for (xi, yi) in out.x.iter().zip(&out.y) {
            assert!((yi - (xi / 10.0).sin()).abs() < 1e-12);
        }
    }
}
