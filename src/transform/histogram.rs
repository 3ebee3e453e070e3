use std::f64::consts::TAU;

/// Equal-width histogram over a closed range.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` edges.
    pub edges: Vec<f64>,
    /// Counts or weights per bin.
    pub counts: Vec<f64>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    pub fn max_count(&self) -> f64 {
        self.counts.iter().copied().fold(0.0, f64::max)
    }

    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }
}

/// Bin `values` into `bins` equal bins over `[lo, hi]`.
///
/// The last bin includes `hi`; values outside the range are dropped. Each
/// value contributes `weight`.
pub fn histogram(values: &[f64], lo: f64, hi: f64, bins: usize, weight: f64) -> Histogram {
    let bins = bins.max(1);
    let width = (hi - lo) / bins as f64;
    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0.0; bins];

    for &v in values {
        if !(lo..=hi).contains(&v) {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += weight;
    }

    Histogram { edges, counts }
}

/// Histogram whose bar heights sum to one (each value weighs `1/N`).
pub fn normalized_histogram(values: &[f64], lo: f64, hi: f64, bins: usize) -> Histogram {
    let weight = if values.is_empty() {
        0.0
    } else {
        1.0 / values.len() as f64
    };
    histogram(values, lo, hi, bins, weight)
}

/// Angular histogram in radians.
///
/// Angles are wrapped into `[0, 2π)`. Bin `k` is centered on `k * w` with
/// `w = 2π / bins`, so the first bin straddles zero.
#[derive(Debug, Clone, PartialEq)]
pub struct AngularHistogram {
    pub bin_width: f64,
    pub counts: Vec<f64>,
}

impl AngularHistogram {
    /// Center angle of each bin.
    pub fn centers(&self) -> Vec<f64> {
        (0..self.counts.len())
            .map(|k| k as f64 * self.bin_width)
            .collect()
    }

    pub fn max_count(&self) -> f64 {
        self.counts.iter().copied().fold(0.0, f64::max)
    }
}

pub fn angular_histogram(radians: &[f64], bins: usize) -> AngularHistogram {
    let bins = bins.max(1);
    let width = TAU / bins as f64;
    let mut counts = vec![0.0; bins];
    for &a in radians {
        if !a.is_finite() {
            continue;
        }
        let shifted = (a + 0.5 * width).rem_euclid(TAU);
        let idx = ((shifted / width) as usize).min(bins - 1);
        counts[idx] += 1.0;
    }
    AngularHistogram {
        bin_width: width,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_bin_is_closed() {
        let h = histogram(&[0.0, 0.5, 1.0, 1.5], 0.0, 1.0, 2, 1.0);
        assert_eq!(h.counts, vec![1.0, 2.0]);
        assert_eq!(h.edges, vec![0.0, 0.5, 1.0]);
        assert_eq!(h.centers(), vec![0.25, 0.75]);
    }

    #[test]
    fn normalized_sums_to_one() {
        let values: Vec<f64> = (0..40).map(|i| -1.0 + i as f64 * 0.05).collect();
        let h = normalized_histogram(&values, -1.0, 1.0, 100);
        assert_eq!(h.counts.len(), 100);
        assert!((h.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn angles_are_centered_and_wrapped() {
        let deg = |d: f64| d.to_radians();
        let h = angular_histogram(&[deg(0.0), deg(-2.0), deg(359.0), deg(90.0), deg(452.0)], 72);
        assert_eq!(h.counts.len(), 72);
        // 0, -2 and 359 all land in the bin centered on zero
        assert_eq!(h.counts[0], 3.0);
        // 90 and 452 (= 92) share the bin centered on 90
        assert_eq!(h.counts[18], 2.0);
        assert!((h.centers()[18] - deg(90.0)).abs() < 1e-12);
    }
}
