//! Empirical semivariogram
//!
//! All pairwise planar separations are sorted and grouped into at most
//! [`MAX_LAGS`] equal-width distance bins. Each populated bin yields one
//! `(lag, semivariance)` sample, where semivariance is the mean absolute
//! value difference of its pairs.

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{KrigingError, Result};

/// Upper bound on the number of lag bins
pub const MAX_LAGS: usize = 30;

/// Empirical variogram: semivariance values at discrete lag distances
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmpiricalVariogram {
    /// Lag distances (mean pair distance per bin), ascending
    pub lags: Vec<f64>,
    /// Semivariance at each lag
    pub semivariance: Vec<f64>,
    /// Number of point pairs contributing to each lag
    pub pair_counts: Vec<usize>,
}

impl EmpiricalVariogram {
    /// Number of populated bins
    pub fn len(&self) -> usize {
        self.lags.len()
    }

    /// `true` when no bin is populated
    pub fn is_empty(&self) -> bool {
        self.lags.is_empty()
    }

    /// Spread between the first and last lag
    pub fn range(&self) -> f64 {
        match (self.lags.first(), self.lags.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

/// Build the empirical variogram of `samples`
///
/// With at most [`MAX_LAGS`] pairs every pair is its own bin. Otherwise pairs
/// fall into buckets `(i·tol, (i+1)·tol]` with `tol = max_distance / MAX_LAGS`;
/// the last bucket is closed at the maximum distance.
///
/// # Errors
///
/// `InsufficientLagBins` if fewer than two bins with distinct lags result.
pub fn empirical_variogram(samples: &[DVec3]) -> Result<EmpiricalVariogram> {
    let n = samples.len();
    let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = samples[i].truncate().distance(samples[j].truncate());
            pairs.push((d, (samples[i].z - samples[j].z).abs()));
        }
    }
    // stable, so equal distances keep generation order
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut variogram = EmpiricalVariogram::default();
    if pairs.len() <= MAX_LAGS {
        for &(d, v) in &pairs {
            variogram.lags.push(d);
            variogram.semivariance.push(v);
            variogram.pair_counts.push(1);
        }
    } else {
        let range = pairs[pairs.len() - 1].0;
        let tolerance = range / MAX_LAGS as f64;
        let mut j = 0;
        for i in 0..MAX_LAGS {
            if j >= pairs.len() {
                break;
            }
            let upper = if i + 1 == MAX_LAGS {
                f64::INFINITY
            } else {
                (i + 1) as f64 * tolerance
            };
            let (mut dist_sum, mut value_sum, mut count) = (0.0, 0.0, 0usize);
            while j < pairs.len() && pairs[j].0 <= upper {
                dist_sum += pairs[j].0;
                value_sum += pairs[j].1;
                count += 1;
                j += 1;
            }
            if count > 0 {
                variogram.lags.push(dist_sum / count as f64);
                variogram.semivariance.push(value_sum / count as f64);
                variogram.pair_counts.push(count);
            }
        }
    }

    let distinct = match variogram.lags.first() {
        None => 0,
        Some(_) => 1 + variogram.lags.windows(2).filter(|w| w[1] > w[0]).count(),
    };
    if distinct < 2 {
        return Err(KrigingError::InsufficientLagBins { bins: distinct });
    }
    Ok(variogram)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_sets_use_each_pair() {
        let samples = [
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(3.0, 0.0, 4.0),
            DVec3::new(0.0, 4.0, 2.0),
        ];
        let v = empirical_variogram(&samples).unwrap();
        assert_eq!(v.lags, vec![3.0, 4.0, 5.0]);
        assert_eq!(v.semivariance, vec![3.0, 1.0, 2.0]);
        assert_eq!(v.pair_counts, vec![1, 1, 1]);
        assert_eq!(v.range(), 2.0);
    }

    #[test]
    fn test_binning_caps_lag_count() {
        // 10x10 lattice: 4950 pairs
        let samples: Vec<DVec3> = (0..100)
            .map(|i| DVec3::new((i % 10) as f64, (i / 10) as f64, (i % 7) as f64))
            .collect();
        let v = empirical_variogram(&samples).unwrap();

        assert!(v.len() <= MAX_LAGS);
        assert!(v.len() >= 2);
        assert_eq!(v.pair_counts.iter().sum::<usize>(), 4950);
        assert!(v.lags.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_insufficient_bins() {
        let two = [DVec3::new(0.0, 0.0, 1.0), DVec3::new(1.0, 0.0, 2.0)];
        assert_eq!(
            empirical_variogram(&two),
            Err(KrigingError::InsufficientLagBins { bins: 1 })
        );

        // coincident samples: three pairs, all at lag zero
        let stacked = [
            DVec3::new(2.0, 2.0, 1.0),
            DVec3::new(2.0, 2.0, 2.0),
            DVec3::new(2.0, 2.0, 3.0),
        ];
        assert_eq!(
            empirical_variogram(&stacked),
            Err(KrigingError::InsufficientLagBins { bins: 1 })
        );

        assert_eq!(
            empirical_variogram(&[]),
            Err(KrigingError::InsufficientLagBins { bins: 0 })
        );
    }
}
