//! Per-class intensity statistics.

use serde::{Deserialize, Serialize};

/// Sample statistics of one class inside a statistics window.
///
/// `mean` is 0 for an empty class and `variance` is 0 when fewer than two
/// samples are available; such classes are reported as degenerate and never
/// feed a density evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    /// Number of samples.
    pub n: usize,
    /// Sample mean.
    pub mean: f64,
    /// Unbiased sample variance (divides by `n - 1`).
    pub variance: f64,
}

impl ClassStats {
    /// Whether the class has enough samples for an unbiased variance.
    pub fn is_estimable(&self) -> bool {
        self.n >= 2
    }
}

/// Welford running mean and sum of squared deviations for one class.
///
/// A class whose samples all share one value finishes with a variance of
/// exactly 0.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ClassAccumulator {
    n: usize,
    mean: f64,
    m2: f64,
}

impl ClassAccumulator {
    #[inline]
    pub(crate) fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub(crate) fn finish(&self) -> ClassStats {
        if self.n == 0 {
            return ClassStats::default();
        }
        let variance = if self.n >= 2 {
            (self.m2 / (self.n - 1) as f64).max(0.0)
        } else {
            0.0
        };
        ClassStats {
            n: self.n,
            mean: self.mean,
            variance,
        }
    }
}

/// Natural log of the normal density `N(mean, variance)` at `x`.
#[inline]
pub(crate) fn log_normal_density(mean: f64, variance: f64, x: f64) -> f64 {
    let d = x - mean;
    -0.5 * d * d / variance - 0.5 * (2.0 * std::f64::consts::PI * variance).ln()
}
