//! Local two-class classification of boundary voxels.
//!
//! For a boundary voxel `v`, the intensities inside its statistics window are
//! split by the current label into a bone class and a background class. Each
//! class is modeled as a Gaussian with its sample mean and unbiased variance,
//! weighted by its share of the window. The voxel is reclassified as
//! background when the background posterior score at `v`'s own intensity
//! strictly exceeds the bone score.
//!
//! Scores are compared as `ln(prior) + ln(density)`, which orders the same
//! way as the products and stays finite for well-separated classes.
//!
//! A window in which either class has fewer than two samples cannot provide
//! an unbiased variance; such voxels are kept and the reason is reported as a
//! [`Degeneracy`].

mod stats;

use serde::{Deserialize, Serialize};

pub use stats::ClassStats;

use crate::neighborhood::StatisticsWindow;
use crate::volume::{Coord, IntensityVolume, LabelVolume, BONE};
use stats::{log_normal_density, ClassAccumulator};

/// Outcome of classifying one boundary voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The voxel stays bone.
    Keep,
    /// The voxel looks like background and is flipped.
    Reclassify,
}

/// Why a window could not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degeneracy {
    /// No bone-labeled voxel in the window.
    NoBoneSamples,
    /// No background-labeled voxel in the window.
    NoBackgroundSamples,
    /// A class holds a single sample, so its unbiased variance is undefined.
    SingleSample,
}

/// Log-domain posterior scores for the two classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosteriorScores {
    pub bone: f64,
    pub background: f64,
}

/// Full classification record for one voxel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub decision: Decision,
    pub bone: ClassStats,
    pub background: ClassStats,
    /// Present when both classes were estimable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<PosteriorScores>,
    /// Present when the window was degenerate; the decision is then `Keep`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degeneracy: Option<Degeneracy>,
}

impl Classification {
    pub fn is_reclassified(&self) -> bool {
        self.decision == Decision::Reclassify
    }
}

/// Classify boundary voxel `v` from its local window statistics.
///
/// `variance_floor` replaces the variance of a class whose samples all share
/// one intensity. Any positive class variance is used as estimated.
pub fn classify_voxel(
    intensity: &IntensityVolume,
    label: &LabelVolume,
    v: Coord,
    window: &StatisticsWindow,
    variance_floor: f64,
) -> Classification {
    debug_assert_eq!(label[v], BONE, "classify_voxel called on a non-bone voxel");

    let mut bone = ClassAccumulator::default();
    let mut background = ClassAccumulator::default();
    for w in window.voxels(label.dims(), v) {
        let x = f64::from(intensity[w]);
        if label[w] == BONE {
            bone.push(x);
        } else {
            background.push(x);
        }
    }
    let bone = bone.finish();
    let background = background.finish();

    let degeneracy = if bone.n == 0 {
        Some(Degeneracy::NoBoneSamples)
    } else if background.n == 0 {
        Some(Degeneracy::NoBackgroundSamples)
    } else if !bone.is_estimable() || !background.is_estimable() {
        Some(Degeneracy::SingleSample)
    } else {
        None
    };
    if degeneracy.is_some() {
        return Classification {
            decision: Decision::Keep,
            bone,
            background,
            scores: None,
            degeneracy,
        };
    }

    let x = f64::from(intensity[v]);
    let n = (bone.n + background.n) as f64;
    let score = |s: &ClassStats| {
        let variance = if s.variance > 0.0 {
            s.variance
        } else {
            variance_floor
        };
        (s.n as f64 / n).ln() + log_normal_density(s.mean, variance, x)
    };
    let scores = PosteriorScores {
        bone: score(&bone),
        background: score(&background),
    };
    let decision = if scores.background > scores.bone {
        Decision::Reclassify
    } else {
        Decision::Keep
    };

    Classification {
        decision,
        bone,
        background,
        scores: Some(scores),
        degeneracy: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::{Dims, VolumeGrid, BACKGROUND};
    use approx::assert_relative_eq;
    use rand::prelude::*;

    fn line(intensities: &[i16], labels: &[u8]) -> (IntensityVolume, LabelVolume) {
        let dims = Dims::new(intensities.len(), 1, 1);
        (
            VolumeGrid::from_vec(dims, intensities.to_vec()).unwrap(),
            VolumeGrid::from_vec(dims, labels.to_vec()).unwrap(),
        )
    }

    #[test]
    fn bone_like_center_is_kept() {
        let (intensity, label) = line(&[10, 20, 30, 0, 2], &[1, 1, 1, 0, 0]);
        let c = classify_voxel(&intensity, &label, [2, 0, 0], &StatisticsWindow::new(2, 0, 0), 1.0);
        assert_eq!(c.decision, Decision::Keep);
        assert_eq!(c.degeneracy, None);
        assert_eq!((c.bone.n, c.background.n), (3, 2));
        assert_relative_eq!(c.bone.mean, 20.0, epsilon = 1e-12);
        assert_relative_eq!(c.bone.variance, 100.0, epsilon = 1e-9);
        assert_relative_eq!(c.background.mean, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.background.variance, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn background_like_center_is_reclassified() {
        let (intensity, label) = line(&[10, 20, 1, 0, 2], &[1, 1, 1, 0, 0]);
        let c = classify_voxel(&intensity, &label, [2, 0, 0], &StatisticsWindow::new(2, 0, 0), 1.0);
        assert_eq!(c.decision, Decision::Reclassify);

        let scores = c.scores.unwrap();
        let expected_bone = (0.6f64).ln()
            - 0.5 * (2.0 * std::f64::consts::PI * c.bone.variance).ln()
            - 0.5 * (1.0 - c.bone.mean).powi(2) / c.bone.variance;
        let expected_bg = (0.4f64).ln() - 0.5 * (2.0 * std::f64::consts::PI * 2.0).ln();
        assert_relative_eq!(scores.bone, expected_bone, epsilon = 1e-9);
        assert_relative_eq!(scores.background, expected_bg, epsilon = 1e-9);
    }

    #[test]
    fn single_class_window_is_kept_as_degenerate() {
        let (intensity, label) = line(&[0, 0, 0, 500, 500], &[1, 1, 1, 0, 0]);
        let window = StatisticsWindow::new(1, 0, 0);
        let c = classify_voxel(&intensity, &label, [1, 0, 0], &window, 1.0);
        assert_eq!(c.decision, Decision::Keep);
        assert_eq!(c.degeneracy, Some(Degeneracy::NoBackgroundSamples));
        assert!(c.scores.is_none());

        // One background sample: variance undefined.
        let c = classify_voxel(&intensity, &label, [2, 0, 0], &window, 1.0);
        assert_eq!(c.degeneracy, Some(Degeneracy::SingleSample));
        assert_eq!(c.decision, Decision::Keep);
    }

    #[test]
    fn constant_classes_use_variance_floor() {
        let (intensity, label) = line(&[1000, 1000, 0, 0, 0], &[1, 1, 1, 0, 0]);
        let window = StatisticsWindow::new(2, 0, 0);
        let c = classify_voxel(&intensity, &label, [2, 0, 0], &window, 1.0);
        assert_eq!(c.background.variance, 0.0);
        let scores = c.scores.unwrap();
        assert!(scores.bone.is_finite() && scores.background.is_finite());
        assert_eq!(c.decision, Decision::Reclassify);
    }

    #[test]
    fn small_positive_variance_is_not_floored() {
        // Bone: n=4, mean 1.25, var 2.25. Background: n=2, mean 0.5, var 0.5.
        let (intensity, label) = line(&[0, 1, 0, 0, 2, 3], &[0, 0, 1, 1, 1, 1]);
        let window = StatisticsWindow::new(5, 0, 0);
        let c = classify_voxel(&intensity, &label, [2, 0, 0], &window, 1.0);
        assert_relative_eq!(c.background.variance, 0.5, epsilon = 1e-12);
        assert_relative_eq!(c.bone.variance, 2.25, epsilon = 1e-12);

        let scores = c.scores.unwrap();
        let expected_bg = (2.0f64 / 6.0).ln()
            - 0.5 * (2.0 * std::f64::consts::PI * 0.5).ln()
            - 0.5 * 0.25 / 0.5;
        assert_relative_eq!(scores.background, expected_bg, epsilon = 1e-9);
        assert_eq!(c.decision, Decision::Reclassify);

        let tiny_floor = classify_voxel(&intensity, &label, [2, 0, 0], &window, 1e-12);
        assert_eq!(tiny_floor, c);
    }

    #[test]
    fn classification_ignores_labels_outside_window() {
        let dims = Dims::new(20, 20, 5);
        let mut rng = StdRng::seed_from_u64(11);
        let intensity = IntensityVolume::from_fn(dims, |_| rng.gen_range(-200..=1200)).unwrap();
        let mut label = LabelVolume::from_fn(dims, |_| rng.gen_bool(0.5) as u8).unwrap();
        let window = StatisticsWindow::new(3, 3, 1);
        let v = [10, 10, 2];
        label[v] = BONE;

        let before = classify_voxel(&intensity, &label, v, &window, 1.0);
        for idx in 0..dims.voxel_count() {
            let c = dims.coord_of(idx);
            if !window.contains(v, c) {
                label[c] = if rng.gen_bool(0.5) { BONE } else { BACKGROUND };
            }
        }
        let after = classify_voxel(&intensity, &label, v, &window, 1.0);
        assert_eq!(before, after);
    }
}
