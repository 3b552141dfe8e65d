//! Threshold seed labeling.
//!
//! Produces a raw bone/background labeling by intensity thresholding. Callers
//! that need the usual cleanup (keeping only the largest background
//! component, hole filling) apply it before handing the seed to refinement.

use crate::volume::{IntensityVolume, LabelVolume, BACKGROUND, BONE};

/// Intensity above which a voxel is seeded as bone.
pub const DEFAULT_SEED_THRESHOLD: i16 = 70;

/// Label voxels with intensity strictly above `threshold` as bone.
pub fn threshold_seed(intensity: &IntensityVolume, threshold: i16) -> LabelVolume {
    intensity.map(|v| if v > threshold { BONE } else { BACKGROUND })
}
