//! Shared synthetic volumes for unit tests.

use rand::prelude::*;

use crate::neighborhood::BoundaryConnectivity;
use crate::volume::{Dims, IntensityVolume, LabelVolume, BACKGROUND, BONE};

pub(crate) const BONE_LEVEL: i16 = 1000;
pub(crate) const BACKGROUND_LEVEL: i16 = 0;
pub(crate) const NOISE: i16 = 20;

/// Cylinder phantom: a disk of `radius` voxels centered in every z-slice.
///
/// Returns the noisy intensity volume (bone around `BONE_LEVEL`, background
/// around `BACKGROUND_LEVEL`, uniform noise of ±`NOISE`) and the true labels.
pub(crate) fn disk_phantom(dims: Dims, radius: f64, seed: u64) -> (IntensityVolume, LabelVolume) {
    let cx = (dims.nx / 2) as f64;
    let cy = (dims.ny / 2) as f64;
    let truth = LabelVolume::from_fn(dims, |c| {
        let dx = c[0] as f64 - cx;
        let dy = c[1] as f64 - cy;
        if dx * dx + dy * dy <= radius * radius {
            BONE
        } else {
            BACKGROUND
        }
    })
    .expect("non-empty phantom dims");

    let mut rng = StdRng::seed_from_u64(seed);
    let intensity = IntensityVolume::from_fn(dims, |c| {
        let level = if truth[c] == BONE {
            BONE_LEVEL
        } else {
            BACKGROUND_LEVEL
        };
        level + rng.gen_range(-NOISE..=NOISE)
    })
    .expect("non-empty phantom dims");

    (intensity, truth)
}

/// Binary dilation of the bone label by `steps` applications of `connectivity`.
pub(crate) fn dilate(
    label: &LabelVolume,
    connectivity: &BoundaryConnectivity,
    steps: usize,
) -> LabelVolume {
    let dims = label.dims();
    let mut current = label.clone();
    for _ in 0..steps {
        let prev = current.clone();
        for idx in 0..dims.voxel_count() {
            let c = dims.coord_of(idx);
            if prev[c] == BONE {
                continue;
            }
            let touches_bone = connectivity
                .offsets()
                .iter()
                .filter_map(|&o| dims.translate(c, o))
                .any(|n| prev[n] == BONE);
            if touches_bone {
                current[c] = BONE;
            }
        }
    }
    current
}
