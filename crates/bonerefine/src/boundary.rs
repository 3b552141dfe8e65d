//! Boundary voxel detection.
//!
//! A voxel is a boundary voxel when it is labeled bone and at least one of
//! its in-volume neighbors under the configured connectivity is not bone.
//! Neighbors that fall outside the volume are ignored.

use rayon::prelude::*;

use crate::neighborhood::BoundaryConnectivity;
use crate::volume::{BoundaryMask, Coord, LabelVolume, BACKGROUND, BONE};

/// Whether `v` is a boundary voxel of `label`.
#[inline]
pub fn is_boundary_voxel(
    label: &LabelVolume,
    v: Coord,
    connectivity: &BoundaryConnectivity,
) -> bool {
    if label[v] != BONE {
        return false;
    }
    let dims = label.dims();
    for &o in connectivity.offsets() {
        let Some(n) = dims.translate(v, o) else {
            continue;
        };
        if label[n] != BONE {
            return true;
        }
    }
    false
}

/// Mark every boundary voxel of `label` with 1.
pub fn detect_boundary(label: &LabelVolume, connectivity: &BoundaryConnectivity) -> BoundaryMask {
    detect_boundary_with(label, connectivity, false)
}

/// Boundary detection, optionally split across z-slices on the rayon pool.
pub(crate) fn detect_boundary_with(
    label: &LabelVolume,
    connectivity: &BoundaryConnectivity,
    parallel: bool,
) -> BoundaryMask {
    let dims = label.dims();
    let mut mask = BoundaryMask::filled_like(label, BACKGROUND);
    let fill_slice = |(z, slice): (usize, &mut [u8])| {
        for y in 0..dims.ny {
            for x in 0..dims.nx {
                if is_boundary_voxel(label, [x, y, z], connectivity) {
                    slice[x + y * dims.nx] = 1;
                }
            }
        }
    };
    if parallel {
        mask.as_mut_slice()
            .par_chunks_mut(dims.slice_len())
            .enumerate()
            .for_each(fill_slice);
    } else {
        mask.as_mut_slice()
            .chunks_mut(dims.slice_len())
            .enumerate()
            .for_each(fill_slice);
    }
    mask
}
