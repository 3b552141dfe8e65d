//! One detect → classify → relabel pass.
//!
//! Every boundary voxel is classified against the same read-only
//! (intensity, label) pair; flips are collected in an error mask and applied
//! only after all voxels of the pass have been evaluated.

use rayon::prelude::*;

use crate::boundary::detect_boundary_with;
use crate::classify::{classify_voxel, Classification};
use crate::volume::{ErrorMask, IntensityVolume, LabelVolume, BACKGROUND};

use super::{IterationStats, RefineConfig};

/// Result of a single refinement pass.
#[derive(Debug, Clone)]
pub struct PassOutcome {
    /// Labeling after the pass.
    pub label: LabelVolume,
    /// Voxels flipped by the pass, marked 1.
    pub error_mask: ErrorMask,
    pub stats: IterationStats,
}

pub(crate) fn run_pass(
    intensity: &IntensityVolume,
    label: &LabelVolume,
    config: &RefineConfig,
    iteration: usize,
) -> PassOutcome {
    let dims = label.dims();
    let boundary = detect_boundary_with(label, &config.connectivity, config.parallel);
    let boundary_idx: Vec<usize> = boundary
        .as_slice()
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b != 0)
        .map(|(idx, _)| idx)
        .collect();
    tracing::debug!(iteration, n_boundary = boundary_idx.len(), "boundary voxels detected");

    let classify = |&idx: &usize| -> Classification {
        classify_voxel(
            intensity,
            label,
            dims.coord_of(idx),
            &config.window,
            config.variance_floor,
        )
    };
    let verdicts: Vec<Classification> = if config.parallel {
        boundary_idx.par_iter().map(classify).collect()
    } else {
        boundary_idx.iter().map(classify).collect()
    };

    let mut error_mask = ErrorMask::filled_like(label, BACKGROUND);
    let mut n_reclassified = 0usize;
    let mut n_degenerate = 0usize;
    {
        let errors = error_mask.as_mut_slice();
        for (&idx, verdict) in boundary_idx.iter().zip(&verdicts) {
            if verdict.degeneracy.is_some() {
                n_degenerate += 1;
            }
            if verdict.is_reclassified() {
                errors[idx] = 1;
                n_reclassified += 1;
            }
        }
    }
    if n_degenerate > 0 {
        tracing::debug!(iteration, n_degenerate, "degenerate windows kept");
    }

    let n_bone_before = label.count_bone();
    let next = apply_error_mask(label, &error_mask);
    let stats = IterationStats {
        iteration,
        n_boundary: boundary_idx.len(),
        n_reclassified,
        n_degenerate,
        n_bone_before,
        n_bone_after: n_bone_before - n_reclassified,
    };

    PassOutcome {
        label: next,
        error_mask,
        stats,
    }
}

/// Copy of `label` with every voxel marked in `errors` set to background.
///
/// # Panics
/// If the two volumes differ in size.
pub fn apply_error_mask(label: &LabelVolume, errors: &ErrorMask) -> LabelVolume {
    assert!(
        label.same_dims(errors),
        "error mask {} does not match label volume {}",
        errors.dims(),
        label.dims()
    );
    let mut next = label.clone();
    for (l, &e) in next.as_mut_slice().iter_mut().zip(errors.as_slice()) {
        if e != 0 {
            *l = BACKGROUND;
        }
    }
    next
}
