//! bonerefine: iterative local-statistics refinement of CT bone segmentations.
//!
//! Starting from a binary bone/background seed labeling of a 3D CT scan, the
//! refinement repeatedly corrects bone voxels on the segmentation boundary
//! that statistically resemble background. The stages of one pass are:
//!
//! 1. **Boundary** – flag bone voxels with a background neighbor under a
//!    configurable connectivity (default: 8 in-plane + 2 axial neighbors).
//! 2. **Classify** – for each boundary voxel, fit a Gaussian per class to the
//!    intensities in a local box window (default 15×15×3) and compare the
//!    prior-weighted densities at the voxel's own intensity.
//! 3. **Relabel** – flip every voxel that looks like background, all at once.
//!
//! Passes repeat until one flips fewer voxels than the convergence threshold.
//!
//! # Public API
//! - [`Refiner`] and [`RefineConfig`] as primary entry points
//! - [`VolumeGrid`] storage with the [`IntensityVolume`] / [`LabelVolume`]
//!   aliases
//! - the per-stage functions [`detect_boundary`] and [`classify_voxel`]

mod api;
mod boundary;
mod classify;
mod error;
mod neighborhood;
mod refine;
mod seed;
#[cfg(test)]
mod test_utils;
mod volume;

pub use api::Refiner;
pub use boundary::{detect_boundary, is_boundary_voxel};
pub use classify::{
    classify_voxel, ClassStats, Classification, Decision, Degeneracy, PosteriorScores,
};
pub use error::RefineError;
pub use neighborhood::{BoundaryConnectivity, Offset, StatisticsWindow};
pub use refine::{
    apply_error_mask, refine, IterationStats, PassOutcome, RefineConfig, RefineOutcome,
    RefineResult, DEFAULT_CONVERGENCE_THRESHOLD,
};
pub use seed::{threshold_seed, DEFAULT_SEED_THRESHOLD};
pub use volume::{
    BoundaryMask, Coord, Dims, ErrorMask, IntensityVolume, LabelVolume, VolumeError, VolumeGrid,
    BACKGROUND, BONE,
};
