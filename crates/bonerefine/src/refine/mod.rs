//! Iterative boundary refinement.
//!
//! Each pass runs boundary detection on the current labeling, classifies
//! every boundary voxel from its local window statistics, and flips the
//! voxels found to resemble background. Passes repeat until one flips fewer
//! voxels than [`RefineConfig::convergence_threshold`] (or none), or until
//! [`RefineConfig::max_iterations`] passes have run.
//!
//! Bone voxels only ever become background; a refined labeling is always a
//! subset of its seed.

mod config;
mod pass;
mod result;
mod run;
mod state;

pub use config::{RefineConfig, DEFAULT_CONVERGENCE_THRESHOLD};
pub use pass::{apply_error_mask, PassOutcome};
pub use result::{IterationStats, RefineOutcome, RefineResult};

pub(crate) use pass::run_pass;
pub(crate) use run::{check_inputs, refine_with_progress};

use crate::error::RefineError;
use crate::volume::{IntensityVolume, LabelVolume};

/// Refine `seed` against `intensity` until convergence or the iteration cap.
pub fn refine(
    intensity: &IntensityVolume,
    seed: LabelVolume,
    config: &RefineConfig,
) -> Result<RefineResult, RefineError> {
    refine_with_progress(intensity, seed, config, |_| {})
}
