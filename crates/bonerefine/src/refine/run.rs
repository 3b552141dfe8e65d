//! Refinement loop: repeat passes until the reclassification count drops
//! below the threshold or the iteration cap is reached.

use crate::error::RefineError;
use crate::volume::{IntensityVolume, LabelVolume};

use super::state::LoopState;
use super::{IterationStats, RefineConfig, RefineResult};

/// Check that the inputs can enter the loop.
pub(crate) fn check_inputs(
    intensity: &IntensityVolume,
    label: &LabelVolume,
) -> Result<(), RefineError> {
    if !intensity.same_dims(label) {
        return Err(RefineError::DimensionMismatch {
            intensity: intensity.dims(),
            label: label.dims(),
        });
    }
    if let Some((coord, value)) = label.find_non_binary() {
        return Err(RefineError::InvalidLabel { coord, value });
    }
    Ok(())
}

#[inline]
fn is_converged(stats: &IterationStats, threshold: usize) -> bool {
    // Zero flips means the next pass would see the same labeling.
    stats.n_reclassified < threshold || stats.n_reclassified == 0
}

pub(crate) fn refine_with_progress<F>(
    intensity: &IntensityVolume,
    seed: LabelVolume,
    config: &RefineConfig,
    mut progress: F,
) -> Result<RefineResult, RefineError>
where
    F: FnMut(&IterationStats),
{
    config.validate()?;
    check_inputs(intensity, &seed)?;

    tracing::debug!(
        dims = %seed.dims(),
        n_bone = seed.count_bone(),
        threshold = config.convergence_threshold,
        window = ?config.window.half_extents,
        n_offsets = config.connectivity.len(),
        "starting boundary refinement",
    );

    let mut state = LoopState::new(seed);
    loop {
        let stats = state.step(intensity, config);
        tracing::info!(
            iteration = stats.iteration,
            n_boundary = stats.n_boundary,
            n_reclassified = stats.n_reclassified,
            "{} voxels in the error class",
            stats.n_reclassified
        );
        progress(&stats);

        if is_converged(&stats, config.convergence_threshold) {
            tracing::info!(
                passes = state.passes(),
                n_bone = stats.n_bone_after,
                "refinement converged"
            );
            return Ok(state.converged());
        }
        if let Some(max) = config.max_iterations {
            if state.passes() >= max {
                tracing::warn!(
                    passes = state.passes(),
                    last_reclassified = stats.n_reclassified,
                    threshold = config.convergence_threshold,
                    "refinement stopped at iteration cap without converging"
                );
                return Ok(state.hit_limit());
            }
        }
    }
}
