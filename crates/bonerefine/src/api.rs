//! High-level refinement API.
//!
//! [`Refiner`] is the primary entry point. It wraps a [`RefineConfig`] and
//! runs the full loop, a loop with progress reporting, or a single pass.

use std::path::Path;

use crate::error::RefineError;
use crate::refine::{
    check_inputs, refine_with_progress, run_pass, IterationStats, PassOutcome, RefineConfig,
    RefineResult,
};
use crate::volume::{IntensityVolume, LabelVolume};

/// Primary refinement interface.
///
/// Create once, refine many scans.
///
/// # Examples
///
/// ```
/// use bonerefine::{threshold_seed, Dims, IntensityVolume, Refiner};
///
/// let intensity = IntensityVolume::from_fn(Dims::new(16, 16, 3), |c| {
///     if c[0] < 8 { 900 } else { 10 }
/// })
/// .unwrap();
/// let seed = threshold_seed(&intensity, 70);
/// let result = Refiner::new().refine(&intensity, seed).unwrap();
/// assert!(result.is_converged());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Refiner {
    config: RefineConfig,
}

impl Refiner {
    /// Refiner with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: RefineConfig) -> Self {
        Self { config }
    }

    /// Load a JSON configuration and create a refiner in one step.
    pub fn from_config_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_config(RefineConfig::from_json_file(path)?))
    }

    /// Access the current configuration.
    pub fn config(&self) -> &RefineConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut RefineConfig {
        &mut self.config
    }

    /// Refine `seed` until convergence or the iteration cap.
    pub fn refine(
        &self,
        intensity: &IntensityVolume,
        seed: LabelVolume,
    ) -> Result<RefineResult, RefineError> {
        refine_with_progress(intensity, seed, &self.config, |_| {})
    }

    /// Refine and call `progress` after every pass.
    pub fn refine_with_progress<F>(
        &self,
        intensity: &IntensityVolume,
        seed: LabelVolume,
        progress: F,
    ) -> Result<RefineResult, RefineError>
    where
        F: FnMut(&IterationStats),
    {
        refine_with_progress(intensity, seed, &self.config, progress)
    }

    /// Run a single detect → classify → relabel pass on `label`.
    ///
    /// The pass is numbered 1 in the returned statistics.
    pub fn run_pass(
        &self,
        intensity: &IntensityVolume,
        label: &LabelVolume,
    ) -> Result<PassOutcome, RefineError> {
        self.config.validate()?;
        check_inputs(intensity, label)?;
        Ok(run_pass(intensity, label, &self.config, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::BoundaryConnectivity;
    use crate::test_utils::{dilate, disk_phantom};
    use crate::volume::Dims;

    #[test]
    fn refiner_config_mut() {
        let mut refiner = Refiner::new();
        refiner.config_mut().convergence_threshold = 3;
        refiner.config_mut().parallel = false;
        assert_eq!(refiner.config().convergence_threshold, 3);
        assert!(!refiner.config().parallel);
    }

    #[test]
    fn converged_labeling_is_stable_under_one_more_pass() {
        let (intensity, truth) = disk_phantom(Dims::new(30, 30, 5), 6.5, 9);
        let seed = dilate(&truth, &BoundaryConnectivity::default(), 2);
        let refiner = Refiner::with_config(RefineConfig::with_threshold(5));

        let result = refiner.refine(&intensity, seed).unwrap();
        assert!(result.is_converged());
        let extra = refiner.run_pass(&intensity, result.label()).unwrap();
        assert!(extra.stats.n_reclassified < refiner.config().convergence_threshold);
        assert_eq!(extra.stats.iteration, 1);
    }

    #[test]
    fn run_pass_checks_preconditions() {
        let intensity = IntensityVolume::filled(Dims::new(3, 3, 3), 0).unwrap();
        let label = LabelVolume::filled(Dims::new(3, 3, 2), 1).unwrap();
        assert!(matches!(
            Refiner::new().run_pass(&intensity, &label),
            Err(RefineError::DimensionMismatch { .. })
        ));
    }
}
