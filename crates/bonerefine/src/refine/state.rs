use crate::volume::{IntensityVolume, LabelVolume};

use super::pass::run_pass;
use super::{IterationStats, RefineConfig, RefineOutcome, RefineResult};

/// Explicit refinement loop state, threaded through each pass.
#[derive(Debug, Clone)]
pub(crate) struct LoopState {
    /// Number of the next pass (1-based).
    pub(crate) iteration: usize,
    pub(crate) label: LabelVolume,
    pub(crate) history: Vec<IterationStats>,
}

impl LoopState {
    pub(crate) fn new(seed: LabelVolume) -> Self {
        Self {
            iteration: 1,
            label: seed,
            history: Vec::new(),
        }
    }

    /// Run one pass and commit its labeling.
    pub(crate) fn step(
        &mut self,
        intensity: &IntensityVolume,
        config: &RefineConfig,
    ) -> IterationStats {
        let outcome = run_pass(intensity, &self.label, config, self.iteration);
        self.label = outcome.label;
        self.iteration += 1;
        self.history.push(outcome.stats);
        outcome.stats
    }

    pub(crate) fn passes(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn converged(self) -> RefineResult {
        RefineResult {
            outcome: RefineOutcome::Converged(self.label),
            history: self.history,
        }
    }

    pub(crate) fn hit_limit(self) -> RefineResult {
        RefineResult {
            outcome: RefineOutcome::IterationLimitReached(self.label),
            history: self.history,
        }
    }
}
