use serde::{Deserialize, Serialize};

use crate::volume::LabelVolume;

/// Diagnostics for one detect → classify → relabel pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationStats {
    /// 1-based pass number.
    pub iteration: usize,
    /// Boundary voxels evaluated in this pass.
    pub n_boundary: usize,
    /// Voxels flipped from bone to background.
    pub n_reclassified: usize,
    /// Boundary voxels kept because their window was degenerate.
    pub n_degenerate: usize,
    /// Bone voxels before the pass.
    pub n_bone_before: usize,
    /// Bone voxels after the pass.
    pub n_bone_after: usize,
}

/// Terminal state of the refinement loop, carrying the final labeling.
#[derive(Debug, Clone, PartialEq)]
pub enum RefineOutcome {
    /// A pass reclassified fewer voxels than the threshold, or none at all.
    Converged(LabelVolume),
    /// The iteration cap was hit first.
    IterationLimitReached(LabelVolume),
}

impl RefineOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }

    pub fn label(&self) -> &LabelVolume {
        match self {
            Self::Converged(label) | Self::IterationLimitReached(label) => label,
        }
    }

    pub fn into_label(self) -> LabelVolume {
        match self {
            Self::Converged(label) | Self::IterationLimitReached(label) => label,
        }
    }
}

/// Refinement output: terminal outcome plus per-pass diagnostics.
#[derive(Debug, Clone)]
pub struct RefineResult {
    pub outcome: RefineOutcome,
    /// One entry per pass, in order.
    pub history: Vec<IterationStats>,
}

impl RefineResult {
    pub fn is_converged(&self) -> bool {
        self.outcome.is_converged()
    }

    pub fn label(&self) -> &LabelVolume {
        self.outcome.label()
    }

    pub fn into_label(self) -> LabelVolume {
        self.outcome.into_label()
    }

    /// Number of passes run.
    pub fn n_passes(&self) -> usize {
        self.history.len()
    }

    /// Voxels reclassified over all passes.
    pub fn total_reclassified(&self) -> usize {
        self.history.iter().map(|s| s.n_reclassified).sum()
    }

    pub fn last_pass(&self) -> Option<&IterationStats> {
        self.history.last()
    }
}
