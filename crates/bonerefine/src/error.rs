use crate::volume::{Coord, Dims};

// ── Error type ─────────────────────────────────────────────────────────────

/// Precondition violations rejected before the first refinement pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefineError {
    /// Intensity and label volumes differ in size.
    DimensionMismatch { intensity: Dims, label: Dims },
    /// A label voxel holds a value other than 0 or 1.
    InvalidLabel { coord: Coord, value: u8 },
    /// The refinement configuration is unusable.
    InvalidConfig(String),
}

impl std::fmt::Display for RefineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionMismatch { intensity, label } => write!(
                f,
                "intensity volume is {} but label volume is {}",
                intensity, label
            ),
            Self::InvalidLabel { coord, value } => write!(
                f,
                "label volume holds value {} at {:?} (expected 0 or 1)",
                value, coord
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid refine config: {}", msg),
        }
    }
}

impl std::error::Error for RefineError {}
