use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RefineError;
use crate::neighborhood::{BoundaryConnectivity, StatisticsWindow};

/// Default reclassification count below which refinement stops.
pub const DEFAULT_CONVERGENCE_THRESHOLD: usize = 500;

/// Configuration for iterative boundary refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Refinement stops once a pass reclassifies fewer voxels than this.
    ///
    /// A pass that reclassifies nothing also stops refinement, so `0` runs
    /// until the labeling no longer changes.
    pub convergence_threshold: usize,
    /// Box used to gather class statistics around each boundary voxel.
    pub window: StatisticsWindow,
    /// Neighbor offsets deciding which bone voxels are boundary voxels.
    pub connectivity: BoundaryConnectivity,
    /// Maximum number of passes; `None` removes the cap.
    pub max_iterations: Option<usize>,
    /// Lower clamp for class variances (squared intensity units).
    pub variance_floor: f64,
    /// Run boundary detection and classification on the rayon pool.
    pub parallel: bool,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            window: StatisticsWindow::default(),
            connectivity: BoundaryConnectivity::default(),
            max_iterations: Some(1000),
            variance_floor: 1.0,
            parallel: true,
        }
    }
}

impl RefineConfig {
    /// Default configuration with a custom convergence threshold.
    pub fn with_threshold(convergence_threshold: usize) -> Self {
        Self {
            convergence_threshold,
            ..Self::default()
        }
    }

    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Reject configurations the refinement loop cannot run with.
    pub fn validate(&self) -> Result<(), RefineError> {
        self.connectivity
            .validate()
            .map_err(RefineError::InvalidConfig)?;
        self.window.validate().map_err(RefineError::InvalidConfig)?;
        if !(self.variance_floor.is_finite() && self.variance_floor > 0.0) {
            return Err(RefineError::InvalidConfig(format!(
                "variance_floor must be positive and finite, got {}",
                self.variance_floor
            )));
        }
        if self.max_iterations == Some(0) {
            return Err(RefineError::InvalidConfig(
                "max_iterations must allow at least one pass".into(),
            ));
        }
        Ok(())
    }
}
