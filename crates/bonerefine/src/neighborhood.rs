//! Named voxel-offset sets.
//!
//! [`BoundaryConnectivity`] decides which neighbors make a bone voxel a
//! boundary voxel. [`StatisticsWindow`] is the box used to gather per-class
//! intensity samples around a boundary voxel.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::volume::{Coord, Dims};

/// Integer voxel displacement `[dx, dy, dz]`.
pub type Offset = [isize; 3];

/// Neighbor offsets used for boundary detection.
///
/// The default is the 10-neighborhood: the 8 in-plane neighbors sharing the
/// same depth plus the two axial neighbors at depth ±1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundaryConnectivity {
    offsets: Vec<Offset>,
}

impl BoundaryConnectivity {
    pub fn new(offsets: Vec<Offset>) -> Self {
        Self { offsets }
    }

    /// 8 in-plane neighbors plus the 2 axial neighbors.
    pub fn planar8_axial2() -> Self {
        let mut offsets = Vec::with_capacity(10);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx != 0 || dy != 0 {
                    offsets.push([dx, dy, 0]);
                }
            }
        }
        offsets.push([0, 0, -1]);
        offsets.push([0, 0, 1]);
        Self { offsets }
    }

    /// Face neighbors only.
    pub fn face6() -> Self {
        Self {
            offsets: vec![
                [-1, 0, 0],
                [1, 0, 0],
                [0, -1, 0],
                [0, 1, 0],
                [0, 0, -1],
                [0, 0, 1],
            ],
        }
    }

    /// Full 3x3x3 neighborhood without the center.
    pub fn full26() -> Self {
        let mut offsets = Vec::with_capacity(26);
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if dx != 0 || dy != 0 || dz != 0 {
                        offsets.push([dx, dy, dz]);
                    }
                }
            }
        }
        Self { offsets }
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.offsets.is_empty() {
            return Err("boundary connectivity has no offsets".into());
        }
        if self.offsets.iter().any(|o| *o == [0, 0, 0]) {
            return Err("boundary connectivity contains the zero offset".into());
        }
        Ok(())
    }
}

impl Default for BoundaryConnectivity {
    fn default() -> Self {
        Self::planar8_axial2()
    }
}

/// Axis-aligned box of voxels around a center, clipped at volume edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsWindow {
    /// Half-extents `[rx, ry, rz]`; the full box spans `2r + 1` voxels per axis.
    pub half_extents: [usize; 3],
}

impl StatisticsWindow {
    pub const fn new(rx: usize, ry: usize, rz: usize) -> Self {
        Self {
            half_extents: [rx, ry, rz],
        }
    }

    /// Voxel count of an unclipped window, saturating at `usize::MAX`.
    pub fn full_size(&self) -> usize {
        self.half_extents
            .iter()
            .map(|r| r.saturating_mul(2).saturating_add(1))
            .fold(1usize, usize::saturating_mul)
    }

    /// Reject half-extents whose offsets cannot be represented as [`Offset`].
    pub(crate) fn validate(&self) -> Result<(), String> {
        if let Some(r) = self.half_extents.iter().find(|&&r| r > isize::MAX as usize) {
            return Err(format!("window half-extent {} does not fit an offset", r));
        }
        Ok(())
    }

    /// Per-axis index ranges of the window around `center`, clipped to `dims`.
    pub fn clipped_ranges(&self, dims: Dims, center: Coord) -> [Range<usize>; 3] {
        let extent = [dims.nx, dims.ny, dims.nz];
        std::array::from_fn(|axis| {
            let r = self.half_extents[axis];
            let lo = center[axis].saturating_sub(r);
            let hi = center[axis].saturating_add(r).saturating_add(1).min(extent[axis]);
            lo..hi
        })
    }

    /// Whether `c` lies in the (unclipped) window around `center`.
    pub fn contains(&self, center: Coord, c: Coord) -> bool {
        (0..3).all(|axis| center[axis].abs_diff(c[axis]) <= self.half_extents[axis])
    }

    /// In-volume voxels of the window around `center`, x fastest.
    pub fn voxels(&self, dims: Dims, center: Coord) -> impl Iterator<Item = Coord> {
        let [xr, yr, zr] = self.clipped_ranges(dims, center);
        zr.flat_map(move |z| {
            let xr = xr.clone();
            yr.clone()
                .flat_map(move |y| xr.clone().map(move |x| [x, y, z]))
        })
    }

    /// All offsets of the unclipped window, center included.
    pub fn offsets(&self) -> Vec<Offset> {
        let [rx, ry, rz] = self.half_extents.map(|r| r as isize);
        let mut out = Vec::with_capacity(self.full_size());
        for dz in -rz..=rz {
            for dy in -ry..=ry {
                for dx in -rx..=rx {
                    out.push([dx, dy, dz]);
                }
            }
        }
        out
    }
}

impl Default for StatisticsWindow {
    fn default() -> Self {
        Self::new(7, 7, 1)
    }
}
