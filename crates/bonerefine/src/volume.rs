//! Dense 3D voxel storage.
//!
//! Volumes are stored flat in x-fastest order: `index = x + y*nx + z*nx*ny`.
//! Indexing with a [`Coord`] is bounds-checked and panics outside the volume;
//! use [`VolumeGrid::get`] to probe coordinates that may be out of range.

use std::ops::{Index, IndexMut};

use crate::neighborhood::Offset;

/// Label value for background voxels.
pub const BACKGROUND: u8 = 0;
/// Label value for bone voxels.
pub const BONE: u8 = 1;

/// Voxel coordinate `[x, y, z]`.
pub type Coord = [usize; 3];

/// Volume dimensions in voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dims {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl Dims {
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Total number of voxels.
    pub const fn voxel_count(self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Number of voxels in one z-slice.
    pub const fn slice_len(self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(self) -> bool {
        self.voxel_count() == 0
    }

    #[inline]
    pub fn contains(self, c: Coord) -> bool {
        c[0] < self.nx && c[1] < self.ny && c[2] < self.nz
    }

    /// Flat index of an in-volume coordinate. Does not check bounds.
    #[inline]
    pub fn linear_index(self, c: Coord) -> usize {
        c[0] + c[1] * self.nx + c[2] * self.nx * self.ny
    }

    /// Coordinate of a flat index.
    #[inline]
    pub fn coord_of(self, idx: usize) -> Coord {
        let x = idx % self.nx;
        let y = (idx / self.nx) % self.ny;
        let z = idx / (self.nx * self.ny);
        [x, y, z]
    }

    /// Displace `c` by `o`, returning `None` when the result leaves the volume.
    #[inline]
    pub fn translate(self, c: Coord, o: Offset) -> Option<Coord> {
        let out = [
            c[0].checked_add_signed(o[0])?,
            c[1].checked_add_signed(o[1])?,
            c[2].checked_add_signed(o[2])?,
        ];
        self.contains(out).then_some(out)
    }
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.nx, self.ny, self.nz)
    }
}

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors from volume construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeError {
    /// One of the dimensions is zero.
    EmptyDimension(Dims),
    /// The sample buffer does not match the dimensions.
    LengthMismatch {
        dims: Dims,
        expected: usize,
        got: usize,
    },
}

impl std::fmt::Display for VolumeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDimension(dims) => write!(f, "volume dimensions {} contain a zero", dims),
            Self::LengthMismatch {
                dims,
                expected,
                got,
            } => write!(
                f,
                "volume {} needs {} samples, got {}",
                dims, expected, got
            ),
        }
    }
}

impl std::error::Error for VolumeError {}

// ── Grid ───────────────────────────────────────────────────────────────────

/// Dense 3D array of samples with dimensions fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeGrid<T> {
    dims: Dims,
    data: Vec<T>,
}

/// Signed CT intensities.
pub type IntensityVolume = VolumeGrid<i16>;
/// Binary bone/background labels (`BONE` / `BACKGROUND`).
pub type LabelVolume = VolumeGrid<u8>;
/// Bone voxels with at least one background neighbor, marked 1.
pub type BoundaryMask = VolumeGrid<u8>;
/// Voxels found to be mislabeled as bone in one pass, marked 1.
pub type ErrorMask = VolumeGrid<u8>;

impl<T: Copy> VolumeGrid<T> {
    /// Volume of `dims` with every voxel set to `value`.
    pub fn filled(dims: Dims, value: T) -> Result<Self, VolumeError> {
        if dims.is_empty() {
            return Err(VolumeError::EmptyDimension(dims));
        }
        Ok(Self {
            dims,
            data: vec![value; dims.voxel_count()],
        })
    }

    /// Wrap a flat x-fastest sample buffer.
    pub fn from_vec(dims: Dims, data: Vec<T>) -> Result<Self, VolumeError> {
        if dims.is_empty() {
            return Err(VolumeError::EmptyDimension(dims));
        }
        if data.len() != dims.voxel_count() {
            return Err(VolumeError::LengthMismatch {
                dims,
                expected: dims.voxel_count(),
                got: data.len(),
            });
        }
        Ok(Self { dims, data })
    }

    /// Build a volume by evaluating `f` at every coordinate.
    pub fn from_fn(dims: Dims, mut f: impl FnMut(Coord) -> T) -> Result<Self, VolumeError> {
        if dims.is_empty() {
            return Err(VolumeError::EmptyDimension(dims));
        }
        let data = (0..dims.voxel_count())
            .map(|idx| f(dims.coord_of(idx)))
            .collect();
        Ok(Self { dims, data })
    }

    /// Volume with the same dimensions as `other`, filled with `value`.
    pub fn filled_like<U>(other: &VolumeGrid<U>, value: T) -> Self {
        Self {
            dims: other.dims,
            data: vec![value; other.data.len()],
        }
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Sample at `c`, or `None` outside the volume.
    #[inline]
    pub fn get(&self, c: Coord) -> Option<T> {
        self.dims
            .contains(c)
            .then(|| self.data[self.dims.linear_index(c)])
    }

    /// Whether both volumes share the same dimensions.
    pub fn same_dims<U>(&self, other: &VolumeGrid<U>) -> bool {
        self.dims == other.dims
    }

    /// Apply `f` to every sample.
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> VolumeGrid<U> {
        VolumeGrid {
            dims: self.dims,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    #[inline]
    fn checked_index(&self, c: Coord) -> usize {
        assert!(
            self.dims.contains(c),
            "voxel {:?} outside volume {}",
            c,
            self.dims
        );
        self.dims.linear_index(c)
    }
}

impl<T: Copy> Index<Coord> for VolumeGrid<T> {
    type Output = T;

    #[inline]
    fn index(&self, c: Coord) -> &T {
        &self.data[self.checked_index(c)]
    }
}

impl<T: Copy> IndexMut<Coord> for VolumeGrid<T> {
    #[inline]
    fn index_mut(&mut self, c: Coord) -> &mut T {
        let idx = self.checked_index(c);
        &mut self.data[idx]
    }
}

impl VolumeGrid<u8> {
    /// Number of voxels with a non-zero value.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Number of voxels labeled [`BONE`].
    pub fn count_bone(&self) -> usize {
        self.data.iter().filter(|&&v| v == BONE).count()
    }

    /// First voxel whose value is neither [`BONE`] nor [`BACKGROUND`].
    pub fn find_non_binary(&self) -> Option<(Coord, u8)> {
        self.data
            .iter()
            .position(|&v| v != BONE && v != BACKGROUND)
            .map(|idx| (self.dims.coord_of(idx), self.data[idx]))
    }

    /// Coordinates of all non-zero voxels, in storage order.
    pub fn nonzero_coords(&self) -> Vec<Coord> {
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0)
            .map(|(idx, _)| self.dims.coord_of(idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_index_is_x_fastest() {
        let dims = Dims::new(4, 3, 2);
        assert_eq!(dims.linear_index([1, 0, 0]), 1);
        assert_eq!(dims.linear_index([0, 1, 0]), 4);
        assert_eq!(dims.linear_index([0, 0, 1]), 12);
        for idx in 0..dims.voxel_count() {
            assert_eq!(dims.linear_index(dims.coord_of(idx)), idx);
        }
    }

    #[test]
    fn translate_clips_at_volume_edges() {
        let dims = Dims::new(3, 3, 3);
        assert_eq!(dims.translate([0, 0, 0], [-1, 0, 0]), None);
        assert_eq!(dims.translate([2, 1, 1], [1, 0, 0]), None);
        assert_eq!(dims.translate([1, 1, 1], [-1, 1, 1]), Some([0, 2, 2]));
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = VolumeGrid::from_vec(Dims::new(2, 2, 2), vec![0u8; 7]).unwrap_err();
        assert_eq!(
            err,
            VolumeError::LengthMismatch {
                dims: Dims::new(2, 2, 2),
                expected: 8,
                got: 7
            }
        );
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let err = VolumeGrid::filled(Dims::new(4, 0, 2), 0i16).unwrap_err();
        assert!(matches!(err, VolumeError::EmptyDimension(_)));
    }

    #[test]
    fn get_returns_none_outside() {
        let v = VolumeGrid::from_fn(Dims::new(2, 2, 1), |c| (c[0] + 2 * c[1]) as i16).unwrap();
        assert_eq!(v.get([1, 1, 0]), Some(3));
        assert_eq!(v.get([2, 0, 0]), None);
        assert_eq!(v[[0, 1, 0]], 2);
    }

    #[test]
    #[should_panic(expected = "outside volume")]
    fn out_of_range_index_panics() {
        let v = VolumeGrid::filled(Dims::new(2, 2, 2), 0u8).unwrap();
        let _ = v[[0, 0, 2]];
    }

    #[test]
    fn label_helpers() {
        let mut labels = LabelVolume::filled(Dims::new(3, 1, 1), BONE).unwrap();
        labels[[1, 0, 0]] = BACKGROUND;
        assert_eq!(labels.count_bone(), 2);
        assert_eq!(labels.find_non_binary(), None);
        labels[[2, 0, 0]] = 7;
        assert_eq!(labels.find_non_binary(), Some(([2, 0, 0], 7)));
        assert_eq!(labels.nonzero_coords(), vec![[0, 0, 0], [2, 0, 0]]);
    }
}
