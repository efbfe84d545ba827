//! Sample volume layout and cube corner constants.
//!
//! A chunk stores `n³` density samples where `n = num_points_per_axis`. The
//! samples form `(n - 1)³` voxels; voxel `(x, y, z)` is the cube whose lowest
//! corner is sample `(x, y, z)`.
//!
//! # Memory Layout
//!
//! ```text
//! Volume memory layout (row-major, Z innermost):
//!
//! Address:  0      1     ...  n-1      n     ...  n²-1      n²   ...
//! Content: [0,0,0][0,0,1]...[0,0,n-1][0,1,0]...[0,n-1,n-1][1,0,0]...
//!          └────────── Z ──────────┘└──────── Z ─────────┘
//!
//! index = x * n² + y * n + z
//! ```
//!
//! # Corner Ordering
//!
//! ```text
//!         7──────6        Corners (x, y, z):
//!        /│     /│          0=(0,0,0)  1=(1,0,0)  2=(1,0,1)  3=(0,0,1)
//!       4─┼────5 │          4=(0,1,0)  5=(1,1,0)  6=(1,1,1)  7=(0,1,1)
//!       │ 3────┼─2
//!       │/     │/         +Y
//!       0──────1           │  +Z
//!                          │ /
//!                          └───+X
//! ```
//!
//! Corners 0-3 walk the bottom face (y = 0), corners 4-7 walk the top face in
//! the same order. The triangulation table is indexed against this ordering.

/// Smallest legal point count per axis (one voxel).
pub const MIN_POINTS_PER_AXIS: usize = 2;

/// Largest legal point count per axis.
pub const MAX_POINTS_PER_AXIS: usize = 100;

/// Upper bound on triangles emitted by any single voxel configuration.
pub const MAX_TRIANGLES_PER_VOXEL: usize = 5;

/// Unit-cube offsets of the 8 voxel corners, in table order.
pub const CORNER_OFFSETS: [[usize; 3]; 8] = [
  [0, 0, 0], // 0
  [1, 0, 0], // 1
  [1, 0, 1], // 2
  [0, 0, 1], // 3
  [0, 1, 0], // 4
  [1, 1, 0], // 5
  [1, 1, 1], // 6
  [0, 1, 1], // 7
];

/// Linear index of sample `(x, y, z)` in a volume with `n` points per axis.
#[inline(always)]
pub const fn point_index(x: usize, y: usize, z: usize, n: usize) -> usize {
  x * n * n + y * n + z
}

/// Inverse of [`point_index`].
#[inline(always)]
pub const fn index_to_point(idx: usize, n: usize) -> (usize, usize, usize) {
  let x = idx / (n * n);
  let y = (idx / n) % n;
  let z = idx % n;
  (x, y, z)
}

/// Linear sample indices of the 8 corners of voxel `(x, y, z)`.
#[inline]
pub const fn voxel_corner_indices(x: usize, y: usize, z: usize, n: usize) -> [usize; 8] {
  let mut out = [0usize; 8];
  let mut i = 0;
  while i < 8 {
    let o = CORNER_OFFSETS[i];
    out[i] = point_index(x + o[0], y + o[1], z + o[2], n);
    i += 1;
  }
  out
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
