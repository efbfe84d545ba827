//! Per-voxel Marching Cubes triangulation.
//!
//! ```text
//! corner densities ──► configuration index ──► TRIANGULATION row
//!                         (bit i = d[i] < iso)        │
//!                                                     ▼
//!                 edge e ──► corners (A, B) ──► interpolate ──► Triangle
//! ```
//!
//! Each voxel is processed in isolation. Vertices on an edge shared by
//! neighbouring voxels (or neighbouring chunks) are computed from the same two
//! samples in the same order and therefore come out bit-identical.

use glam::Vec3;
use smallvec::SmallVec;

use crate::constants::{voxel_corner_indices, CORNER_OFFSETS, MAX_TRIANGLES_PER_VOXEL};
use crate::triangulation_table::{
  CORNER_INDEX_A_FROM_EDGE, CORNER_INDEX_B_FROM_EDGE, END, TRIANGULATION,
};
use crate::types::Triangle;

/// Triangles emitted by one voxel. Never spills: the table caps a voxel at
/// [`MAX_TRIANGLES_PER_VOXEL`].
pub type VoxelTriangles = SmallVec<[Triangle; MAX_TRIANGLES_PER_VOXEL]>;

/// 8-bit configuration code: bit `i` is set iff `densities[i] < iso_level`.
#[inline]
pub fn configuration_index(densities: &[f32; 8], iso_level: f32) -> u8 {
  let mut config = 0u8;
  for (i, &d) in densities.iter().enumerate() {
    if d < iso_level {
      config |= 1 << i;
    }
  }
  config
}

/// Crossing point of the isosurface on the edge `pa → pb`.
///
/// `t = (iso - da) / (db - da)`, `p = pa + t (pb - pa)`. `t` is not clamped.
/// Endpoints are ordered lexicographically by position before evaluating, so
/// the same edge seen from either side yields the same bits.
#[inline]
pub fn interpolate(iso_level: f32, pa: Vec3, da: f32, pb: Vec3, db: f32) -> Vec3 {
  let (pa, da, pb, db) = if lex_less(pb, pa) {
    (pb, db, pa, da)
  } else {
    (pa, da, pb, db)
  };
  let t = (iso_level - da) / (db - da);
  pa + t * (pb - pa)
}

#[inline]
fn lex_less(a: Vec3, b: Vec3) -> bool {
  (a.x, a.y, a.z) < (b.x, b.y, b.z)
}

/// Triangulate one voxel from its corner densities and positions, both in
/// corner order.
///
/// Configurations `0` and `255` emit nothing.
#[inline]
pub fn triangulate(
  densities: &[f32; 8],
  positions: &[Vec3; 8],
  iso_level: f32,
) -> VoxelTriangles {
  let mut out = VoxelTriangles::new();
  triangulate_with(densities, positions, iso_level, |tri| out.push(tri));
  out
}

/// [`triangulate`], appending into an existing buffer.
#[inline]
pub fn triangulate_into(
  densities: &[f32; 8],
  positions: &[Vec3; 8],
  iso_level: f32,
  out: &mut Vec<Triangle>,
) {
  triangulate_with(densities, positions, iso_level, |tri| out.push(tri));
}

#[inline(always)]
fn triangulate_with(
  densities: &[f32; 8],
  positions: &[Vec3; 8],
  iso_level: f32,
  mut emit: impl FnMut(Triangle),
) {
  let config = configuration_index(densities, iso_level);
  let row = &TRIANGULATION[config as usize];

  let vertex = |edge: i8| {
    let a = CORNER_INDEX_A_FROM_EDGE[edge as usize] as usize;
    let b = CORNER_INDEX_B_FROM_EDGE[edge as usize] as usize;
    interpolate(iso_level, positions[a], densities[a], positions[b], densities[b])
  };

  for tri in row.chunks_exact(3) {
    if tri[0] == END {
      break;
    }
    emit(Triangle::new(vertex(tri[0]), vertex(tri[1]), vertex(tri[2])));
  }
}

/// Triangulate voxel `(x, y, z)` of a dense sample volume.
///
/// `samples` uses the `x * n² + y * n + z` layout; `origin` is the world
/// position of sample `(0, 0, 0)` and `spacing` the distance between samples.
#[inline]
pub fn march_voxel(
  samples: &[f32],
  n: usize,
  origin: Vec3,
  spacing: f32,
  iso_level: f32,
  voxel: (usize, usize, usize),
) -> VoxelTriangles {
  let (densities, positions) = gather_corners(samples, n, origin, spacing, voxel);
  triangulate(&densities, &positions, iso_level)
}

/// Corner densities and world positions of voxel `(x, y, z)`, in corner order.
#[inline]
pub fn gather_corners(
  samples: &[f32],
  n: usize,
  origin: Vec3,
  spacing: f32,
  (x, y, z): (usize, usize, usize),
) -> ([f32; 8], [Vec3; 8]) {
  let indices = voxel_corner_indices(x, y, z, n);
  let mut densities = [0.0f32; 8];
  let mut positions = [Vec3::ZERO; 8];
  for i in 0..8 {
    let o = CORNER_OFFSETS[i];
    densities[i] = samples[indices[i]];
    positions[i] = origin
      + Vec3::new(
        (x + o[0]) as f32,
        (y + o[1]) as f32,
        (z + o[2]) as f32,
      ) * spacing;
  }
  (densities, positions)
}

#[cfg(test)]
#[path = "marcher_test.rs"]
mod marcher_test;
