//! Chunk - one cubic region of the lattice and its regeneration cycle.
//!
//! ```text
//! regenerate()
//!   1. point kernel   field.sample(origin + (x, y, z) * spacing) → pooled n³ scratch
//!   2. voxel kernel   march every voxel of the scratch      → pooled append buffer
//!   3. read back      count, flatten, recalculate normals   → new ChunkMesh
//!   4. commit         swap scratch into the chunk, replace the mesh
//! ```
//!
//! The cancel flag is checked between steps; a cancelled regeneration leaves
//! the chunk's previous samples and mesh untouched.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::buffers::MarchBuffers;
use crate::config::GridParams;
use crate::density::DensityField;
use crate::dispatch::Dispatch;
use crate::error::ConfigError;
use crate::marcher::march_voxel;
use crate::mesh::build_mesh_into;
use crate::types::ChunkMesh;

// =============================================================================
// ChunkCoord
// =============================================================================

/// Integer chunk coordinate within the lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
  pub x: i32,
  pub y: i32,
  pub z: i32,
}

impl ChunkCoord {
  pub const fn new(x: i32, y: i32, z: i32) -> Self {
    Self { x, y, z }
  }

  #[inline]
  pub fn as_ivec3(self) -> IVec3 {
    IVec3::new(self.x, self.y, self.z)
  }

  /// Display name, `Chunk (x, y, z)`.
  pub fn name(self) -> String {
    format!("Chunk {self}")
  }
}

impl fmt::Display for ChunkCoord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {}, {})", self.x, self.y, self.z)
  }
}

impl From<IVec3> for ChunkCoord {
  fn from(v: IVec3) -> Self {
    Self::new(v.x, v.y, v.z)
  }
}

impl From<[i32; 3]> for ChunkCoord {
  fn from([x, y, z]: [i32; 3]) -> Self {
    Self::new(x, y, z)
  }
}

// =============================================================================
// ChunkId - object identity
// =============================================================================

static CHUNK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique chunk identity.
///
/// A chunk keeps its id for its whole life, so callers can tell a reused
/// chunk from a newly created one at the same coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ChunkId(u64);

impl ChunkId {
  pub fn new() -> Self {
    Self(CHUNK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl Default for ChunkId {
  fn default() -> Self {
    Self::new()
  }
}

// =============================================================================
// Regeneration results
// =============================================================================

/// Counters and timings of one completed regeneration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegenStats {
  /// Triangles read back into the mesh.
  pub triangles: usize,
  /// Triangles lost to buffer overflow.
  pub dropped: usize,
  pub sample_us: u64,
  pub march_us: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RegenOutcome {
  Completed(RegenStats),
  Cancelled,
  /// `params` failed validation; nothing was sampled.
  Rejected(ConfigError),
}

impl RegenOutcome {
  pub fn is_completed(&self) -> bool {
    matches!(self, RegenOutcome::Completed(_))
  }
}

// =============================================================================
// Chunk
// =============================================================================

pub struct Chunk {
  id: ChunkId,
  coord: ChunkCoord,
  centre: Vec3,
  samples: Vec<f32>,
  mesh: ChunkMesh,
  generation: u64,
}

impl Chunk {
  /// Empty chunk at `coord`; samples and mesh are filled by [`regenerate`].
  ///
  /// [`regenerate`]: Self::regenerate
  pub fn new(coord: ChunkCoord, params: &GridParams) -> Self {
    Self {
      id: ChunkId::new(),
      coord,
      centre: params.chunk_centre(coord.as_ivec3()),
      samples: Vec::new(),
      mesh: ChunkMesh::new(),
      generation: 0,
    }
  }

  pub fn id(&self) -> ChunkId {
    self.id
  }

  pub fn coord(&self) -> ChunkCoord {
    self.coord
  }

  pub fn name(&self) -> String {
    self.coord.name()
  }

  /// World-space centre, as of the last placement.
  pub fn centre(&self) -> Vec3 {
    self.centre
  }

  /// Dense `n³` density samples from the last completed regeneration.
  pub fn samples(&self) -> &[f32] {
    &self.samples
  }

  pub fn mesh(&self) -> &ChunkMesh {
    &self.mesh
  }

  /// Number of completed regenerations.
  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// Resample the field and rebuild the mesh.
  ///
  /// Recomputes the centre from `params`, so a chunk survives grid changes.
  /// Parameters that fail [`GridParams::validate`] are rejected up front and
  /// leave the chunk untouched.
  /// Identical inputs produce an identical mesh under a sequential dispatcher,
  /// and the same triangle set under a parallel one.
  #[cfg_attr(
    feature = "instrument",
    tracing::instrument(skip_all, name = "chunk::regenerate", fields(coord = %self.coord))
  )]
  pub fn regenerate<F, D>(
    &mut self,
    params: &GridParams,
    field: &F,
    dispatch: &D,
    buffers: &mut MarchBuffers,
    cancel: &AtomicBool,
  ) -> RegenOutcome
  where
    F: DensityField + ?Sized,
    D: Dispatch,
  {
    if let Err(err) = params.validate() {
      tracing::warn!(coord = %self.coord, %err, "regeneration rejected");
      return RegenOutcome::Rejected(err);
    }

    let n = params.num_points_per_axis;
    let centre = params.chunk_centre(self.coord.as_ivec3());
    let origin = params.chunk_origin(centre);
    let spacing = params.spacing();
    let iso_level = params.iso_level;

    let (points, triangles) = buffers.prepare_pass(n);

    // Stage 1: densities
    let start = Instant::now();
    dispatch.dispatch_points(n, points, |x, y, z| {
      field.sample(origin + Vec3::new(x as f32, y as f32, z as f32) * spacing)
    });
    let sample_us = start.elapsed().as_micros() as u64;

    if cancel.load(Ordering::Acquire) {
      tracing::debug!(coord = %self.coord, "regeneration cancelled after sampling");
      return RegenOutcome::Cancelled;
    }

    // Stage 2: triangles
    let start = Instant::now();
    {
      let samples: &[f32] = points;
      let out = &*triangles;
      dispatch.dispatch_voxels(params.num_voxels_per_axis(), |x, y, z| {
        let tris = march_voxel(samples, n, origin, spacing, iso_level, (x, y, z));
        if !tris.is_empty() {
          out.push_slice(&tris);
        }
      });
    }
    let march_us = start.elapsed().as_micros() as u64;

    let dropped = triangles.dropped();
    if dropped > 0 {
      tracing::warn!(coord = %self.coord, dropped, "triangle buffer overflow");
    }

    if cancel.load(Ordering::Acquire) {
      tracing::debug!(coord = %self.coord, "regeneration cancelled after marching");
      return RegenOutcome::Cancelled;
    }

    // Stage 3: read back into a fresh mesh
    let mut mesh = ChunkMesh::new();
    build_mesh_into(triangles.as_slice(), &mut mesh);
    let stats = RegenStats {
      triangles: mesh.triangle_count(),
      dropped,
      sample_us,
      march_us,
    };

    // Stage 4: commit
    std::mem::swap(&mut self.samples, points);
    self.mesh = mesh;
    self.centre = centre;
    self.generation += 1;

    tracing::debug!(
      coord = %self.coord,
      triangles = stats.triangles,
      sample_us,
      march_us,
      "chunk regenerated"
    );
    RegenOutcome::Completed(stats)
  }
}

impl fmt::Debug for Chunk {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Chunk")
      .field("id", &self.id)
      .field("coord", &self.coord)
      .field("centre", &self.centre)
      .field("triangles", &self.mesh.triangle_count())
      .field("generation", &self.generation)
      .finish()
  }
}

#[cfg(test)]
#[path = "chunk_test.rs"]
mod chunk_test;
