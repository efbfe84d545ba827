//! Shared fixtures for unit tests.
//!
//! Provides fixture fields, a recording presentation layer and mesh
//! comparison helpers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use glam::Vec3;

use crate::chunk::ChunkCoord;
use crate::config::GridParams;
use crate::density::{DensityField, FnField};
use crate::lattice::LatticeId;
use crate::presentation::PresentationLayer;
use crate::types::ChunkMesh;

// =============================================================================
// Fixture fields
// =============================================================================

fn origin_corner(p: Vec3) -> f32 {
  if p == Vec3::splat(-1.0) {
    0.0
  } else {
    1.0
  }
}

/// `0` at `(-1, -1, -1)`, `1` everywhere else.
///
/// With a 2-point chunk of bounds 2 centred on the origin and iso 0.5 only
/// corner 0 of the single voxel is below the threshold.
pub const ORIGIN_CORNER_FIELD: FnField<fn(Vec3) -> f32> = FnField(origin_corner as fn(Vec3) -> f32);

/// Wrapper counting `sample()` calls.
pub struct CountingField<F> {
  pub inner: F,
  pub sample_count: AtomicUsize,
}

impl<F: DensityField> CountingField<F> {
  pub fn new(inner: F) -> Self {
    Self {
      inner,
      sample_count: AtomicUsize::new(0),
    }
  }

  pub fn count(&self) -> usize {
    self.sample_count.load(Ordering::SeqCst)
  }
}

impl<F: DensityField> DensityField for CountingField<F> {
  fn sample(&self, position: Vec3) -> f32 {
    self.sample_count.fetch_add(1, Ordering::SeqCst);
    self.inner.sample(position)
  }

  fn rebind(&mut self, params: &GridParams) {
    self.inner.rebind(params);
  }
}

// =============================================================================
// Recording presentation
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum PresentationEvent {
  Created(ChunkCoord, String),
  Ready(ChunkCoord, usize),
  Destroyed(ChunkCoord),
  Teardown,
}

/// Presentation layer that stores every callback in order.
#[derive(Default)]
pub struct RecordingPresentation {
  events: Mutex<Vec<PresentationEvent>>,
}

impl RecordingPresentation {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn events(&self) -> Vec<PresentationEvent> {
    self.events.lock().unwrap().clone()
  }

  pub fn take(&self) -> Vec<PresentationEvent> {
    std::mem::take(&mut *self.events.lock().unwrap())
  }

  fn push(&self, event: PresentationEvent) {
    self.events.lock().unwrap().push(event);
  }
}

impl PresentationLayer for RecordingPresentation {
  fn on_chunk_created(&self, _lattice: LatticeId, coord: ChunkCoord, name: &str) {
    self.push(PresentationEvent::Created(coord, name.to_string()));
  }

  fn on_chunk_ready(&self, _lattice: LatticeId, coord: ChunkCoord, _centre: Vec3, mesh: &ChunkMesh) {
    self.push(PresentationEvent::Ready(coord, mesh.triangle_count()));
  }

  fn on_chunk_destroyed(&self, _lattice: LatticeId, coord: ChunkCoord) {
    self.push(PresentationEvent::Destroyed(coord));
  }

  fn on_lattice_teardown(&self, _lattice: LatticeId) {
    self.push(PresentationEvent::Teardown);
  }
}

// =============================================================================
// Mesh helpers
// =============================================================================

/// Triangles as raw position bits, sorted. Order-independent comparison key.
pub fn sorted_triangle_bits(mesh: &ChunkMesh) -> Vec<[u32; 9]> {
  let mut out: Vec<[u32; 9]> = mesh
    .triangles()
    .map(|t| {
      let mut bits = [0u32; 9];
      for (i, v) in t.vertices().iter().enumerate() {
        bits[i * 3] = v.x.to_bits();
        bits[i * 3 + 1] = v.y.to_bits();
        bits[i * 3 + 2] = v.z.to_bits();
      }
      bits
    })
    .collect();
  out.sort_unstable();
  out
}

/// Weld vertices with identical position bits across `meshes` and count how
/// many triangles use each undirected edge.
pub fn welded_edge_counts<'a>(meshes: impl IntoIterator<Item = &'a ChunkMesh>) -> HashMap<(usize, usize), usize> {
  let mut ids: HashMap<[u32; 3], usize> = HashMap::new();
  let mut edges = HashMap::new();

  for mesh in meshes {
    for tri in mesh.triangles() {
      let v = tri.vertices().map(|p| {
        let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
        let next = ids.len();
        *ids.entry(key).or_insert(next)
      });
      for (a, b) in [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])] {
        *edges.entry((a.min(b), a.max(b))).or_insert(0) += 1;
      }
    }
  }
  edges
}
