//! PresentationLayer - callback interface for rendering collaborators.
//!
//! The lattice reports chunk lifecycle events through this trait so that
//! scene graphs, exporters or engine bridges can mirror the chunk set
//! without the core depending on any of them.

use glam::Vec3;

use crate::chunk::ChunkCoord;
use crate::lattice::LatticeId;
use crate::types::ChunkMesh;

/// Callback interface for chunk lifecycle events.
///
/// Callbacks run on the thread that owns the lattice, after the step they
/// describe has completed.
///
/// # Example
///
/// ```ignore
/// struct SceneBridge {
///     scene: Mutex<Scene>,
/// }
///
/// impl PresentationLayer for SceneBridge {
///     fn on_chunk_ready(&self, lattice: LatticeId, coord: ChunkCoord,
///                       centre: Vec3, mesh: &ChunkMesh) {
///         self.scene.lock().unwrap().upload(lattice, coord, centre, mesh);
///     }
///     // ...
/// }
/// ```
pub trait PresentationLayer: Send + Sync {
  /// A new chunk object exists at `coord`. `name` is its display name.
  fn on_chunk_created(&self, lattice: LatticeId, coord: ChunkCoord, name: &str);

  /// The chunk at `coord` finished a regeneration; `mesh` replaces any
  /// previously presented mesh.
  fn on_chunk_ready(&self, lattice: LatticeId, coord: ChunkCoord, centre: Vec3, mesh: &ChunkMesh);

  /// The chunk at `coord` was retired.
  fn on_chunk_destroyed(&self, lattice: LatticeId, coord: ChunkCoord);

  /// The lattice is being torn down. Called after every chunk was destroyed.
  fn on_lattice_teardown(&self, lattice: LatticeId);
}

/// No-op implementation for tests and headless runs.
pub struct NullPresentation;

impl PresentationLayer for NullPresentation {
  fn on_chunk_created(&self, _lattice: LatticeId, _coord: ChunkCoord, _name: &str) {}

  fn on_chunk_ready(&self, _lattice: LatticeId, _coord: ChunkCoord, _centre: Vec3, _mesh: &ChunkMesh) {}

  fn on_chunk_destroyed(&self, _lattice: LatticeId, _coord: ChunkCoord) {}

  fn on_lattice_teardown(&self, _lattice: LatticeId) {}
}
