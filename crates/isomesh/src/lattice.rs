//! ChunkLattice - the live chunk set and its reconciliation.
//!
//! ```text
//! reconcile(desired)
//!   existing = take(live chunks)
//!   for coord in desired:  reuse existing[coord] or create   → on_chunk_created
//!   for leftover in existing:  destroy                        → on_chunk_destroyed
//!   for coord in desired:  regenerate through pooled buffers  → on_chunk_ready
//! ```
//!
//! Chunks are regenerated one at a time; all of them share one
//! [`MarchBuffers`] sized for the current resolution.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use glam::Vec3;
use web_time::Instant;

use crate::buffers::MarchBuffers;
use crate::chunk::{Chunk, ChunkCoord, RegenOutcome};
use crate::config::GridParams;
use crate::density::DensityField;
use crate::dispatch::{Dispatch, ExecutionModel};
use crate::error::ConfigError;
use crate::metrics::LatticeMetrics;
use crate::presentation::{NullPresentation, PresentationLayer};

// =============================================================================
// LatticeId - unique identifier
// =============================================================================

static LATTICE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque lattice identifier, unique within the process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LatticeId(u64);

impl LatticeId {
  pub fn new() -> Self {
    Self(LATTICE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl Default for LatticeId {
  fn default() -> Self {
    Self::new()
  }
}

// =============================================================================
// ReconcileReport
// =============================================================================

/// What one reconcile or regeneration pass did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcileReport {
  /// Coordinates that got a new chunk, in desired order.
  pub created: Vec<ChunkCoord>,
  /// Coordinates whose chunk was kept, in desired order.
  pub reused: Vec<ChunkCoord>,
  /// Coordinates whose chunk was retired, sorted.
  pub destroyed: Vec<ChunkCoord>,
  pub regenerated: usize,
  pub cancelled: usize,
  /// Triangles across all regenerated chunks.
  pub triangles: usize,
  /// Triangles lost to buffer overflow across all regenerated chunks.
  pub dropped: usize,
}

// =============================================================================
// ChunkLattice
// =============================================================================

/// Chunks keyed by coordinate, plus everything needed to regenerate them.
///
/// `F` is the density field and `D` the dispatcher. Use
/// `Box<dyn DensityField>` for fields chosen at runtime.
pub struct ChunkLattice<F: DensityField, D: Dispatch = ExecutionModel> {
  id: LatticeId,
  params: GridParams,
  field: F,
  dispatch: D,
  chunks: HashMap<ChunkCoord, Chunk>,
  buffers: MarchBuffers,
  presentation: Arc<dyn PresentationLayer>,
  cancel: Arc<AtomicBool>,
  metrics: LatticeMetrics,
  /// Set by a reconcile, cleared by teardown.
  live: bool,
}

impl<F: DensityField, D: Dispatch + Default> ChunkLattice<F, D> {
  /// Lattice with the default dispatcher and no presentation.
  pub fn new(params: GridParams, field: F) -> Result<Self, ConfigError> {
    Self::with_dispatch(params, field, D::default())
  }
}

impl<F: DensityField, D: Dispatch> ChunkLattice<F, D> {
  /// Lattice driven by `dispatch`. The field is rebound to `params`.
  pub fn with_dispatch(params: GridParams, mut field: F, dispatch: D) -> Result<Self, ConfigError> {
    params.validate()?;
    field.rebind(&params);
    Ok(Self {
      id: LatticeId::new(),
      params,
      field,
      dispatch,
      chunks: HashMap::new(),
      buffers: MarchBuffers::new(),
      presentation: Arc::new(NullPresentation),
      cancel: Arc::new(AtomicBool::new(false)),
      metrics: LatticeMetrics::new(),
      live: false,
    })
  }

  /// Route lifecycle callbacks to `presentation`.
  pub fn with_presentation(mut self, presentation: Arc<dyn PresentationLayer>) -> Self {
    self.presentation = presentation;
    self
  }

  pub fn id(&self) -> LatticeId {
    self.id
  }

  pub fn params(&self) -> &GridParams {
    &self.params
  }

  pub fn field(&self) -> &F {
    &self.field
  }

  pub fn dispatch(&self) -> &D {
    &self.dispatch
  }

  pub fn metrics(&self) -> &LatticeMetrics {
    &self.metrics
  }

  /// Resolution the pooled buffers are currently sized for.
  pub fn buffer_resolution(&self) -> Option<usize> {
    self.buffers.resolution()
  }

  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
    self.chunks.get(&coord)
  }

  /// Live chunks sorted by coordinate.
  pub fn chunks(&self) -> Vec<&Chunk> {
    let mut chunks: Vec<&Chunk> = self.chunks.values().collect();
    chunks.sort_by_key(|c| c.coord());
    chunks
  }

  /// Live coordinates, sorted.
  pub fn coords(&self) -> Vec<ChunkCoord> {
    let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
    coords.sort();
    coords
  }

  /// World-space centre a chunk at `coord` has under the current parameters.
  pub fn centre_from_coord(&self, coord: ChunkCoord) -> Vec3 {
    self.params.chunk_centre(coord.as_ivec3())
  }

  /// Flag another thread can raise to abandon the pass in flight.
  ///
  /// Each pass clears it on entry; chunks regenerated after it is raised
  /// report [`RegenOutcome::Cancelled`] and keep their previous mesh.
  pub fn cancel_handle(&self) -> Arc<AtomicBool> {
    Arc::clone(&self.cancel)
  }

  /// Replace the grid parameters.
  ///
  /// The field is rebound to the new layout and pooled buffers are released
  /// when the resolution changes. Chunks keep their meshes until the next pass.
  pub fn set_params(&mut self, params: GridParams) -> Result<(), ConfigError> {
    params.validate()?;
    if params.num_points_per_axis != self.params.num_points_per_axis {
      tracing::debug!(
        lattice = self.id.raw(),
        from = self.params.num_points_per_axis,
        to = params.num_points_per_axis,
        "resolution changed"
      );
      self.buffers.release();
    }
    self.field.rebind(&params);
    self.params = params;
    Ok(())
  }

  /// Replace the density field, bound to the current layout. Takes effect on
  /// the next pass.
  pub fn set_field(&mut self, mut field: F) {
    field.rebind(&self.params);
    self.field = field;
  }

  /// Every coordinate of a `num_chunks` lattice, `x` outermost, `z` innermost.
  pub fn desired_coords(num_chunks: [i32; 3]) -> Vec<ChunkCoord> {
    let [nx, ny, nz] = num_chunks.map(|c| c.max(0));
    let capacity = [nx, ny, nz]
      .iter()
      .try_fold(1usize, |acc, &c| acc.checked_mul(c as usize))
      .unwrap_or(0);
    let mut coords = Vec::with_capacity(capacity);
    for x in 0..nx {
      for y in 0..ny {
        for z in 0..nz {
          coords.push(ChunkCoord::new(x, y, z));
        }
      }
    }
    coords
  }

  /// Reconcile against the full `num_chunks` lattice.
  pub fn run(&mut self) -> ReconcileReport {
    let desired = Self::desired_coords(self.params.num_chunks);
    self.reconcile(&desired)
  }

  /// Make the live set equal `desired`, then regenerate every live chunk.
  ///
  /// Chunks already present at a desired coordinate are reused and keep
  /// their [`ChunkId`](crate::chunk::ChunkId). Repeated coordinates in
  /// `desired` are ignored after their first occurrence.
  #[cfg_attr(
    feature = "instrument",
    tracing::instrument(skip_all, name = "lattice::reconcile", fields(desired = desired.len()))
  )]
  pub fn reconcile(&mut self, desired: &[ChunkCoord]) -> ReconcileReport {
    let start = Instant::now();
    self.cancel.store(false, Ordering::Release);
    self.live = true;

    let mut report = ReconcileReport::default();
    let mut existing = std::mem::take(&mut self.chunks);
    let mut order = Vec::with_capacity(desired.len());

    for &coord in desired {
      if self.chunks.contains_key(&coord) {
        continue;
      }
      let chunk = match existing.remove(&coord) {
        Some(chunk) => {
          report.reused.push(coord);
          chunk
        }
        None => {
          let chunk = Chunk::new(coord, &self.params);
          tracing::debug!(lattice = self.id.raw(), %coord, id = chunk.id().raw(), "chunk created");
          self.presentation.on_chunk_created(self.id, coord, &chunk.name());
          self.metrics.record_created();
          report.created.push(coord);
          chunk
        }
      };
      self.chunks.insert(coord, chunk);
      order.push(coord);
    }

    let mut leftovers: Vec<ChunkCoord> = existing.into_keys().collect();
    leftovers.sort();
    for coord in leftovers {
      self.notify_destroyed(coord);
      report.destroyed.push(coord);
    }

    self.regenerate_coords(&order, &mut report);

    let elapsed_us = start.elapsed().as_micros() as u64;
    self.metrics.record_reconcile_timing(elapsed_us);
    tracing::info!(
      lattice = self.id.raw(),
      created = report.created.len(),
      reused = report.reused.len(),
      destroyed = report.destroyed.len(),
      regenerated = report.regenerated,
      cancelled = report.cancelled,
      triangles = report.triangles,
      elapsed_us,
      "lattice reconciled"
    );
    report
  }

  /// Regenerate every live chunk in coordinate order without changing the
  /// live set.
  pub fn regenerate_all(&mut self) -> ReconcileReport {
    self.cancel.store(false, Ordering::Release);
    let mut report = ReconcileReport::default();
    let coords = self.coords();
    self.regenerate_coords(&coords, &mut report);
    report
  }

  /// Destroy every chunk and release the pooled buffers.
  pub fn teardown(&mut self) {
    for coord in self.coords() {
      self.chunks.remove(&coord);
      self.notify_destroyed(coord);
    }
    self.buffers.release();
    self.presentation.on_lattice_teardown(self.id);
    self.live = false;
    tracing::debug!(lattice = self.id.raw(), "lattice torn down");
  }

  fn notify_destroyed(&mut self, coord: ChunkCoord) {
    tracing::debug!(lattice = self.id.raw(), %coord, "chunk destroyed");
    self.presentation.on_chunk_destroyed(self.id, coord);
    self.metrics.record_destroyed();
  }

  fn regenerate_coords(&mut self, coords: &[ChunkCoord], report: &mut ReconcileReport) {
    for &coord in coords {
      let Some(chunk) = self.chunks.get_mut(&coord) else {
        continue;
      };
      let outcome = chunk.regenerate(
        &self.params,
        &self.field,
        &self.dispatch,
        &mut self.buffers,
        &self.cancel,
      );
      match outcome {
        RegenOutcome::Completed(stats) => {
          report.regenerated += 1;
          report.triangles += stats.triangles;
          report.dropped += stats.dropped;
          self.metrics.record_regen(&stats);
          self
            .presentation
            .on_chunk_ready(self.id, coord, chunk.centre(), chunk.mesh());
        }
        RegenOutcome::Cancelled => {
          report.cancelled += 1;
          self.metrics.record_cancelled();
        }
        // Parameters are validated before they reach the lattice
        RegenOutcome::Rejected(_) => {}
      }
    }
  }
}

impl<F: DensityField, D: Dispatch> Drop for ChunkLattice<F, D> {
  fn drop(&mut self) {
    if self.live {
      self.teardown();
    }
  }
}

impl<F: DensityField, D: Dispatch> fmt::Debug for ChunkLattice<F, D> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ChunkLattice")
      .field("id", &self.id)
      .field("params", &self.params)
      .field("chunks", &self.chunks.len())
      .field("buffer_resolution", &self.buffers.resolution())
      .finish()
  }
}

#[cfg(test)]
#[path = "lattice_test.rs"]
mod lattice_test;
