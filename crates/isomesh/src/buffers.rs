//! Pooled scratch storage reused across chunk regenerations.
//!
//! ```text
//! MarchBuffers (sized for one resolution n)
//!   points:     n³ densities           ── point kernel output
//!   triangles:  (n-1)³ × 5 triangles   ── voxel kernel append target
//! ```
//!
//! Sized once per resolution; a resolution change releases and reallocates.

use crate::append_buffer::AppendBuffer;
use crate::constants::MAX_TRIANGLES_PER_VOXEL;
use crate::types::Triangle;

/// Triangle capacity for `num_voxels` voxels.
#[inline]
pub const fn max_triangle_count(num_voxels: usize) -> usize {
  num_voxels * MAX_TRIANGLES_PER_VOXEL
}

#[derive(Default)]
pub struct MarchBuffers {
  resolution: Option<usize>,
  points: Vec<f32>,
  triangles: Option<AppendBuffer<Triangle>>,
}

impl MarchBuffers {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make the buffers fit `num_points_per_axis`, reallocating only when it
  /// differs from the current resolution. Returns true if allocation happened.
  pub fn ensure_resolution(&mut self, num_points_per_axis: usize) -> bool {
    if self.resolution == Some(num_points_per_axis) {
      return false;
    }
    self.release();

    let n = num_points_per_axis;
    let num_voxels = n.saturating_sub(1).pow(3);
    self.points = vec![0.0; n * n * n];
    self.triangles = Some(AppendBuffer::with_capacity(max_triangle_count(num_voxels)));
    self.resolution = Some(n);

    tracing::debug!(
      num_points_per_axis = n,
      triangle_capacity = max_triangle_count(num_voxels),
      "allocated march buffers"
    );
    true
  }

  /// Drop all storage.
  pub fn release(&mut self) {
    if self.resolution.take().is_some() {
      tracing::debug!("released march buffers");
    }
    self.points = Vec::new();
    self.triangles = None;
  }

  /// Resolution the buffers are sized for, if allocated.
  pub fn resolution(&self) -> Option<usize> {
    self.resolution
  }

  pub fn is_allocated(&self) -> bool {
    self.resolution.is_some()
  }

  /// Triangle slots available per regeneration.
  pub fn triangle_capacity(&self) -> usize {
    self.triangles.as_ref().map_or(0, AppendBuffer::capacity)
  }

  /// Size the buffers for `num_points_per_axis` and hand out both for one
  /// pass, with the triangle cursor reset.
  ///
  /// The point buffer is resized to `n³`; callers may swap its storage out
  /// between passes.
  pub fn prepare_pass(
    &mut self,
    num_points_per_axis: usize,
  ) -> (&mut Vec<f32>, &mut AppendBuffer<Triangle>) {
    self.ensure_resolution(num_points_per_axis);
    let n = num_points_per_axis;
    self.points.resize(n * n * n, 0.0);

    let capacity = max_triangle_count(n.saturating_sub(1).pow(3));
    let triangles = self
      .triangles
      .get_or_insert_with(|| AppendBuffer::with_capacity(capacity));
    triangles.reset();
    (&mut self.points, triangles)
  }
}

#[cfg(test)]
#[path = "buffers_test.rs"]
mod buffers_test;
