//! Data-parallel kernel execution.
//!
//! Regenerating a chunk runs two kernels:
//!
//! ```text
//! point kernel   over [0, n)³      → writes out[x * n² + y * n + z]
//! voxel kernel   over [0, n - 1)³  → appends into a shared AppendBuffer
//! ```
//!
//! [`SequentialDispatch`] walks the grid in nested `x, y, z` order and is fully
//! deterministic. [`RayonDispatch`] spreads both kernels over a rayon pool (the
//! global one unless a dedicated pool is configured); there is no ordering
//! between voxels, so appended output order varies between runs.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Executes point and voxel kernels over a cubic grid.
pub trait Dispatch: Send + Sync {
  /// Evaluate `kernel(x, y, z)` for every point of an `n³` grid into `out`.
  ///
  /// `out.len()` must be `n³`.
  fn dispatch_points<K>(&self, n: usize, out: &mut [f32], kernel: K)
  where
    K: Fn(usize, usize, usize) -> f32 + Send + Sync;

  /// Invoke `kernel(x, y, z)` once for every voxel of an `m³` grid.
  fn dispatch_voxels<K>(&self, m: usize, kernel: K)
  where
    K: Fn(usize, usize, usize) + Send + Sync;
}

impl<D: Dispatch> Dispatch for &D {
  fn dispatch_points<K>(&self, n: usize, out: &mut [f32], kernel: K)
  where
    K: Fn(usize, usize, usize) -> f32 + Send + Sync,
  {
    (**self).dispatch_points(n, out, kernel)
  }

  fn dispatch_voxels<K>(&self, m: usize, kernel: K)
  where
    K: Fn(usize, usize, usize) + Send + Sync,
  {
    (**self).dispatch_voxels(m, kernel)
  }
}

// =============================================================================
// Sequential
// =============================================================================

/// Single-threaded nested loops.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialDispatch;

impl Dispatch for SequentialDispatch {
  fn dispatch_points<K>(&self, n: usize, out: &mut [f32], kernel: K)
  where
    K: Fn(usize, usize, usize) -> f32 + Send + Sync,
  {
    debug_assert_eq!(out.len(), n * n * n);
    let mut i = 0;
    for x in 0..n {
      for y in 0..n {
        for z in 0..n {
          out[i] = kernel(x, y, z);
          i += 1;
        }
      }
    }
  }

  fn dispatch_voxels<K>(&self, m: usize, kernel: K)
  where
    K: Fn(usize, usize, usize) + Send + Sync,
  {
    for x in 0..m {
      for y in 0..m {
        for z in 0..m {
          kernel(x, y, z);
        }
      }
    }
  }
}

// =============================================================================
// Rayon
// =============================================================================

/// Work-stealing parallel execution.
#[derive(Clone, Debug, Default)]
pub struct RayonDispatch {
  pool: Option<Arc<rayon::ThreadPool>>,
}

impl RayonDispatch {
  /// Run on rayon's global pool.
  pub fn new() -> Self {
    Self::default()
  }

  /// Run on a dedicated pool of `num_threads` workers.
  pub fn with_threads(num_threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(num_threads)
      .thread_name(|i| format!("isomesh-worker-{i}"))
      .build()?;
    Ok(Self {
      pool: Some(Arc::new(pool)),
    })
  }

  /// Worker count of the pool in use.
  pub fn num_threads(&self) -> usize {
    match &self.pool {
      Some(pool) => pool.current_num_threads(),
      None => rayon::current_num_threads(),
    }
  }

  fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
    match &self.pool {
      Some(pool) => pool.install(op),
      None => op(),
    }
  }
}

impl Dispatch for RayonDispatch {
  fn dispatch_points<K>(&self, n: usize, out: &mut [f32], kernel: K)
  where
    K: Fn(usize, usize, usize) -> f32 + Send + Sync,
  {
    debug_assert_eq!(out.len(), n * n * n);
    if n == 0 {
      return;
    }
    // One X slab per task
    self.install(|| {
      out.par_chunks_mut(n * n).enumerate().for_each(|(x, slab)| {
        let mut i = 0;
        for y in 0..n {
          for z in 0..n {
            slab[i] = kernel(x, y, z);
            i += 1;
          }
        }
      });
    });
  }

  fn dispatch_voxels<K>(&self, m: usize, kernel: K)
  where
    K: Fn(usize, usize, usize) + Send + Sync,
  {
    let m2 = m * m;
    self.install(|| {
      (0..m2 * m).into_par_iter().for_each(|i| {
        kernel(i / m2, (i / m) % m, i % m);
      });
    });
  }
}

// =============================================================================
// ExecutionModel
// =============================================================================

/// Serializable choice between the two dispatchers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionModel {
  /// Deterministic, single-threaded.
  Sequential,
  /// Rayon global pool.
  #[default]
  Parallel,
}

impl Dispatch for ExecutionModel {
  fn dispatch_points<K>(&self, n: usize, out: &mut [f32], kernel: K)
  where
    K: Fn(usize, usize, usize) -> f32 + Send + Sync,
  {
    match self {
      ExecutionModel::Sequential => SequentialDispatch.dispatch_points(n, out, kernel),
      ExecutionModel::Parallel => RayonDispatch::new().dispatch_points(n, out, kernel),
    }
  }

  fn dispatch_voxels<K>(&self, m: usize, kernel: K)
  where
    K: Fn(usize, usize, usize) + Send + Sync,
  {
    match self {
      ExecutionModel::Sequential => SequentialDispatch.dispatch_voxels(m, kernel),
      ExecutionModel::Parallel => RayonDispatch::new().dispatch_voxels(m, kernel),
    }
  }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;
