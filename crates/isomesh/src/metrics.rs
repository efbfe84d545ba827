//! Lattice statistics: regeneration timings and triangle counts.
//!
//! Feature-gated and runtime-toggled; with the `metrics` feature off every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use isomesh::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let metrics = lattice.metrics();
//! println!("avg march {:.1}us", metrics.avg_march_timing_us());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::chunk::RegenStats;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Fixed-capacity window of recent values, oldest evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  pub fn sum(&self) -> u64 {
    self.buffer.iter().sum()
  }

  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().min()?;
    let max = self.buffer.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128)
  }
}

/// Statistics accumulated by a lattice over its lifetime.
#[derive(Debug, Clone, Default)]
pub struct LatticeMetrics {
  /// Point kernel time per regeneration, microseconds.
  pub sample_timings: RollingWindow<u64>,
  /// Voxel kernel time per regeneration, microseconds.
  pub march_timings: RollingWindow<u64>,
  /// Whole `reconcile` pass time, microseconds.
  pub reconcile_timings: RollingWindow<u64>,

  pub triangles_emitted: u64,
  /// Triangles lost to append buffer overflow.
  pub triangles_dropped: u64,
  pub chunks_created: u64,
  pub chunks_destroyed: u64,
  pub regenerations: u64,
  pub cancellations: u64,
}

impl LatticeMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear timing windows. Lifetime counters are kept.
  pub fn reset_timings(&mut self) {
    self.sample_timings.clear();
    self.march_timings.clear();
    self.reconcile_timings.clear();
  }

  pub fn record_regen(&mut self, stats: &RegenStats) {
    if !is_enabled() {
      return;
    }
    self.sample_timings.push(stats.sample_us);
    self.march_timings.push(stats.march_us);
    self.triangles_emitted += stats.triangles as u64;
    self.triangles_dropped += stats.dropped as u64;
    self.regenerations += 1;
  }

  pub fn record_cancelled(&mut self) {
    if is_enabled() {
      self.cancellations += 1;
    }
  }

  pub fn record_reconcile_timing(&mut self, timing_us: u64) {
    if is_enabled() {
      self.reconcile_timings.push(timing_us);
    }
  }

  pub fn record_created(&mut self) {
    if is_enabled() {
      self.chunks_created += 1;
    }
  }

  pub fn record_destroyed(&mut self) {
    if is_enabled() {
      self.chunks_destroyed += 1;
    }
  }

  pub fn avg_sample_timing_us(&self) -> f64 {
    self.sample_timings.average()
  }

  pub fn avg_march_timing_us(&self) -> f64 {
    self.march_timings.average()
  }
}
