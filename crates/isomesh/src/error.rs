//! Error types for parameter validation.

use thiserror::Error;

use crate::constants::{MAX_POINTS_PER_AXIS, MIN_POINTS_PER_AXIS};

/// Rejected grid parameters.
///
/// Returned before any sample or triangle storage is sized, so a lattice never
/// holds parameters that fail these checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  #[error("num_points_per_axis must be at least {MIN_POINTS_PER_AXIS}, got {0}")]
  TooFewPoints(usize),

  #[error("num_points_per_axis must be at most {MAX_POINTS_PER_AXIS}, got {0}")]
  TooManyPoints(usize),

  #[error("bounds_size must be finite and positive, got {0}")]
  InvalidBoundsSize(f32),

  #[error("num_chunks must be non-negative on every axis, got {0:?}")]
  NegativeChunkCount([i32; 3]),

  #[error("iso_level must be finite, got {0}")]
  NonFiniteIsoLevel(f32),

  #[error("offset must be finite, got {0:?}")]
  NonFiniteOffset([f32; 3]),
}
