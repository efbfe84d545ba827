//! Parameter records: grid layout and density field configuration.
//!
//! Both records are plain data with serde support and `with_*` builders. Grid
//! parameters are validated once, before anything is sized from them.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_POINTS_PER_AXIS, MIN_POINTS_PER_AXIS};
use crate::error::ConfigError;

// =============================================================================
// GridParams
// =============================================================================

/// Sampling lattice layout shared by every chunk.
///
/// ```text
///   chunk 0          chunk 1          (num_chunks.x = 2)
/// ├────────────────┼────────────────┤
/// •──•──•──•──•     •──•──•──•──•      num_points_per_axis = 5
///    spacing                           spacing = bounds_size / 4
/// └── bounds_size ─┘
///          ▲ origin at the centre of the whole domain
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
  /// Threshold separating inside from outside.
  pub iso_level: f32,

  /// World-space edge length of one chunk.
  pub bounds_size: f32,

  /// Samples per chunk axis, in `[2, 100]`.
  pub num_points_per_axis: usize,

  /// Chunk count per axis. Zero on any axis means no chunks.
  pub num_chunks: [i32; 3],

  /// Translation of the density field's sampling domain.
  pub offset: Vec3,
}

impl Default for GridParams {
  fn default() -> Self {
    Self {
      iso_level: 0.0,
      bounds_size: 20.0,
      num_points_per_axis: 50,
      num_chunks: [1, 1, 1],
      offset: Vec3::ZERO,
    }
  }
}

impl GridParams {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_iso_level(mut self, iso_level: f32) -> Self {
    self.iso_level = iso_level;
    self
  }

  pub fn with_bounds_size(mut self, bounds_size: f32) -> Self {
    self.bounds_size = bounds_size;
    self
  }

  pub fn with_num_points_per_axis(mut self, n: usize) -> Self {
    self.num_points_per_axis = n;
    self
  }

  pub fn with_num_chunks(mut self, num_chunks: [i32; 3]) -> Self {
    self.num_chunks = num_chunks;
    self
  }

  pub fn with_offset(mut self, offset: Vec3) -> Self {
    self.offset = offset;
    self
  }

  /// Check every field against its legal range.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.num_points_per_axis < MIN_POINTS_PER_AXIS {
      return Err(ConfigError::TooFewPoints(self.num_points_per_axis));
    }
    if self.num_points_per_axis > MAX_POINTS_PER_AXIS {
      return Err(ConfigError::TooManyPoints(self.num_points_per_axis));
    }
    if !self.bounds_size.is_finite() || self.bounds_size <= 0.0 {
      return Err(ConfigError::InvalidBoundsSize(self.bounds_size));
    }
    if self.num_chunks.iter().any(|&c| c < 0) {
      return Err(ConfigError::NegativeChunkCount(self.num_chunks));
    }
    if !self.iso_level.is_finite() {
      return Err(ConfigError::NonFiniteIsoLevel(self.iso_level));
    }
    if !self.offset.is_finite() {
      return Err(ConfigError::NonFiniteOffset(self.offset.to_array()));
    }
    Ok(())
  }

  /// Clamp out-of-range fields into their legal ranges.
  ///
  /// Non-finite values fall back to the defaults.
  pub fn clamped(mut self) -> Self {
    let defaults = Self::default();
    self.num_points_per_axis = self
      .num_points_per_axis
      .clamp(MIN_POINTS_PER_AXIS, MAX_POINTS_PER_AXIS);
    if !self.bounds_size.is_finite() || self.bounds_size <= 0.0 {
      self.bounds_size = defaults.bounds_size;
    }
    for c in &mut self.num_chunks {
      *c = (*c).max(0);
    }
    if !self.iso_level.is_finite() {
      self.iso_level = defaults.iso_level;
    }
    if !self.offset.is_finite() {
      self.offset = defaults.offset;
    }
    self
  }

  /// Distance between adjacent samples.
  #[inline]
  pub fn spacing(&self) -> f32 {
    self.bounds_size / self.num_voxels_per_axis() as f32
  }

  #[inline]
  pub fn num_voxels_per_axis(&self) -> usize {
    self.num_points_per_axis.saturating_sub(1)
  }

  /// Samples per chunk (`n³`).
  #[inline]
  pub fn num_points(&self) -> usize {
    self.num_points_per_axis.pow(3)
  }

  /// Voxels per chunk (`(n - 1)³`).
  #[inline]
  pub fn num_voxels(&self) -> usize {
    self.num_voxels_per_axis().pow(3)
  }

  /// Total number of chunks in the lattice.
  pub fn chunk_count(&self) -> usize {
    self
      .num_chunks
      .iter()
      .fold(1usize, |acc, &c| acc.saturating_mul(c.max(0) as usize))
  }

  /// Edge lengths of the whole lattice domain.
  pub fn world_size(&self) -> Vec3 {
    IVec3::from_array(self.num_chunks).as_vec3() * self.bounds_size
  }

  /// World-space centre of the chunk at `coord`.
  ///
  /// The domain is centred on the origin:
  /// `-(num_chunks * bounds) / 2 + coord * bounds + bounds / 2`.
  #[inline]
  pub fn chunk_centre(&self, coord: IVec3) -> Vec3 {
    -self.world_size() / 2.0
      + coord.as_vec3() * self.bounds_size
      + Vec3::splat(self.bounds_size / 2.0)
  }

  /// World position of sample `(0, 0, 0)` of the chunk centred at `centre`.
  #[inline]
  pub fn chunk_origin(&self, centre: Vec3) -> Vec3 {
    centre - Vec3::splat(self.bounds_size / 2.0)
  }

  /// World position of sample `(x, y, z)` in the chunk centred at `centre`.
  ///
  /// Matches the corner positions the marcher derives from [`chunk_origin`],
  /// bit for bit.
  ///
  /// [`chunk_origin`]: Self::chunk_origin
  #[inline]
  pub fn sample_position(&self, centre: Vec3, x: usize, y: usize, z: usize) -> Vec3 {
    self.chunk_origin(centre) + Vec3::new(x as f32, y as f32, z as f32) * self.spacing()
  }
}

// =============================================================================
// DensityConfig
// =============================================================================

/// Fractal noise configuration shared by every noise-backed field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
  /// Seed for both the noise permutation and the per-octave offsets.
  pub seed: u32,

  /// Octave count. Zero is treated as one.
  pub octaves: u32,

  /// Frequency multiplier between octaves.
  pub lacunarity: f32,

  /// Amplitude multiplier between octaves.
  pub persistence: f32,

  /// Base frequency scale.
  pub noise_scale: f32,

  /// Weight of the noise term against the ground gradient.
  pub noise_weight: f32,

  /// Force the outer boundary of the lattice domain to be outside.
  pub close_edges: bool,

  /// Vertical shift of the ground plane.
  pub floor_offset: f32,

  /// Ridge sharpening factor between octaves.
  pub weight_multiplier: f32,

  /// Height below which `hard_floor_weight` is added.
  pub hard_floor_height: f32,

  pub hard_floor_weight: f32,
}

impl Default for DensityConfig {
  fn default() -> Self {
    Self {
      seed: 0,
      octaves: 4,
      lacunarity: 2.0,
      persistence: 0.5,
      noise_scale: 1.0,
      noise_weight: 1.0,
      close_edges: false,
      floor_offset: 1.0,
      weight_multiplier: 1.0,
      hard_floor_height: f32::NEG_INFINITY,
      hard_floor_weight: 0.0,
    }
  }
}

impl DensityConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_seed(mut self, seed: u32) -> Self {
    self.seed = seed;
    self
  }

  pub fn with_octaves(mut self, octaves: u32) -> Self {
    self.octaves = octaves;
    self
  }

  pub fn with_lacunarity(mut self, lacunarity: f32) -> Self {
    self.lacunarity = lacunarity;
    self
  }

  pub fn with_persistence(mut self, persistence: f32) -> Self {
    self.persistence = persistence;
    self
  }

  pub fn with_noise_scale(mut self, noise_scale: f32) -> Self {
    self.noise_scale = noise_scale;
    self
  }

  pub fn with_noise_weight(mut self, noise_weight: f32) -> Self {
    self.noise_weight = noise_weight;
    self
  }

  pub fn with_close_edges(mut self, close_edges: bool) -> Self {
    self.close_edges = close_edges;
    self
  }

  pub fn with_floor_offset(mut self, floor_offset: f32) -> Self {
    self.floor_offset = floor_offset;
    self
  }

  pub fn with_weight_multiplier(mut self, weight_multiplier: f32) -> Self {
    self.weight_multiplier = weight_multiplier;
    self
  }

  pub fn with_hard_floor(mut self, height: f32, weight: f32) -> Self {
    self.hard_floor_height = height;
    self.hard_floor_weight = weight;
    self
  }

  /// Octave count with zero promoted to one.
  #[inline]
  pub fn effective_octaves(&self) -> u32 {
    self.octaves.max(1)
  }
}

// =============================================================================
// FieldConfig
// =============================================================================

/// Which density function a lattice samples.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldMode {
  /// Ridged multi-octave terrain above a ground plane.
  #[default]
  Volumetric,

  /// Plain multi-octave average of three axis-aligned Perlin planes.
  Triplanar,

  /// Heightmap surface `y = height * perlin(x, z)`, densities ramped within
  /// `iso_margin` of the surface.
  Planar { height: f32, iso_margin: f32 },

  /// Solid ball of `radius` at the origin, positive inside.
  Sphere { radius: f32 },
}


/// Mode plus noise settings; see [`FieldConfig::build`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
  pub mode: FieldMode,
  pub noise: DensityConfig,
}

impl FieldConfig {
  pub fn new(mode: FieldMode, noise: DensityConfig) -> Self {
    Self { mode, noise }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
