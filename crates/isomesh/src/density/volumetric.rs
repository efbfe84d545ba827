//! Ridged multi-octave terrain field.
//!
//! ```text
//! density(p) = -(p.y + floor_offset) + noise(p) * noise_weight
//!            + hard_floor_weight            if p.y < hard_floor_height
//!            = -100                         if close_edges and p is on the
//!                                           outer boundary of the domain
//!
//! noise(p) = Σ  amplitude_i * v_i
//!   v_i      = (1 - |triplanar(p_i)|)² * weight_i
//!   weight_i+1 = clamp(v_i * weight_multiplier, 0, 1)
//!   p_i      = (p + offset) * frequency_i + octave_offset_i
//! ```
//!
//! Positive density is solid ground, negative is air. Octave offsets come from
//! a `ChaCha8Rng` seeded with `seed`, so the same configuration always yields
//! the same field.

use glam::Vec3;
use noise::Perlin;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{triplanar, DensityField};
use crate::config::{DensityConfig, GridParams};

/// Half-extent of the per-octave offset cube.
pub const OCTAVE_OFFSET_RANGE: f32 = 1000.0;

/// Density forced onto the domain boundary when `close_edges` is set.
const CLOSED_EDGE_DENSITY: f32 = -100.0;

/// `noise_scale` is expressed in hundredths of the base frequency.
const NOISE_SCALE_DIVISOR: f32 = 100.0;

#[derive(Clone)]
pub struct VolumetricField {
  config: DensityConfig,
  perlin: Perlin,
  octave_offsets: Vec<Vec3>,
  offset: Vec3,
  world_size: Vec3,
  spacing: f32,
}

impl VolumetricField {
  pub fn new(config: DensityConfig) -> Self {
    let octave_offsets = octave_offsets(config.seed, config.effective_octaves());
    Self {
      perlin: Perlin::new(config.seed),
      octave_offsets,
      config,
      offset: Vec3::ZERO,
      world_size: Vec3::INFINITY,
      spacing: 0.0,
    }
  }

  /// Set the lattice extents used by `close_edges`.
  pub fn with_domain(mut self, world_size: Vec3, spacing: f32) -> Self {
    self.world_size = world_size;
    self.spacing = spacing;
    self
  }

  /// Translate the noise domain. Ground height and edges are unaffected.
  pub fn with_offset(mut self, offset: Vec3) -> Self {
    self.offset = offset;
    self
  }

  pub fn config(&self) -> &DensityConfig {
    &self.config
  }

  pub fn octave_offsets(&self) -> &[Vec3] {
    &self.octave_offsets
  }

  /// Fractal term only, before the ground gradient and floor adjustments.
  pub fn noise(&self, position: Vec3) -> f32 {
    let p = position + self.offset;
    let mut frequency = self.config.noise_scale / NOISE_SCALE_DIVISOR;
    let mut amplitude = 1.0;
    let mut weight = 1.0;
    let mut noise = 0.0;

    for octave_offset in &self.octave_offsets {
      let n = triplanar(&self.perlin, p * frequency + *octave_offset);
      let mut v = 1.0 - n.abs();
      v = v * v;
      v *= weight;
      weight = (v * self.config.weight_multiplier).clamp(0.0, 1.0);
      noise += v * amplitude;

      amplitude *= self.config.persistence;
      frequency *= self.config.lacunarity;
    }

    noise
  }

  /// Whether `position` lies on the outer sample layer of the domain.
  #[inline]
  fn on_domain_edge(&self, position: Vec3) -> bool {
    let edge = (position * 2.0).abs() - self.world_size + Vec3::splat(self.spacing / 2.0);
    edge.max_element() > 0.0
  }
}

impl DensityField for VolumetricField {
  fn sample(&self, position: Vec3) -> f32 {
    let mut density =
      -(position.y + self.config.floor_offset) + self.noise(position) * self.config.noise_weight;

    if position.y < self.config.hard_floor_height {
      density += self.config.hard_floor_weight;
    }

    if self.config.close_edges && self.on_domain_edge(position) {
      density = CLOSED_EDGE_DENSITY;
    }

    density
  }

  fn rebind(&mut self, params: &GridParams) {
    self.offset = params.offset;
    self.world_size = params.world_size();
    self.spacing = params.spacing();
  }
}

/// One offset per octave, each component uniform in `[-1, 1) * OCTAVE_OFFSET_RANGE`.
fn octave_offsets(seed: u32, octaves: u32) -> Vec<Vec3> {
  let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
  (0..octaves)
    .map(|_| {
      Vec3::new(
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
      ) * OCTAVE_OFFSET_RANGE
    })
    .collect()
}
