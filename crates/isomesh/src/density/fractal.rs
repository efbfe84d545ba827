//! Perlin helpers and the plain triplanar fractal field.

use glam::Vec3;
use noise::{NoiseFn, Perlin};

use super::DensityField;
use crate::config::{DensityConfig, GridParams};

/// Starting frequency of [`TriplanarField`], before `noise_scale`.
const BASE_FREQUENCY: f32 = 0.5;

/// Perlin value remapped from `[-1, 1]` to `[0, 1]`.
#[inline]
pub fn perlin01(perlin: &Perlin, x: f32, y: f32) -> f32 {
  ((perlin.get([x as f64, y as f64]) as f32 + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// Mean of 2D Perlin lookups on the XY, XZ and YZ projections of `p`.
///
/// Range `[-1, 1]`.
#[inline]
pub fn triplanar(perlin: &Perlin, p: Vec3) -> f32 {
  let (x, y, z) = (p.x as f64, p.y as f64, p.z as f64);
  let xy = perlin.get([x, y]);
  let xz = perlin.get([x, z]);
  let yz = perlin.get([y, z]);
  ((xy + xz + yz) / 3.0) as f32
}

/// Sum of octaves of the `[0, 1]` triplanar average.
///
/// Frequency starts at `0.5 * noise_scale` and every octave multiplies it by
/// `lacunarity` and the amplitude by `persistence`. Unlike
/// [`VolumetricField`](super::VolumetricField) there is no ground plane, so
/// the surface is a 3D blob pattern rather than terrain.
#[derive(Clone)]
pub struct TriplanarField {
  config: DensityConfig,
  perlin: Perlin,
  offset: Vec3,
}

impl TriplanarField {
  pub fn new(config: DensityConfig) -> Self {
    Self {
      perlin: Perlin::new(config.seed),
      config,
      offset: Vec3::ZERO,
    }
  }

  /// Translate the noise domain.
  pub fn with_offset(mut self, offset: Vec3) -> Self {
    self.offset = offset;
    self
  }

  pub fn config(&self) -> &DensityConfig {
    &self.config
  }
}

impl DensityField for TriplanarField {
  fn sample(&self, position: Vec3) -> f32 {
    let p = position + self.offset;
    let mut frequency = BASE_FREQUENCY;
    let mut amplitude = 1.0;
    let mut value = 0.0;

    for _ in 0..self.config.effective_octaves() {
      let q = p * frequency * self.config.noise_scale;
      let xy = perlin01(&self.perlin, q.x, q.y);
      let xz = perlin01(&self.perlin, q.x, q.z);
      let yz = perlin01(&self.perlin, q.y, q.z);
      value += (xy + xz + yz) / 3.0 * amplitude;

      frequency *= self.config.lacunarity;
      amplitude *= self.config.persistence;
    }

    value
  }

  fn rebind(&mut self, params: &GridParams) {
    self.offset = params.offset;
  }
}
