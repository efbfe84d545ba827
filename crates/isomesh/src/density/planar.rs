//! Heightmap surface expressed as a density ramp.

use glam::Vec3;
use noise::Perlin;

use super::{perlin01, DensityField};
use crate::config::{DensityConfig, GridParams};

/// Height sampling frequency relative to `noise_scale`.
const HEIGHT_FREQUENCY: f32 = 0.3;

/// Surface at `h(x, z) = height * perlin01(x * f, z * f)`, `f = 0.3 * noise_scale`.
///
/// Below `h - margin` the density is `0`, above `h + margin` it is `1`;
/// inside the band it is `-|y - h|`.
#[derive(Clone)]
pub struct PlanarField {
  config: DensityConfig,
  perlin: Perlin,
  height: f32,
  iso_margin: f32,
  offset: Vec3,
}

impl PlanarField {
  pub fn new(config: DensityConfig, height: f32, iso_margin: f32) -> Self {
    Self {
      perlin: Perlin::new(config.seed),
      config,
      height,
      iso_margin,
      offset: Vec3::ZERO,
    }
  }

  /// Translate the noise domain (horizontal components only affect `h`).
  pub fn with_offset(mut self, offset: Vec3) -> Self {
    self.offset = offset;
    self
  }

  /// Surface height at world `(x, z)`.
  pub fn height_at(&self, x: f32, z: f32) -> f32 {
    let f = self.config.noise_scale * HEIGHT_FREQUENCY;
    let nx = (x + self.offset.x) * f;
    let nz = (z + self.offset.z) * f;
    self.height * perlin01(&self.perlin, nx, nz)
  }
}

impl DensityField for PlanarField {
  fn sample(&self, position: Vec3) -> f32 {
    let h = self.height_at(position.x, position.z);
    let y = position.y;

    if y <= h - self.iso_margin {
      0.0
    } else if y >= h + self.iso_margin {
      1.0
    } else if y < h {
      y - h
    } else {
      h - y
    }
  }

  fn rebind(&mut self, params: &GridParams) {
    self.offset = params.offset;
  }
}
