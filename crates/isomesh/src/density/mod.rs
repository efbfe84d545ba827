//! Density fields: scalar functions sampled on the chunk lattice.
//!
//! A field maps a world position to a density. The isosurface is where the
//! density equals the grid's `iso_level`; corners below it are outside.
//!
//! ```text
//! FieldConfig ──build(&GridParams)──► Box<dyn DensityField>
//!                                           │
//!     sample(position) ◄── point kernel ────┘  (called from worker threads)
//! ```
//!
//! Fields must be deterministic and pure for a fixed configuration, and finite
//! everywhere in the sampled domain.

use std::sync::Arc;

use glam::Vec3;

use crate::config::{FieldConfig, FieldMode, GridParams};

mod analytic;
mod fractal;
mod planar;
mod volumetric;

pub use analytic::{ConstantField, FnField, PlaneField, SphereField};
pub use fractal::{perlin01, triplanar, TriplanarField};
pub use planar::PlanarField;
pub use volumetric::{VolumetricField, OCTAVE_OFFSET_RANGE};

/// Scalar field sampled at world positions.
pub trait DensityField: Send + Sync {
  /// Density at `position`.
  fn sample(&self, position: Vec3) -> f32;

  /// Adopt the layout of `params`: noise offset, world size, sample spacing.
  ///
  /// Called by the lattice whenever its parameters or field change, before
  /// the next pass samples. Fields independent of the layout keep the default.
  fn rebind(&mut self, _params: &GridParams) {}
}

impl<T: DensityField + ?Sized> DensityField for Box<T> {
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    (**self).sample(position)
  }

  fn rebind(&mut self, params: &GridParams) {
    (**self).rebind(params);
  }
}

/// Shared fields are only rebound while this is the sole handle.
impl<T: DensityField + ?Sized> DensityField for Arc<T> {
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    (**self).sample(position)
  }

  fn rebind(&mut self, params: &GridParams) {
    match Arc::get_mut(self) {
      Some(field) => field.rebind(params),
      None => tracing::warn!("shared density field not rebound to new grid layout"),
    }
  }
}

/// Borrowed fields keep the layout they were bound to.
impl<T: DensityField + ?Sized> DensityField for &T {
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    (**self).sample(position)
  }
}

impl FieldConfig {
  /// Instantiate the configured field for a lattice laid out by `params`.
  ///
  /// The field is bound to the layout of `params`; a lattice rebinds it
  /// through [`DensityField::rebind`] when its parameters change.
  pub fn build(&self, params: &GridParams) -> Box<dyn DensityField> {
    let mut field: Box<dyn DensityField> = match self.mode {
      FieldMode::Volumetric => Box::new(VolumetricField::new(self.noise.clone())),
      FieldMode::Triplanar => Box::new(TriplanarField::new(self.noise.clone())),
      FieldMode::Planar { height, iso_margin } => {
        Box::new(PlanarField::new(self.noise.clone(), height, iso_margin))
      }
      FieldMode::Sphere { radius } => Box::new(SphereField::at_origin(radius)),
    };
    field.rebind(params);
    field
  }
}

#[cfg(test)]
#[path = "density_test.rs"]
mod density_test;
