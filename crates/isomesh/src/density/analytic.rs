//! Closed-form fields: useful as fixtures and for simple scenes.

use glam::Vec3;

use super::DensityField;
use crate::config::GridParams;

/// Ball of `radius` around `centre`: `radius - |p + offset - centre|`.
///
/// Positive inside, zero on the sphere, negative outside. `offset` follows the
/// grid's offset, so a non-zero grid offset moves the ball to `centre - offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereField {
  pub centre: Vec3,
  pub radius: f32,
  pub offset: Vec3,
}

impl SphereField {
  pub fn new(centre: Vec3, radius: f32) -> Self {
    Self {
      centre,
      radius,
      offset: Vec3::ZERO,
    }
  }

  /// Sphere at origin with given radius.
  pub fn at_origin(radius: f32) -> Self {
    Self::new(Vec3::ZERO, radius)
  }

  pub fn with_offset(mut self, offset: Vec3) -> Self {
    self.offset = offset;
    self
  }
}

impl DensityField for SphereField {
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    self.radius - (position + self.offset - self.centre).length()
  }

  fn rebind(&mut self, params: &GridParams) {
    self.offset = params.offset;
  }
}

/// Linear field `dot(p, normal) - distance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneField {
  pub normal: Vec3,
  pub distance: f32,
}

impl PlaneField {
  pub fn new(normal: Vec3, distance: f32) -> Self {
    Self { normal, distance }
  }
}

impl DensityField for PlaneField {
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    position.dot(self.normal) - self.distance
  }
}

/// Same value everywhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantField(pub f32);

impl DensityField for ConstantField {
  #[inline]
  fn sample(&self, _position: Vec3) -> f32 {
    self.0
  }
}

/// Adapts a closure into a field.
///
/// ```ignore
/// let field = FnField(|p: Vec3| 1.0 - p.length());
/// ```
#[derive(Clone, Copy)]
pub struct FnField<F>(pub F);

impl<F> DensityField for FnField<F>
where
  F: Fn(Vec3) -> f32 + Send + Sync,
{
  #[inline]
  fn sample(&self, position: Vec3) -> f32 {
    (self.0)(position)
  }
}
