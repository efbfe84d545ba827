use std::sync::Arc;

use glam::Vec3;

use super::*;
use crate::config::DensityConfig;

fn sample_points() -> Vec<Vec3> {
  let mut points = Vec::new();
  for i in 0..20 {
    let t = i as f32 * 0.731;
    points.push(Vec3::new(t * 3.1 - 20.0, (t * 1.7).sin() * 8.0, 15.0 - t * 2.3));
  }
  points
}

// Analytic fields
#[test]
fn test_sphere_sign() {
  let field = SphereField::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
  assert_eq!(field.sample(Vec3::new(1.0, 0.0, 0.0)), 2.0);
  assert_eq!(field.sample(Vec3::new(3.0, 0.0, 0.0)), 0.0);
  assert!(field.sample(Vec3::new(5.0, 0.0, 0.0)) < 0.0);
}

#[test]
fn test_plane_is_linear() {
  let field = PlaneField::new(Vec3::Y, 1.5);
  assert_eq!(field.sample(Vec3::new(4.0, 1.5, -2.0)), 0.0);
  assert_eq!(field.sample(Vec3::new(0.0, 3.5, 0.0)), 2.0);
}

#[test]
fn test_boxed_and_shared_fields() {
  let boxed: Box<dyn DensityField> = Box::new(ConstantField(3.0));
  assert_eq!(boxed.sample(Vec3::ZERO), 3.0);

  let shared: Arc<dyn DensityField> = Arc::new(FnField(|p: Vec3| p.x * 2.0));
  assert_eq!(shared.sample(Vec3::new(1.5, 0.0, 0.0)), 3.0);
  assert_eq!((&shared).sample(Vec3::new(-1.0, 0.0, 0.0)), -2.0);
}

// Volumetric
#[test]
fn test_volumetric_is_deterministic() {
  let config = DensityConfig::new().with_seed(42).with_noise_scale(4.0);
  let a = VolumetricField::new(config.clone());
  let b = VolumetricField::new(config);

  assert_eq!(a.octave_offsets(), b.octave_offsets());
  for p in sample_points() {
    assert_eq!(a.sample(p).to_bits(), b.sample(p).to_bits());
  }
}

#[test]
fn test_volumetric_seed_changes_offsets() {
  let a = VolumetricField::new(DensityConfig::new().with_seed(1));
  let b = VolumetricField::new(DensityConfig::new().with_seed(2));
  assert_ne!(a.octave_offsets(), b.octave_offsets());
}

#[test]
fn test_volumetric_offsets_in_range() {
  let field = VolumetricField::new(DensityConfig::new().with_seed(9).with_octaves(8));
  assert_eq!(field.octave_offsets().len(), 8);
  for offset in field.octave_offsets() {
    assert!(offset.abs().max_element() <= OCTAVE_OFFSET_RANGE);
  }
}

#[test]
fn test_volumetric_zero_octaves_treated_as_one() {
  let zero = VolumetricField::new(DensityConfig::new().with_seed(3).with_octaves(0));
  let one = VolumetricField::new(DensityConfig::new().with_seed(3).with_octaves(1));
  assert_eq!(zero.octave_offsets().len(), 1);
  for p in sample_points() {
    assert_eq!(zero.sample(p).to_bits(), one.sample(p).to_bits());
  }
}

#[test]
fn test_volumetric_finite() {
  let field = VolumetricField::new(DensityConfig::new().with_seed(5).with_octaves(6));
  for p in sample_points() {
    assert!(field.sample(p).is_finite());
  }
}

#[test]
fn test_volumetric_ground_gradient() {
  // Without noise the field is a plain ground plane at y = -floor_offset.
  let field = VolumetricField::new(DensityConfig::new().with_noise_weight(0.0).with_floor_offset(2.0));
  assert_eq!(field.sample(Vec3::new(0.0, -2.0, 0.0)), 0.0);
  assert!(field.sample(Vec3::new(0.0, -5.0, 0.0)) > 0.0);
  assert!(field.sample(Vec3::new(0.0, 5.0, 0.0)) < 0.0);
}

#[test]
fn test_volumetric_noise_bounded() {
  // Each octave contributes at most its amplitude.
  let config = DensityConfig::new().with_seed(11).with_octaves(4).with_persistence(0.5);
  let field = VolumetricField::new(config);
  for p in sample_points() {
    let n = field.noise(p);
    assert!((0.0..=1.875 + 1e-5).contains(&n), "noise {} out of range", n);
  }
}

#[test]
fn test_volumetric_hard_floor() {
  let config = DensityConfig::new().with_noise_weight(0.0).with_hard_floor(-4.0, 10.0);
  let field = VolumetricField::new(config);
  let above = field.sample(Vec3::new(0.0, -3.0, 0.0));
  let below = field.sample(Vec3::new(0.0, -5.0, 0.0));
  assert_eq!(above, 2.0);
  assert_eq!(below, 14.0);
}

#[test]
fn test_volumetric_close_edges() {
  let config = DensityConfig::new().with_noise_weight(0.0).with_close_edges(true);
  let field = VolumetricField::new(config).with_domain(Vec3::splat(10.0), 1.0);

  // Boundary layer is forced outside
  assert_eq!(field.sample(Vec3::new(5.0, -3.0, 0.0)), -100.0);
  assert_eq!(field.sample(Vec3::new(0.0, -5.0, 0.0)), -100.0);
  // One sample in from the boundary is left alone
  assert_eq!(field.sample(Vec3::new(4.0, -3.0, 0.0)), 2.0);
}

#[test]
fn test_volumetric_offset_shifts_noise() {
  let config = DensityConfig::new().with_seed(4).with_noise_scale(10.0);
  let base = VolumetricField::new(config.clone());
  let shifted = VolumetricField::new(config).with_offset(Vec3::new(13.0, 0.0, 0.0));
  let p = Vec3::new(1.0, 2.0, 3.0);
  assert_eq!(shifted.noise(p), base.noise(p + Vec3::new(13.0, 0.0, 0.0)));
}

#[test]
fn test_rebind_follows_grid_layout() {
  let config = DensityConfig::new().with_seed(9).with_close_edges(true);
  let small = crate::config::GridParams::new().with_num_chunks([1, 1, 1]);
  let large = small.clone().with_num_chunks([3, 1, 1]).with_offset(Vec3::new(5.0, 0.0, -2.0));

  let mut field = FieldConfig::new(FieldMode::Volumetric, config.clone()).build(&small);
  let fresh = FieldConfig::new(FieldMode::Volumetric, config).build(&large);
  field.rebind(&large);
  for p in sample_points() {
    assert_eq!(field.sample(p), fresh.sample(p));
  }

  let mut sphere = SphereField::at_origin(1.0);
  sphere.rebind(&large);
  assert_eq!(sphere.sample(Vec3::new(-5.0, 0.0, 2.0)), 1.0);
}

#[test]
fn test_shared_field_rebinds_only_when_unique() {
  let params = crate::config::GridParams::new().with_offset(Vec3::new(4.0, 0.0, 0.0));
  let mut sole = Arc::new(SphereField::at_origin(1.0));
  sole.rebind(&params);
  assert_eq!(sole.offset, params.offset);

  let mut shared = Arc::new(SphereField::at_origin(1.0));
  let other = Arc::clone(&shared);
  shared.rebind(&params);
  assert_eq!(other.offset, Vec3::ZERO);
}

// Triplanar
#[test]
fn test_triplanar_range() {
  let config = DensityConfig::new().with_octaves(3).with_noise_scale(0.1);
  let field = TriplanarField::new(config);
  // Upper bound is the amplitude sum 1 + 0.5 + 0.25
  for p in sample_points() {
    let v = field.sample(p);
    assert!((0.0..=1.75).contains(&v));
  }
}

// Planar
#[test]
fn test_planar_bands() {
  let field = PlanarField::new(DensityConfig::new().with_noise_scale(0.1), 8.0, 0.5);
  let (x, z) = (3.3, 7.1);
  let h = field.height_at(x, z);
  assert!((0.0..=8.0).contains(&h));

  assert_eq!(field.sample(Vec3::new(x, h - 2.0, z)), 0.0);
  assert_eq!(field.sample(Vec3::new(x, h + 2.0, z)), 1.0);
  let below = field.sample(Vec3::new(x, h - 0.25, z));
  let above = field.sample(Vec3::new(x, h + 0.25, z));
  assert!((below + 0.25).abs() < 1e-4);
  assert!((above + 0.25).abs() < 1e-4);
}

// Config dispatch
#[test]
fn test_field_config_build() {
  let params = crate::config::GridParams::default();
  let sphere = FieldConfig::new(FieldMode::Sphere { radius: 3.0 }, DensityConfig::default()).build(&params);
  assert_eq!(sphere.sample(Vec3::ZERO), 3.0);

  let volumetric = FieldConfig::default().build(&params);
  let direct = VolumetricField::new(DensityConfig::default())
    .with_domain(params.world_size(), params.spacing());
  let p = Vec3::new(0.5, -1.0, 2.0);
  assert_eq!(volumetric.sample(p), direct.sample(p));
}
