use glam::Vec3;

use super::*;
use crate::constants::point_index;
use crate::triangulation_table::triangle_count;

fn unit_cube(origin: Vec3, size: f32) -> [Vec3; 8] {
  let mut positions = [Vec3::ZERO; 8];
  for (i, o) in CORNER_OFFSETS.iter().enumerate() {
    positions[i] = origin + Vec3::new(o[0] as f32, o[1] as f32, o[2] as f32) * size;
  }
  positions
}

fn densities_from_config(config: u8) -> [f32; 8] {
  let mut d = [1.0f32; 8];
  for (i, value) in d.iter_mut().enumerate() {
    if config & (1 << i) != 0 {
      *value = 0.0;
    }
  }
  d
}

#[test]
fn test_configuration_index() {
  assert_eq!(configuration_index(&[1.0; 8], 0.5), 0);
  assert_eq!(configuration_index(&[0.0; 8], 0.5), 255);
  assert_eq!(configuration_index(&densities_from_config(1), 0.5), 1);
  assert_eq!(configuration_index(&densities_from_config(0b1010_0101), 0.5), 0b1010_0101);
  // Equal to the threshold counts as not below
  assert_eq!(configuration_index(&[0.5; 8], 0.5), 0);
}

#[test]
fn test_uniform_field_emits_nothing() {
  let positions = unit_cube(Vec3::ZERO, 1.0);
  assert!(triangulate(&[0.0; 8], &positions, 0.0).is_empty());
  assert!(triangulate(&[2.0; 8], &positions, 0.0).is_empty());
  assert!(triangulate(&[-2.0; 8], &positions, 0.0).is_empty());
}

#[test]
fn test_single_corner_triangle() {
  let positions = unit_cube(Vec3::splat(-1.0), 2.0);
  let tris = triangulate(&densities_from_config(1), &positions, 0.5);

  assert_eq!(tris.len(), 1);
  let tri = tris[0];
  assert_eq!(tri.a, Vec3::new(0.0, -1.0, -1.0));
  assert_eq!(tri.b, Vec3::new(-1.0, 0.0, -1.0));
  assert_eq!(tri.c, Vec3::new(-1.0, -1.0, 0.0));

  // Winding faces away from the below-threshold corner
  let corner = positions[0];
  let centroid = (tri.a + tri.b + tri.c) / 3.0;
  assert!(tri.face_normal().dot(centroid - corner) > 0.0);
}

#[test]
fn test_complement_reverses_winding() {
  let positions = unit_cube(Vec3::ZERO, 1.0);
  let single = triangulate(&densities_from_config(1), &positions, 0.5);
  let complement = triangulate(&densities_from_config(254), &positions, 0.5);

  assert_eq!(complement.len(), 1);
  let n1 = single[0].face_normal();
  let n2 = complement[0].face_normal();
  assert!(n1.dot(n2) < 0.0);
}

#[test]
fn test_interpolation_is_exact_on_linear_field() {
  let pa = Vec3::new(0.0, 0.0, 0.0);
  let pb = Vec3::new(1.0, 0.0, 0.0);
  assert_eq!(interpolate(0.0, pa, -1.0, pb, 3.0), Vec3::new(0.25, 0.0, 0.0));
  assert_eq!(interpolate(1.0, pa, -1.0, pb, 3.0), Vec3::new(0.5, 0.0, 0.0));
}

#[test]
fn test_interpolation_is_order_independent() {
  let pa = Vec3::new(0.3, 1.7, -2.1);
  let pb = Vec3::new(0.3, 2.9, -2.1);
  let forward = interpolate(0.17, pa, -0.731, pb, 0.913);
  let backward = interpolate(0.17, pb, 0.913, pa, -0.731);
  assert_eq!(forward.to_array().map(f32::to_bits), backward.to_array().map(f32::to_bits));
}

#[test]
fn test_interpolation_is_unclamped() {
  // Threshold outside the endpoint range extrapolates past the edge
  let p = interpolate(2.0, Vec3::ZERO, 0.0, Vec3::X, 1.0);
  assert_eq!(p, Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn test_every_configuration_matches_table() {
  let positions = unit_cube(Vec3::ZERO, 1.0);
  for config in 0..=255u8 {
    let tris = triangulate(&densities_from_config(config), &positions, 0.5);
    assert_eq!(tris.len(), triangle_count(config), "config {}", config);
    assert!(!tris.spilled());

    for tri in &tris {
      for v in tri.vertices() {
        // Midpoint of a unit cube edge: two coordinates in {0, 1}, one at 0.5
        let halves = v.to_array().iter().filter(|&&c| c == 0.5).count();
        let ends = v.to_array().iter().filter(|&&c| c == 0.0 || c == 1.0).count();
        assert_eq!((halves, ends), (1, 2), "config {} vertex {:?}", config, v);
      }
    }
  }
}

#[test]
fn test_triangulate_into_appends() {
  let positions = unit_cube(Vec3::ZERO, 1.0);
  let mut out = Vec::new();
  triangulate_into(&densities_from_config(1), &positions, 0.5, &mut out);
  triangulate_into(&densities_from_config(0b0000_0011), &positions, 0.5, &mut out);
  assert_eq!(out.len(), 1 + triangle_count(0b0000_0011));
}

#[test]
fn test_march_voxel_reads_volume() {
  let n = 3;
  let spacing = 0.5;
  let origin = Vec3::new(10.0, 0.0, 0.0);
  let mut samples = vec![1.0f32; n * n * n];
  samples[point_index(1, 1, 1, n)] = -1.0;

  // The centre sample is a corner of all 8 voxels
  let mut total = 0;
  for x in 0..2 {
    for y in 0..2 {
      for z in 0..2 {
        let tris = march_voxel(&samples, n, origin, spacing, 0.0, (x, y, z));
        assert_eq!(tris.len(), 1);
        total += tris.len();
        for v in tris[0].vertices() {
          assert!((v - Vec3::new(10.5, 0.5, 0.5)).length() <= 0.25 + 1e-6);
        }
      }
    }
  }
  assert_eq!(total, 8);
}

#[test]
fn test_gather_corners_positions() {
  let n = 4;
  let samples: Vec<f32> = (0..n * n * n).map(|i| i as f32).collect();
  let (densities, positions) = gather_corners(&samples, n, Vec3::ZERO, 2.0, (1, 2, 0));

  assert_eq!(densities[0], point_index(1, 2, 0, n) as f32);
  assert_eq!(densities[6], point_index(2, 3, 1, n) as f32);
  assert_eq!(positions[0], Vec3::new(2.0, 4.0, 0.0));
  assert_eq!(positions[2], Vec3::new(4.0, 4.0, 2.0));
}
