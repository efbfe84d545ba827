use std::sync::atomic::AtomicBool;

use glam::Vec3;

use super::*;
use crate::constants::point_index;
use crate::density::{ConstantField, FnField, SphereField};
use crate::dispatch::{RayonDispatch, SequentialDispatch};
use crate::test_utils::{sorted_triangle_bits, ORIGIN_CORNER_FIELD};

fn regen<F: DensityField>(chunk: &mut Chunk, params: &GridParams, field: &F) -> RegenOutcome {
  let mut buffers = MarchBuffers::new();
  chunk.regenerate(params, field, &SequentialDispatch, &mut buffers, &AtomicBool::new(false))
}

#[test]
fn test_coord_name() {
  assert_eq!(ChunkCoord::new(1, -2, 3).name(), "Chunk (1, -2, 3)");
  assert_eq!(ChunkCoord::from([4, 5, 6]), ChunkCoord::new(4, 5, 6));
}

#[test]
fn test_chunk_ids_are_unique() {
  let params = GridParams::default();
  let a = Chunk::new(ChunkCoord::new(0, 0, 0), &params);
  let b = Chunk::new(ChunkCoord::new(0, 0, 0), &params);
  assert_ne!(a.id(), b.id());
}

#[test]
fn test_single_corner_chunk() {
  // One voxel spanning [-1, 1]³, only the min corner below the threshold
  let params = GridParams::new()
    .with_num_points_per_axis(2)
    .with_bounds_size(2.0)
    .with_iso_level(0.5);
  let mut chunk = Chunk::new(ChunkCoord::default(), &params);
  assert_eq!(chunk.centre(), Vec3::ZERO);

  let outcome = regen(&mut chunk, &params, &ORIGIN_CORNER_FIELD);
  let RegenOutcome::Completed(stats) = outcome else {
    panic!("expected completion");
  };
  assert_eq!(stats.triangles, 1);
  assert_eq!(stats.dropped, 0);

  let mesh = chunk.mesh();
  assert_eq!(mesh.positions, vec![[0.0, -1.0, -1.0], [-1.0, 0.0, -1.0], [-1.0, -1.0, 0.0]]);
  assert_eq!(mesh.indices, vec![0, 1, 2]);
  let expected_normal = Vec3::ONE.normalize().to_array();
  for n in &mesh.normals {
    for i in 0..3 {
      assert!((n[i] - expected_normal[i]).abs() < 1e-6);
    }
  }
  assert_eq!(chunk.generation(), 1);
}

#[test]
fn test_uniform_field_is_empty() {
  let params = GridParams::new().with_num_points_per_axis(6).with_iso_level(0.0);
  let mut chunk = Chunk::new(ChunkCoord::default(), &params);
  let outcome = regen(&mut chunk, &params, &ConstantField(0.0));
  assert!(outcome.is_completed());
  assert!(chunk.mesh().is_empty());
  assert_eq!(chunk.samples().len(), 216);
}

#[test]
fn test_samples_match_field() {
  let params = GridParams::new().with_num_points_per_axis(4).with_bounds_size(6.0);
  let mut chunk = Chunk::new(ChunkCoord::default(), &params);
  let field = FnField(|p: Vec3| p.x * 100.0 + p.y * 10.0 + p.z);
  regen(&mut chunk, &params, &field);

  let centre = chunk.centre();
  for (x, y, z) in [(0, 0, 0), (3, 1, 2), (1, 3, 0)] {
    let p = params.sample_position(centre, x, y, z);
    assert_eq!(chunk.samples()[point_index(x, y, z, 4)], field.sample(p));
  }
}

#[test]
fn test_regeneration_is_idempotent() {
  let params = GridParams::new().with_num_points_per_axis(12).with_bounds_size(10.0);
  let field = SphereField::new(Vec3::new(0.3, -0.2, 0.1), 3.7);
  let mut chunk = Chunk::new(ChunkCoord::default(), &params);

  regen(&mut chunk, &params, &field);
  let first = chunk.mesh().clone();
  assert!(!first.is_empty());

  regen(&mut chunk, &params, &field);
  assert_eq!(chunk.mesh(), &first);
  assert_eq!(chunk.generation(), 2);
}

#[test]
fn test_parallel_matches_sequential() {
  let params = GridParams::new().with_num_points_per_axis(16).with_bounds_size(10.0);
  let field = SphereField::new(Vec3::new(0.3, -0.2, 0.1), 3.7);

  let mut seq = Chunk::new(ChunkCoord::default(), &params);
  regen(&mut seq, &params, &field);

  let mut par = Chunk::new(ChunkCoord::default(), &params);
  let mut buffers = MarchBuffers::new();
  let outcome = par.regenerate(&params, &field, &RayonDispatch::new(), &mut buffers, &AtomicBool::new(false));
  assert!(outcome.is_completed());

  assert_eq!(seq.samples(), par.samples());
  assert_eq!(sorted_triangle_bits(seq.mesh()), sorted_triangle_bits(par.mesh()));
}

#[test]
fn test_cancel_keeps_previous_state() {
  let params = GridParams::new().with_num_points_per_axis(8).with_bounds_size(10.0);
  let mut chunk = Chunk::new(ChunkCoord::default(), &params);
  regen(&mut chunk, &params, &SphereField::at_origin(3.0));
  let before = chunk.mesh().clone();
  let samples_before = chunk.samples().to_vec();

  let mut buffers = MarchBuffers::new();
  let cancel = AtomicBool::new(true);
  let outcome = chunk.regenerate(
    &params,
    &SphereField::at_origin(2.0),
    &SequentialDispatch,
    &mut buffers,
    &cancel,
  );

  assert_eq!(outcome, RegenOutcome::Cancelled);
  assert_eq!(chunk.mesh(), &before);
  assert_eq!(chunk.samples(), samples_before.as_slice());
  assert_eq!(chunk.generation(), 1);
}

#[test]
fn test_invalid_params_are_rejected() {
  let params = GridParams::new().with_num_points_per_axis(5);
  let mut chunk = Chunk::new(ChunkCoord::default(), &params);
  regen(&mut chunk, &params, &SphereField::at_origin(3.0));
  let before = chunk.mesh().clone();

  for bad in [
    params.clone().with_num_points_per_axis(0),
    params.clone().with_bounds_size(f32::NAN),
  ] {
    let outcome = regen(&mut chunk, &bad, &SphereField::at_origin(3.0));
    assert!(matches!(outcome, RegenOutcome::Rejected(_)));
  }
  assert_eq!(
    regen(&mut chunk, &params.clone().with_num_points_per_axis(0), &ConstantField(1.0)),
    RegenOutcome::Rejected(ConfigError::TooFewPoints(0))
  );
  assert_eq!(chunk.mesh(), &before);
  assert_eq!(chunk.samples().len(), 125);
  assert_eq!(chunk.generation(), 1);
}

#[test]
fn test_vertices_stay_inside_chunk_bounds() {
  let params = GridParams::new()
    .with_num_points_per_axis(10)
    .with_bounds_size(4.0)
    .with_num_chunks([2, 1, 1]);
  let coord = ChunkCoord::new(1, 0, 0);
  let mut chunk = Chunk::new(coord, &params);
  regen(&mut chunk, &params, &SphereField::new(Vec3::new(2.0, 0.0, 0.0), 1.5));

  let centre = chunk.centre();
  assert_eq!(centre, Vec3::new(2.0, 0.0, 0.0));
  let half = params.bounds_size / 2.0;
  let bounds = crate::types::MinMaxAABB::new((centre - half).to_array(), (centre + half).to_array());
  assert!(!chunk.mesh().is_empty());
  for p in &chunk.mesh().positions {
    assert!(bounds.contains(*p, 1e-5));
  }
}

#[test]
fn test_buffers_reused_across_chunks() {
  let params = GridParams::new().with_num_points_per_axis(5);
  let mut buffers = MarchBuffers::new();
  let cancel = AtomicBool::new(false);
  let field = SphereField::at_origin(6.0);

  let mut a = Chunk::new(ChunkCoord::new(0, 0, 0), &params);
  let mut b = Chunk::new(ChunkCoord::new(0, 0, 0), &params);
  a.regenerate(&params, &field, &SequentialDispatch, &mut buffers, &cancel);
  b.regenerate(&params, &field, &SequentialDispatch, &mut buffers, &cancel);

  assert_eq!(buffers.resolution(), Some(5));
  assert_eq!(a.samples(), b.samples());
  assert_eq!(a.mesh(), b.mesh());
}
