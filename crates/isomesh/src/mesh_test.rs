use glam::Vec3;

use super::*;

fn quad() -> Vec<Triangle> {
  // Two triangles of a unit square in the XY plane, wound towards +Z
  vec![
    Triangle::new(Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0)),
    Triangle::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0), Vec3::Y),
  ]
}

#[test]
fn test_build_mesh_flattens() {
  let mesh = build_mesh(&quad());
  assert_eq!(mesh.vertex_count(), 6);
  assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
  assert_eq!(mesh.positions[2], [1.0, 1.0, 0.0]);
  assert_eq!(mesh.positions[5], [0.0, 1.0, 0.0]);
  assert_eq!(mesh.bounds, MinMaxAABB::new([0.0; 3], [1.0, 1.0, 0.0]));
  assert_eq!(mesh.triangles().collect::<Vec<_>>(), quad());
}

#[test]
fn test_flat_normals_follow_winding() {
  let mesh = build_mesh(&quad());
  assert_eq!(mesh.normals.len(), 6);
  for n in &mesh.normals {
    assert_eq!(*n, [0.0, 0.0, 1.0]);
  }
}

#[test]
fn test_shared_vertex_normals_are_area_weighted() {
  let mut mesh = ChunkMesh::new();
  // Big triangle facing +Z and a small one facing +X share vertex 0
  mesh.positions = vec![
    [0.0, 0.0, 0.0],
    [4.0, 0.0, 0.0],
    [0.0, 4.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
  ];
  mesh.indices = vec![0, 1, 2, 0, 3, 4];
  recalculate_normals(&mut mesh);

  let n = Vec3::from_array(mesh.normals[0]);
  assert!((n.length() - 1.0).abs() < 1e-6);
  // Area 8 vs 0.5: +Z dominates
  assert!(n.z > n.x * 10.0);
  assert!(n.x > 0.0);
  assert_eq!(mesh.normals[1], [0.0, 0.0, 1.0]);
  assert_eq!(mesh.normals[3], [1.0, 0.0, 0.0]);
}

#[test]
fn test_degenerate_triangle_falls_back_to_up() {
  let tris = vec![Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0)];
  let mesh = build_mesh(&tris);
  for n in &mesh.normals {
    assert_eq!(*n, [0.0, 1.0, 0.0]);
  }
}

#[test]
fn test_empty_input() {
  let mesh = build_mesh(&[]);
  assert!(mesh.is_empty());
  assert!(mesh.normals.is_empty());
  assert!(!mesh.bounds.is_valid());
  assert!(!triangle_bounds(&[]).is_valid());
}

#[test]
fn test_build_into_replaces_contents() {
  let mut mesh = build_mesh(&quad());
  build_mesh_into(&quad()[..1], &mut mesh);
  assert_eq!(mesh.triangle_count(), 1);
  assert_eq!(mesh.normals.len(), 3);
  assert_eq!(triangle_bounds(&quad()), build_mesh(&quad()).bounds);
}
