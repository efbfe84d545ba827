//! Triangle list compaction and normal recalculation.

use glam::Vec3A;

use crate::types::{ChunkMesh, MinMaxAABB, Triangle};

/// Flatten `triangles` into `mesh`, replacing its contents.
///
/// Three vertices per triangle, no deduplication, sequential indices. Normals
/// are recalculated from the geometry.
pub fn build_mesh_into(triangles: &[Triangle], mesh: &mut ChunkMesh) {
  mesh.clear();
  mesh.positions.reserve(triangles.len() * 3);
  mesh.indices.reserve(triangles.len() * 3);

  for tri in triangles {
    for v in tri.vertices() {
      let p = v.to_array();
      mesh.indices.push(mesh.positions.len() as u32);
      mesh.positions.push(p);
      mesh.bounds.encapsulate(p);
    }
  }

  recalculate_normals(mesh);
}

pub fn build_mesh(triangles: &[Triangle]) -> ChunkMesh {
  let mut mesh = ChunkMesh::new();
  build_mesh_into(triangles, &mut mesh);
  mesh
}

/// Recalculate vertex normals from triangle geometry.
///
/// Each triangle adds its unnormalized face normal `(b - a) × (c - a)` to its
/// three vertices, so larger faces weigh more; the sums are then normalized.
/// Vertices touched only by degenerate faces fall back to `+Y`.
pub fn recalculate_normals(mesh: &mut ChunkMesh) {
  mesh.normals.clear();
  mesh.normals.resize(mesh.positions.len(), [0.0; 3]);

  let positions = &mesh.positions;
  let normals = &mut mesh.normals;

  for tri in mesh.indices.chunks_exact(3) {
    let i0 = tri[0] as usize;
    let i1 = tri[1] as usize;
    let i2 = tri[2] as usize;

    let p0 = Vec3A::from_array(positions[i0]);
    let p1 = Vec3A::from_array(positions[i1]);
    let p2 = Vec3A::from_array(positions[i2]);

    let face_normal = (p1 - p0).cross(p2 - p0);
    for i in [i0, i1, i2] {
      add_to_normal(&mut normals[i], &face_normal.to_array());
    }
  }

  for normal in normals.iter_mut() {
    let n = Vec3A::from_array(*normal);
    let len_sq = n.length_squared();
    if len_sq < 1e-24 {
      *normal = [0.0, 1.0, 0.0]; // Fallback to up
    } else {
      *normal = (n * len_sq.sqrt().recip()).to_array();
    }
  }
}

#[inline]
fn add_to_normal(normal: &mut [f32; 3], add: &[f32; 3]) {
  normal[0] += add[0];
  normal[1] += add[1];
  normal[2] += add[2];
}

/// Bounds of a triangle list.
pub fn triangle_bounds(triangles: &[Triangle]) -> MinMaxAABB {
  let mut bounds = MinMaxAABB::empty();
  for tri in triangles {
    for v in tri.vertices() {
      bounds.encapsulate(v.to_array());
    }
  }
  bounds
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
