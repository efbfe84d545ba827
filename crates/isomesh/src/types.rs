//! Core data types shared by the marcher, chunks and presentation.

use glam::Vec3;

/// One output triangle, vertices in table winding order.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
  pub a: Vec3,
  pub b: Vec3,
  pub c: Vec3,
}

impl Triangle {
  pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
    Self { a, b, c }
  }

  /// Unnormalized face normal, `(b - a) × (c - a)`.
  ///
  /// Its length is twice the triangle area.
  #[inline]
  pub fn face_normal(&self) -> Vec3 {
    (self.b - self.a).cross(self.c - self.a)
  }

  #[inline]
  pub fn vertices(&self) -> [Vec3; 3] {
    [self.a, self.b, self.c]
  }
}

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  /// Create AABB from min/max corners.
  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }

  /// Whether `point` lies inside or on the box, with `epsilon` slack.
  pub fn contains(&self, point: [f32; 3], epsilon: f32) -> bool {
    (0..3).all(|i| point[i] >= self.min[i] - epsilon && point[i] <= self.max[i] + epsilon)
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Renderable triangle list for one chunk.
///
/// Vertices are not shared: triangle `i` owns positions `3i..3i+3` and the
/// index buffer is the identity sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub indices: Vec<u32>,
  /// Bounding box encompassing all vertices.
  pub bounds: MinMaxAABB,
}

impl ChunkMesh {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    self.positions.clear();
    self.normals.clear();
    self.indices.clear();
    self.bounds = MinMaxAABB::empty();
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  /// Iterate triangles as position triples.
  pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
    self.indices.chunks_exact(3).map(|tri| {
      Triangle::new(
        Vec3::from_array(self.positions[tri[0] as usize]),
        Vec3::from_array(self.positions[tri[1] as usize]),
        Vec3::from_array(self.positions[tri[2] as usize]),
      )
    })
  }
}

/// Byte-level mesh buffers for consumers across an FFI or GPU upload
/// boundary.
///
/// Layout: `positions` and `normals` are packed `[f32; 3]`, `indices` packed
/// `u32`, all in native byte order.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
  pub positions: Vec<u8>,
  pub normals: Vec<u8>,
  pub indices: Vec<u8>,
  pub vertex_count: u32,
  pub index_count: u32,
  pub bounds: MinMaxAABB,
}

impl From<&ChunkMesh> for MeshData {
  fn from(mesh: &ChunkMesh) -> Self {
    Self {
      positions: mesh.positions.iter().flatten().flat_map(|v| v.to_ne_bytes()).collect(),
      normals: mesh.normals.iter().flatten().flat_map(|v| v.to_ne_bytes()).collect(),
      indices: mesh.indices.iter().flat_map(|i| i.to_ne_bytes()).collect(),
      vertex_count: mesh.positions.len() as u32,
      index_count: mesh.indices.len() as u32,
      bounds: mesh.bounds,
    }
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
