//! Wavefront OBJ export.
//!
//! Every mesh becomes one `o` group with `v`, `vn` and `f v//vn` records;
//! indices are offset so several meshes share one file.

use std::io::{self, Write};

use crate::lattice::ChunkLattice;
use crate::density::DensityField;
use crate::dispatch::Dispatch;
use crate::types::ChunkMesh;

/// Write `meshes` as named OBJ objects. Empty meshes are skipped.
///
/// Returns the number of triangles written.
pub fn write_obj<'a, W, I>(out: &mut W, meshes: I) -> io::Result<usize>
where
  W: Write,
  I: IntoIterator<Item = (String, &'a ChunkMesh)>,
{
  writeln!(out, "# isomesh")?;
  let mut base = 1usize;
  let mut triangles = 0;

  for (name, mesh) in meshes {
    if mesh.is_empty() {
      continue;
    }
    writeln!(out, "o {name}")?;
    for [x, y, z] in &mesh.positions {
      writeln!(out, "v {x} {y} {z}")?;
    }
    for [x, y, z] in &mesh.normals {
      writeln!(out, "vn {x} {y} {z}")?;
    }
    for tri in mesh.indices.chunks_exact(3) {
      let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize + base);
      writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }
    base += mesh.vertex_count();
    triangles += mesh.triangle_count();
  }

  Ok(triangles)
}

/// Write every live chunk of `lattice`, in coordinate order.
pub fn write_lattice_obj<W, F, D>(out: &mut W, lattice: &ChunkLattice<F, D>) -> io::Result<usize>
where
  W: Write,
  F: DensityField,
  D: Dispatch,
{
  write_obj(out, lattice.chunks().into_iter().map(|chunk| (chunk.name(), chunk.mesh())))
}
