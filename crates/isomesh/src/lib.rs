//! isomesh - chunked Marching Cubes isosurface extraction
//!
//! Turns a continuous 3D density field into triangle meshes approximating
//! the surface where the field crosses `iso_level`. The domain is split into
//! a lattice of fixed-resolution cubic chunks that are sampled and
//! triangulated independently.
//!
//! # Features
//!
//! - **Marching Cubes**: 256-case table, edge interpolation with
//!   bit-identical vertices on shared edges
//! - **Chunk lattice**: create/reuse/destroy reconciliation, pooled buffers,
//!   cancellation
//! - **Data-parallel kernels**: per-point and per-voxel dispatch on rayon,
//!   or sequential for deterministic output
//! - **Density fields**: ridged volumetric terrain, triplanar fractal,
//!   planar heightmap and analytic fixtures
//!
//! # Example
//!
//! ```ignore
//! use isomesh::{ChunkLattice, FieldConfig, GridParams};
//!
//! let params = GridParams::new().with_num_chunks([2, 1, 2]);
//! let field = FieldConfig::default().build(&params);
//! let mut lattice: ChunkLattice<_> = ChunkLattice::new(params, field)?;
//!
//! let report = lattice.run();
//! println!("{} chunks, {} triangles", report.regenerated, report.triangles);
//! ```

pub mod constants;
pub mod triangulation_table;
pub mod types;

// Re-export commonly used items
pub use constants::{
  index_to_point, point_index, CORNER_OFFSETS, MAX_POINTS_PER_AXIS, MAX_TRIANGLES_PER_VOXEL,
  MIN_POINTS_PER_AXIS,
};
pub use triangulation_table::{
  CORNER_INDEX_A_FROM_EDGE, CORNER_INDEX_B_FROM_EDGE, EDGE_TABLE, TRIANGULATION,
};
pub use types::{ChunkMesh, MeshData, MinMaxAABB, Triangle};

// Parameters and validation
pub mod config;
pub mod error;
pub use config::{DensityConfig, FieldConfig, FieldMode, GridParams};
pub use error::ConfigError;

// Density fields
pub mod density;
pub use density::{DensityField, FnField, PlanarField, SphereField, TriplanarField, VolumetricField};

// Per-voxel triangulation
pub mod marcher;
pub use marcher::{march_voxel, triangulate, triangulate_into};

// Parallel execution
pub mod append_buffer;
pub mod buffers;
pub mod dispatch;
pub use append_buffer::AppendBuffer;
pub use buffers::MarchBuffers;
pub use dispatch::{Dispatch, ExecutionModel, RayonDispatch, SequentialDispatch};

// Chunks and the lattice
pub mod chunk;
pub mod lattice;
pub mod mesh;
pub use chunk::{Chunk, ChunkCoord, ChunkId, RegenOutcome, RegenStats};
pub use lattice::{ChunkLattice, LatticeId, ReconcileReport};

// Collaborator interfaces
pub mod commands;
pub mod export;
pub mod presentation;
pub use commands::{CommandQueue, CommandSender, LatticeCommand, TickSummary};
pub use presentation::{NullPresentation, PresentationLayer};

pub mod metrics;

#[cfg(test)]
pub(crate) mod test_utils;
