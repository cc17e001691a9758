//! Meshes
mod facade;
mod finite_volume;

pub use facade::{
    build_mesh, build_partitioned_mesh, gmsh_2d, gmsh_2d_in_3d, gmsh_3d, GmshMesh, MeshKind,
    PartitionedMesh,
};
pub use finite_volume::FiniteVolumeMesh;
