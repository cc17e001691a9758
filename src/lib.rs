//! Finite volume mesh import from Gmsh
//!
//! Meshes are read from Gmsh `.msh` files, or generated by running Gmsh on a
//! geometry file or script. The faces of the cells are derived and
//! deduplicated, giving the face/cell topology used by finite volume methods.
#![cfg_attr(feature = "strict", deny(warnings), deny(unused_crate_dependencies))]
#![warn(missing_docs)]

pub mod error;
pub mod grid;
pub mod io;
pub mod topology;
pub mod traits;
pub mod types;

pub use error::{MeshImportError, Result};
pub use grid::{build_mesh, gmsh_2d, gmsh_2d_in_3d, gmsh_3d, FiniteVolumeMesh, GmshMesh};
pub use io::gmsh::{GmshFile, GmshOptions, MeshDimensions, MeshSource, PartitionedGmshFile};
