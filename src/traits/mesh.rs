//! Mesh construction
use crate::topology::MeshTopology;
use crate::types::RealScalar;

pub trait MeshConstructor: Sized {
    //! A mesh that can be built from an imported topology

    /// The floating point type used for coordinates
    type T: RealScalar;

    /// Build the mesh and its geometric quantities
    fn construct(topology: MeshTopology<Self::T>) -> Self;

    /// The topology the mesh was built from
    fn topology(&self) -> &MeshTopology<Self::T>;

    /// Cell volumes (areas for 2D meshes). These may be signed, depending on
    /// the orientation of the cells
    fn cell_volumes(&self) -> Vec<Self::T>;
}
