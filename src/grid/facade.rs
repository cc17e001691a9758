//! Building meshes from Gmsh sources

use super::FiniteVolumeMesh;
use crate::error::Result;
use crate::io::gmsh::{
    GmshFile, GmshOptions, MeshDimensions, MeshSource, PartitionRecord, PartitionedGmshFile,
};
use crate::topology::MeshTopology;
use crate::traits::MeshConstructor;
use crate::types::RealScalar;
use log::debug;
use num::Float;

/// The kind of an imported mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    /// A 2D mesh in the plane
    Planar,
    /// A 2D mesh with 3D vertex coordinates
    SurfaceIn3D,
    /// A 3D mesh
    Volume,
}

impl MeshKind {
    /// The kind of a mesh with these dimensions
    pub fn from_dimensions(dimensions: MeshDimensions) -> Self {
        match (dimensions.dimension(), dimensions.coord_dim()) {
            (3, _) => MeshKind::Volume,
            (_, 3) => MeshKind::SurfaceIn3D,
            _ => MeshKind::Planar,
        }
    }

    /// Is this a 2D mesh?
    pub fn is_2d(self) -> bool {
        !matches!(self, MeshKind::Volume)
    }
}

/// A mesh imported from Gmsh
#[derive(Debug, Clone)]
pub struct GmshMesh<M: MeshConstructor> {
    kind: MeshKind,
    mesh: M,
}

impl<M: MeshConstructor> GmshMesh<M> {
    /// Build a mesh from an imported topology
    pub fn new(kind: MeshKind, topology: MeshTopology<M::T>) -> Self {
        Self {
            kind,
            mesh: M::construct(topology),
        }
    }

    /// The kind of mesh
    pub fn kind(&self) -> MeshKind {
        self.kind
    }

    /// The mesh
    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    /// Take the mesh
    pub fn into_inner(self) -> M {
        self.mesh
    }

    /// The topology of the mesh
    pub fn topology(&self) -> &MeshTopology<M::T> {
        self.mesh.topology()
    }

    /// Cell volumes
    ///
    /// The areas of 2D cells are made positive, whatever the orientation of
    /// the cells in the file.
    pub fn cell_volumes(&self) -> Vec<M::T> {
        let volumes = self.mesh.cell_volumes();
        if self.kind.is_2d() {
            volumes.into_iter().map(|v| v.abs()).collect()
        } else {
            volumes
        }
    }
}

/// A mesh of the part of a partitioned Gmsh mesh needed by one partition
#[derive(Debug, Clone)]
pub struct PartitionedMesh<M: MeshConstructor> {
    local_partition: usize,
    mesh: GmshMesh<M>,
    records: Vec<PartitionRecord>,
}

impl<M: MeshConstructor> PartitionedMesh<M> {
    /// The local partition
    pub fn local_partition(&self) -> usize {
        self.local_partition
    }

    /// The local mesh, with owned cells followed by ghost cells
    pub fn mesh(&self) -> &GmshMesh<M> {
        &self.mesh
    }

    /// One record for each local cell
    pub fn records(&self) -> &[PartitionRecord] {
        &self.records
    }
}

/// Import a mesh from a Gmsh source
pub fn build_mesh<M: MeshConstructor>(
    source: impl Into<MeshSource>,
    dimensions: MeshDimensions,
    options: &GmshOptions,
) -> Result<GmshMesh<M>> {
    let kind = MeshKind::from_dimensions(dimensions);
    debug!("Building {kind:?} mesh");
    let file = GmshFile::<M::T>::open(source, dimensions, options)?;
    Ok(GmshMesh::new(kind, file.into_topology()))
}

/// Import the part of a partitioned mesh needed by `local_partition`
pub fn build_partitioned_mesh<M: MeshConstructor>(
    source: impl Into<MeshSource>,
    dimensions: MeshDimensions,
    local_partition: usize,
    options: &GmshOptions,
) -> Result<PartitionedMesh<M>> {
    let kind = MeshKind::from_dimensions(dimensions);
    let file =
        PartitionedGmshFile::<M::T>::open(source, dimensions, local_partition, options)?;
    let records = file.records().to_vec();
    Ok(PartitionedMesh {
        local_partition,
        mesh: GmshMesh::new(kind, file.into_topology()),
        records,
    })
}

/// Import a 2D mesh
///
/// The vertex coordinates have `coord_dim` components, 2 if it is `None`.
pub fn gmsh_2d<T: RealScalar>(
    source: impl Into<MeshSource>,
    coord_dim: Option<usize>,
) -> Result<GmshMesh<FiniteVolumeMesh<T>>> {
    let dimensions = MeshDimensions::new(2, coord_dim.unwrap_or(2))?;
    build_mesh(source, dimensions, &GmshOptions::default())
}

/// Import a 2D mesh with 3D vertex coordinates
pub fn gmsh_2d_in_3d<T: RealScalar>(
    source: impl Into<MeshSource>,
) -> Result<GmshMesh<FiniteVolumeMesh<T>>> {
    build_mesh(source, MeshDimensions::surface_in_3d(), &GmshOptions::default())
}

/// Import a 3D mesh
pub fn gmsh_3d<T: RealScalar>(
    source: impl Into<MeshSource>,
) -> Result<GmshMesh<FiniteVolumeMesh<T>>> {
    build_mesh(source, MeshDimensions::volume(), &GmshOptions::default())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::MeshImportError;
    use crate::topology::{derive, CellTable};
    use crate::types::{ShapeTable, ShapeType};
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_kinds() {
        assert_eq!(
            MeshKind::from_dimensions(MeshDimensions::planar()),
            MeshKind::Planar
        );
        assert_eq!(
            MeshKind::from_dimensions(MeshDimensions::surface_in_3d()),
            MeshKind::SurfaceIn3D
        );
        assert_eq!(
            MeshKind::from_dimensions(MeshDimensions::volume()),
            MeshKind::Volume
        );
        assert!(MeshKind::SurfaceIn3D.is_2d());
        assert!(!MeshKind::Volume.is_2d());
    }

    #[test]
    fn test_areas_are_positive() {
        let mut cells = CellTable::new();
        cells.add_cell(vec![0, 1, 2], ShapeType::Triangle).unwrap();
        cells.add_cell(vec![0, 3, 2], ShapeType::Triangle).unwrap();
        let faces = derive(&cells, 2, &ShapeTable::for_dimension(2)).unwrap();
        let topology =
            MeshTopology::new(array![[0.0, 1.0, 1.0, 0.0], [0.0, 0.0, 1.0, 1.0]], faces).unwrap();
        let m = GmshMesh::<FiniteVolumeMesh<f64>>::new(MeshKind::Planar, topology);
        let raw = m.mesh().cell_volumes();
        assert!(raw[0] * raw[1] < 0.0);
        for v in m.cell_volumes() {
            assert_relative_eq!(v, 0.5);
        }
    }

    #[test]
    fn test_invalid_coord_dim() {
        assert!(matches!(
            gmsh_2d::<f64>("square.msh", Some(4)),
            Err(MeshImportError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            gmsh_3d::<f64>("/nonexistent/fvgrid-test/cube.msh"),
            Err(MeshImportError::Io(_))
        ));
    }
}
