//! Gmsh import
//!
//! Only ASCII files of format version 2 are read. Geometry files and scripts
//! are meshed by running the `gmsh` executable, which is asked for version 2
//! output.

mod elements;
mod header;
mod nodes;
mod options;
mod partitioned;
mod section;
mod source;

pub use elements::{
    classify, parse as parse_elements, parse_partitioned, Classification, ElementRecords,
    ElementRow, PartitionedCells,
};
pub use header::{read_meta_header, MetaHeader};
pub use nodes::{build as build_vertices, VertexTable};
pub use options::{GmshOptions, MeshDimensions};
pub use partitioned::{PartitionRecord, PartitionedGmshFile};
pub use section::{isolate, RawSection};
pub use source::{resolve, MeshSource, ResolvedMesh};

use crate::error::Result;
use crate::topology::{derive, CellTable, MeshTopology};
use crate::types::{RealScalar, ShapeTable};
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};

/// Open a resolved mesh file for reading
fn open_resolved(
    source: &MeshSource,
    dimensions: MeshDimensions,
    options: &GmshOptions,
) -> Result<(ResolvedMesh, BufReader<File>)> {
    let resolved = resolve(source, dimensions, options)?;
    debug!("Reading {}", resolved.path().display());
    let file = File::open(resolved.path())?;
    Ok((resolved, BufReader::new(file)))
}

/// A mesh read from a Gmsh file
#[derive(Debug, Clone)]
pub struct GmshFile<T: RealScalar> {
    header: MetaHeader,
    dimensions: MeshDimensions,
    shapes: ShapeTable,
    cells: CellTable,
    topology: MeshTopology<T>,
}

impl<T: RealScalar> GmshFile<T> {
    /// Read a mesh, running Gmsh first if the source is not a mesh file
    pub fn open(
        source: impl Into<MeshSource>,
        dimensions: MeshDimensions,
        options: &GmshOptions,
    ) -> Result<Self> {
        let source = source.into();
        // `_resolved` owns any generated file until reading is finished
        let (_resolved, mut reader) = open_resolved(&source, dimensions, options)?;
        Self::from_reader(&mut reader, dimensions)
    }

    /// Read a mesh from a stream holding the content of a `.msh` file
    pub fn from_reader<R: BufRead + Seek>(
        reader: &mut R,
        dimensions: MeshDimensions,
    ) -> Result<Self> {
        let header = read_meta_header(reader)?;
        let shapes = ShapeTable::for_dimension(dimensions.dimension());

        let vertices = build_vertices::<T, _>(isolate("Nodes", reader)?, dimensions.coord_dim())?;
        let cells = parse_elements(isolate("Elements", reader)?, &shapes)?;
        let cells = vertices.translate(&cells)?;

        let faces = derive(&cells, dimensions.dimension(), &shapes)?;
        let topology = MeshTopology::new(vertices.into_coordinates(), faces)?;
        info!(
            "Imported {}D mesh: {} vertices, {} faces, {} cells",
            dimensions.dimension(),
            topology.vertex_count(),
            topology.face_count(),
            topology.cell_count()
        );
        Ok(Self {
            header,
            dimensions,
            shapes,
            cells,
            topology,
        })
    }

    /// The `$MeshFormat` header of the file
    pub fn header(&self) -> &MetaHeader {
        &self.header
    }

    /// The dimensions the mesh was read with
    pub fn dimensions(&self) -> MeshDimensions {
        self.dimensions
    }

    /// The shapes that were read as cells
    pub fn shapes(&self) -> &ShapeTable {
        &self.shapes
    }

    /// The cells, as vertex indices
    pub fn cells(&self) -> &CellTable {
        &self.cells
    }

    /// The topology
    pub fn topology(&self) -> &MeshTopology<T> {
        &self.topology
    }

    /// Take the topology
    pub fn into_topology(self) -> MeshTopology<T> {
        self.topology
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::MeshImportError;
    use crate::types::ShapeType;
    use std::io::Cursor;

    const SQUARE: &str = "$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
4
1 0 0 0
2 1 0 0
3 1 1 0
4 0 1 0
$EndNodes
$Elements
6
1 15 2 0 1 1
2 1 2 0 1 1 2
3 1 2 0 1 2 3
4 2 2 0 1 1 2 3
5 2 2 0 1 1 3 4
6 1 2 0 1 4 1
$EndElements
";

    #[test]
    fn test_from_reader() {
        let mesh =
            GmshFile::<f64>::from_reader(&mut Cursor::new(SQUARE), MeshDimensions::planar())
                .unwrap();
        assert_eq!(mesh.header().version, 2.2);
        assert_eq!(mesh.cells().cells_to_vertex_ids(), &[vec![0, 1, 2], vec![0, 2, 3]]);
        assert_eq!(mesh.cells().shape_types(), &[ShapeType::Triangle; 2]);
        let t = mesh.topology();
        assert_eq!(t.vertex_count(), 4);
        assert_eq!(t.face_count(), 5);
        assert_eq!(t.cell_count(), 2);
        assert_eq!(t.coord_dim(), 2);
    }

    #[test]
    fn test_from_reader_in_3d_space() {
        let mesh = GmshFile::<f32>::from_reader(
            &mut Cursor::new(SQUARE),
            MeshDimensions::surface_in_3d(),
        )
        .unwrap();
        assert_eq!(mesh.topology().coord_dim(), 3);
        assert_eq!(mesh.topology().face_vertex_count(), 2);
    }

    #[test]
    fn test_wrong_dimension_has_no_cells() {
        let mesh =
            GmshFile::<f64>::from_reader(&mut Cursor::new(SQUARE), MeshDimensions::volume())
                .unwrap();
        assert_eq!(mesh.topology().cell_count(), 0);
        assert_eq!(mesh.topology().face_count(), 0);
    }

    #[test]
    fn test_missing_elements() {
        let text = SQUARE.split("$Elements").next().unwrap();
        assert!(matches!(
            GmshFile::<f64>::from_reader(&mut Cursor::new(text), MeshDimensions::planar()),
            Err(MeshImportError::HeaderNotFound(t)) if t == "Elements"
        ));
    }
}
