//! Partitioned meshes

use super::elements::{parse_partitioned, ElementRecords};
use super::{
    build_vertices, isolate, open_resolved, read_meta_header, GmshOptions, MeshDimensions,
    MeshSource, MetaHeader,
};
use crate::error::Result;
use crate::topology::{derive, CellTable, MeshTopology};
use crate::types::{Ownership, RealScalar, ShapeTable};
use itertools::izip;
use log::info;
#[cfg(feature = "mpi")]
use mpi::traits::Communicator;
use ndarray::{Array2, Axis};
use std::io::{BufRead, Seek};

/// Bookkeeping for one cell of a partitioned mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartitionRecord {
    /// Index of the cell in the local topology
    pub local_index: usize,
    /// Element ID of the cell in the file
    pub file_id: usize,
    /// Global index of the cell, the same on every partition
    pub global_id: usize,
    /// The partition that owns the cell
    pub partition: usize,
    /// Ownership of the cell
    pub ownership: Ownership,
}

/// The part of a partitioned Gmsh mesh needed by one partition
///
/// The local topology holds the owned cells followed by the ghost cells, and
/// only the vertices of those cells. No data is exchanged between partitions.
#[derive(Debug, Clone)]
pub struct PartitionedGmshFile<T: RealScalar> {
    header: MetaHeader,
    dimensions: MeshDimensions,
    local_partition: usize,
    records: Vec<PartitionRecord>,
    vertex_indices: Vec<usize>,
    cells: CellTable,
    topology: MeshTopology<T>,
}

/// Keep only the vertices used by `cells`, numbered in the order they are first used
fn compact<T: RealScalar>(
    coordinates: &Array2<T>,
    cells: &CellTable,
) -> Result<(Array2<T>, CellTable, Vec<usize>)> {
    let mut new_index = vec![None; coordinates.ncols()];
    let mut kept = vec![];
    let cells = cells.try_map_vertices(|v| {
        Ok(*new_index[v].get_or_insert_with(|| {
            kept.push(v);
            kept.len() - 1
        }))
    })?;
    Ok((coordinates.select(Axis(1), &kept), cells, kept))
}

impl<T: RealScalar> PartitionedGmshFile<T> {
    /// Read the part of a mesh needed by the partition `local_partition`
    ///
    /// Partitions are numbered from 1. If `options` asks for partitions, Gmsh
    /// is run with `-part`.
    pub fn open(
        source: impl Into<MeshSource>,
        dimensions: MeshDimensions,
        local_partition: usize,
        options: &GmshOptions,
    ) -> Result<Self> {
        let source = source.into();
        let (_resolved, mut reader) = open_resolved(&source, dimensions, options)?;
        Self::from_reader(&mut reader, dimensions, local_partition)
    }

    /// Read the part of a mesh needed by the partition of this process
    ///
    /// The partition is the rank plus one, and a geometry is split into as
    /// many partitions as there are processes.
    #[cfg(feature = "mpi")]
    pub fn open_on_comm<C: Communicator>(
        comm: &C,
        source: impl Into<MeshSource>,
        dimensions: MeshDimensions,
        options: &GmshOptions,
    ) -> Result<Self> {
        let options = options.clone().with_partitions(comm.size() as usize);
        Self::open(source, dimensions, comm.rank() as usize + 1, &options)
    }

    /// Read the part of a mesh needed by `local_partition` from a stream
    pub fn from_reader<R: BufRead + Seek>(
        reader: &mut R,
        dimensions: MeshDimensions,
        local_partition: usize,
    ) -> Result<Self> {
        let header = read_meta_header(reader)?;
        let shapes = ShapeTable::for_dimension(dimensions.dimension());
        let vertices = build_vertices::<T, _>(isolate("Nodes", reader)?, dimensions.coord_dim())?;
        let parsed = parse_partitioned(isolate("Elements", reader)?, &shapes, local_partition)?;

        let mut records = vec![];
        let mut cells = CellTable::new();
        for (bundle, ghost) in [(parsed.owned, false), (parsed.ghosts, true)] {
            let ElementRecords {
                cells: bundle_cells,
                file_ids,
                global_ids,
                owners,
            } = bundle;
            for (file_id, global_id, owner) in izip!(file_ids, global_ids, owners) {
                records.push(PartitionRecord {
                    local_index: records.len(),
                    file_id,
                    global_id,
                    partition: owner,
                    ownership: if ghost {
                        Ownership::Ghost(owner)
                    } else {
                        Ownership::Owned
                    },
                });
            }
            cells.extend(bundle_cells);
        }

        let cells = vertices.translate(&cells)?;
        let (coordinates, cells, vertex_indices) = compact(vertices.coordinates(), &cells)?;
        let faces = derive(&cells, dimensions.dimension(), &shapes)?;
        let topology = MeshTopology::new(coordinates, faces)?;
        info!(
            "Imported partition {local_partition}: {} vertices, {} faces, {} cells ({} ghosts)",
            topology.vertex_count(),
            topology.face_count(),
            topology.cell_count(),
            records.iter().filter(|r| r.ownership.is_ghost()).count()
        );
        Ok(Self {
            header,
            dimensions,
            local_partition,
            records,
            vertex_indices,
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

    /// The local partition
    pub fn local_partition(&self) -> usize {
        self.local_partition
    }

    /// One record for each local cell, in local order
    pub fn records(&self) -> &[PartitionRecord] {
        &self.records
    }

    /// Number of cells owned by the local partition
    pub fn owned_cell_count(&self) -> usize {
        self.records.iter().filter(|r| !r.ownership.is_ghost()).count()
    }

    /// Number of ghost cells
    pub fn ghost_cell_count(&self) -> usize {
        self.records.len() - self.owned_cell_count()
    }

    /// For each local vertex, its index among all the vertices in the file
    pub fn vertex_indices(&self) -> &[usize] {
        &self.vertex_indices
    }

    /// The local cells, as local vertex indices
    pub fn cells(&self) -> &CellTable {
        &self.cells
    }

    /// The local topology
    pub fn topology(&self) -> &MeshTopology<T> {
        &self.topology
    }

    /// Take the local topology
    pub fn into_topology(self) -> MeshTopology<T> {
        self.topology
    }
}
