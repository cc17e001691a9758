//! The `$Nodes` section

use crate::error::{MeshImportError, Result};
use crate::topology::CellTable;
use crate::types::RealScalar;
use log::debug;
use ndarray::Array2;
use std::io::BufRead;

/// Vertex coordinates, and a map from Gmsh node IDs to vertex indices
#[derive(Debug, Clone)]
pub struct VertexTable<T: RealScalar> {
    coordinates: Array2<T>,
    id_to_index: Vec<Option<usize>>,
}

impl<T: RealScalar> VertexTable<T> {
    /// Coordinates, shape `[coord_dim, nvertices]`
    pub fn coordinates(&self) -> &Array2<T> {
        &self.coordinates
    }

    /// Take the coordinates
    pub fn into_coordinates(self) -> Array2<T> {
        self.coordinates
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.coordinates.ncols()
    }

    /// The vertex index of a node ID, if the ID appears in the file
    pub fn index_of(&self, id: usize) -> Option<usize> {
        self.id_to_index.get(id).copied().flatten()
    }

    /// Replace the node IDs of each cell with vertex indices
    pub fn translate(&self, cells: &CellTable) -> Result<CellTable> {
        cells.try_map_vertices(|id| {
            self.index_of(id).ok_or_else(|| {
                MeshImportError::parse("Elements", 0, format!("element refers to unknown node {id}"))
            })
        })
    }
}

fn parse_field<S: std::str::FromStr>(field: Option<&str>, line: usize, what: &str) -> Result<S> {
    let field =
        field.ok_or_else(|| MeshImportError::parse("Nodes", line, format!("missing {what}")))?;
    field
        .parse()
        .map_err(|_| MeshImportError::parse("Nodes", line, format!("invalid {what} `{field}`")))
}

/// Read the content of a `$Nodes` section
///
/// Each row holds a node ID followed by three coordinates, of which the first
/// `coord_dim` are kept. Vertex indices follow the order of the rows.
pub fn build<T: RealScalar, R: BufRead>(section: R, coord_dim: usize) -> Result<VertexTable<T>> {
    if !(1..=3).contains(&coord_dim) {
        return Err(MeshImportError::InvalidDimensions(format!(
            "cannot read {coord_dim}D coordinates"
        )));
    }
    let mut ids = vec![];
    let mut coords = vec![];
    let mut lines = section.lines().enumerate();

    // The first line is the node count
    for (n, line) in lines.by_ref() {
        let line = line?;
        if !line.trim().is_empty() {
            parse_field::<usize>(Some(line.trim()), n + 1, "node count")?;
            break;
        }
    }

    for (n, line) in lines {
        let line = line?;
        let mut fields = line.split_whitespace();
        let Some(id) = fields.next() else {
            continue;
        };
        ids.push((parse_field::<usize>(Some(id), n + 1, "node ID")?, n + 1));
        for _ in 0..coord_dim {
            coords.push(parse_field::<T>(fields.next(), n + 1, "coordinate")?);
        }
    }

    let nvertices = ids.len();
    let mut id_to_index: Vec<Option<usize>> = vec![];
    if let Some(&(max_id, line)) = ids.iter().max_by_key(|(id, _)| *id) {
        let too_large =
            || MeshImportError::parse("Nodes", line, format!("node ID {max_id} is too large"));
        let size = max_id.checked_add(1).ok_or_else(too_large)?;
        id_to_index.try_reserve_exact(size).map_err(|_| too_large())?;
        id_to_index.resize(size, None);
    }
    for (index, (id, line)) in ids.iter().enumerate() {
        if id_to_index[*id].replace(index).is_some() {
            return Err(MeshImportError::parse(
                "Nodes",
                *line,
                format!("node {id} appears more than once"),
            ));
        }
    }

    let coordinates = Array2::from_shape_fn((coord_dim, nvertices), |(i, j)| {
        coords[j * coord_dim + i]
    });
    debug!("Read {nvertices} vertices");
    Ok(VertexTable {
        coordinates,
        id_to_index,
    })
}
