//! Face derivation and deduplication

use super::CellTable;
use crate::error::{MeshImportError, Result};
use crate::types::{ShapeTable, PADDING};
use itertools::izip;
use log::debug;
use ndarray::Array2;
use std::collections::{hash_map::Entry, HashMap};

/// Largest number of vertices a face can have
pub const MAX_FACE_VERTICES: usize = 3;

/// Canonical identity of a face: its vertices in ascending order
///
/// Two cells that share a face produce the same key whichever way round they
/// traverse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceKey([usize; MAX_FACE_VERTICES]);

impl FaceKey {
    /// Create the key of a face. `face` must have at most [`MAX_FACE_VERTICES`] vertices
    pub fn new(face: &[usize]) -> Self {
        let mut key = [usize::MAX; MAX_FACE_VERTICES];
        key[..face.len()].copy_from_slice(face);
        key[..face.len()].sort_unstable();
        Self(key)
    }
}

/// Face-to-vertex and cell-to-face arrays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceTopology {
    /// `face_vertex_ids[[i, f]]` is a vertex of face `f`. The vertices of each
    /// face are stored in the reverse of the order they were derived in
    pub face_vertex_ids: Array2<usize>,
    /// `cell_face_ids[[i, c]]` is a face of cell `c`, or [`PADDING`]. The faces of
    /// each cell are stored in the reverse of the order they were derived in, so
    /// padding comes first
    pub cell_face_ids: Array2<isize>,
}

impl FaceTopology {
    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.face_vertex_ids.ncols()
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.cell_face_ids.ncols()
    }

    /// Number of faces of the cell with the most faces
    pub fn max_faces(&self) -> usize {
        self.cell_face_ids.nrows()
    }
}

/// The vertices of face `index` of a cell
///
/// Faces are windows of `face_vertex_count` consecutive vertices, wrapping
/// round the end of the cell. This gives the faces of triangles, quadrangles
/// and tetrahedra when the cell vertices follow Gmsh's ordering. The winding of
/// the cell is not checked: cells with inconsistent vertex ordering get wrong
/// faces.
pub fn cell_face(cell: &[usize], face_vertex_count: usize, index: usize) -> Vec<usize> {
    (0..face_vertex_count)
        .map(|j| cell[(index + j) % cell.len()])
        .collect()
}

/// Derive the faces of every cell and deduplicate faces shared between cells
///
/// Faces are numbered in the order they are first found, taking cells in
/// order. A face shared by two cells is stored once, with the vertex order of
/// the first cell that contains it.
pub fn derive(
    cells: &CellTable,
    face_vertex_count: usize,
    shapes: &ShapeTable,
) -> Result<FaceTopology> {
    if !(2..=MAX_FACE_VERTICES).contains(&face_vertex_count) {
        return Err(MeshImportError::InvalidDimensions(format!(
            "faces must have 2 or 3 vertices, not {face_vertex_count}"
        )));
    }
    let faces_per_cell = cells
        .shape_types()
        .iter()
        .map(|s| {
            shapes
                .faces_per_shape(*s)
                .ok_or(MeshImportError::UnknownShape(*s))
        })
        .collect::<Result<Vec<_>>>()?;
    let max_faces = faces_per_cell.iter().copied().max().unwrap_or(0);
    let ncells = cells.cell_count();

    // Row-major [cell, slot] and [face, vertex] while building
    let mut cell_faces = vec![PADDING; ncells * max_faces];
    let mut unique_faces = Vec::<usize>::new();
    let mut face_indices = HashMap::<FaceKey, usize>::new();

    for (cell_index, (cell, nfaces)) in izip!(cells.cells_to_vertex_ids(), &faces_per_cell).enumerate()
    {
        for slot in 0..*nfaces {
            let face = cell_face(cell, face_vertex_count, slot);
            let next_index = face_indices.len();
            let face_index = match face_indices.entry(FaceKey::new(&face)) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    unique_faces.extend_from_slice(&face);
                    *e.insert(next_index)
                }
            };
            cell_faces[cell_index * max_faces + slot] = face_index as isize;
        }
    }

    let nfaces = face_indices.len();
    debug!("Derived {nfaces} unique faces for {ncells} cells");

    let face_vertex_ids = Array2::from_shape_fn((face_vertex_count, nfaces), |(i, f)| {
        unique_faces[f * face_vertex_count + face_vertex_count - 1 - i]
    });
    let cell_face_ids = Array2::from_shape_fn((max_faces, ncells), |(i, c)| {
        cell_faces[c * max_faces + max_faces - 1 - i]
    });

    Ok(FaceTopology {
        face_vertex_ids,
        cell_face_ids,
    })
}
