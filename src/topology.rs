//! Face/cell topology

mod cells;
pub mod faces;

pub use cells::CellTable;
pub use faces::{derive, FaceKey, FaceTopology};

use crate::error::{MeshImportError, Result};
#[cfg(feature = "serde")]
use crate::traits::ConvertToSerializable;
use crate::types::{RealScalar, PADDING};
use ndarray::{Array2, ArrayView1};

/// Vertex coordinates and face/cell adjacency of a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshTopology<T: RealScalar> {
    vertex_coords: Array2<T>,
    face_vertex_ids: Array2<usize>,
    cell_face_ids: Array2<isize>,
}

impl<T: RealScalar> MeshTopology<T> {
    /// Create a topology from vertex coordinates and derived faces
    pub fn new(vertex_coords: Array2<T>, faces: FaceTopology) -> Result<Self> {
        Self::from_parts(vertex_coords, faces.face_vertex_ids, faces.cell_face_ids)
    }

    /// Create a topology from its three arrays, checking their shapes and that
    /// every index is in range
    ///
    /// `vertex_coords` has shape `[coord_dim, nvertices]`, `face_vertex_ids` has
    /// shape `[face_vertex_count, nfaces]` and `cell_face_ids` has shape
    /// `[max_faces, ncells]` with unused entries set to [`PADDING`].
    pub fn from_parts(
        vertex_coords: Array2<T>,
        face_vertex_ids: Array2<usize>,
        cell_face_ids: Array2<isize>,
    ) -> Result<Self> {
        let face_vertex_count = face_vertex_ids.nrows();
        if !(2..=3).contains(&face_vertex_count) {
            return Err(MeshImportError::InvalidTopology(format!(
                "faces have {face_vertex_count} vertices"
            )));
        }
        let coord_dim = vertex_coords.nrows();
        if !(face_vertex_count..=3).contains(&coord_dim) {
            return Err(MeshImportError::InvalidTopology(format!(
                "{coord_dim}D vertex coordinates cannot hold faces with {face_vertex_count} vertices"
            )));
        }
        if cell_face_ids.nrows() == 0 && cell_face_ids.ncols() > 0 {
            return Err(MeshImportError::InvalidTopology(
                "cells have no faces".to_string(),
            ));
        }
        let nvertices = vertex_coords.ncols();
        if let Some(v) = face_vertex_ids.iter().find(|v| **v >= nvertices) {
            return Err(MeshImportError::InvalidTopology(format!(
                "face refers to vertex {v} but there are {nvertices} vertices"
            )));
        }
        let nfaces = face_vertex_ids.ncols();
        if let Some(f) = cell_face_ids
            .iter()
            .find(|f| **f != PADDING && (**f < 0 || **f as usize >= nfaces))
        {
            return Err(MeshImportError::InvalidTopology(format!(
                "cell refers to face {f} but there are {nfaces} faces"
            )));
        }
        Ok(Self {
            vertex_coords,
            face_vertex_ids,
            cell_face_ids,
        })
    }

    /// Vertex coordinates, shape `[coord_dim, nvertices]`
    pub fn vertex_coords(&self) -> &Array2<T> {
        &self.vertex_coords
    }

    /// Face vertices, shape `[face_vertex_count, nfaces]`
    pub fn face_vertex_ids(&self) -> &Array2<usize> {
        &self.face_vertex_ids
    }

    /// Cell faces, shape `[max_faces, ncells]`, padded with [`PADDING`]
    pub fn cell_face_ids(&self) -> &Array2<isize> {
        &self.cell_face_ids
    }

    /// Dimension of the vertex coordinates
    pub fn coord_dim(&self) -> usize {
        self.vertex_coords.nrows()
    }

    /// Number of vertices of each face
    pub fn face_vertex_count(&self) -> usize {
        self.face_vertex_ids.nrows()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertex_coords.ncols()
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.face_vertex_ids.ncols()
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.cell_face_ids.ncols()
    }

    /// Coordinates of a vertex
    pub fn vertex(&self, index: usize) -> ArrayView1<'_, T> {
        self.vertex_coords.column(index)
    }

    /// Vertices of a face
    pub fn face_vertices(&self, face: usize) -> ArrayView1<'_, usize> {
        self.face_vertex_ids.column(face)
    }

    /// Faces of a cell, skipping padding
    pub fn cell_faces(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        self.cell_face_ids
            .column(cell)
            .into_iter()
            .filter(|f| **f != PADDING)
            .map(|f| *f as usize)
    }
}

/// Serializable form of a [`MeshTopology`]
#[cfg(feature = "serde")]
#[derive(serde::Serialize, Debug, serde::Deserialize)]
#[serde(bound(
    serialize = "T: serde::Serialize",
    deserialize = "T: serde::de::DeserializeOwned"
))]
pub struct SerializableTopology<T> {
    vertex_coords: (Vec<T>, [usize; 2]),
    face_vertex_ids: (Vec<usize>, [usize; 2]),
    cell_face_ids: (Vec<isize>, [usize; 2]),
}

#[cfg(feature = "serde")]
fn array_to_parts<S: Clone>(a: &Array2<S>) -> (Vec<S>, [usize; 2]) {
    (a.iter().cloned().collect(), [a.nrows(), a.ncols()])
}

#[cfg(feature = "serde")]
fn array_from_parts<S>((data, shape): (Vec<S>, [usize; 2])) -> Result<Array2<S>> {
    Array2::from_shape_vec((shape[0], shape[1]), data)
        .map_err(|e| MeshImportError::InvalidTopology(e.to_string()))
}

#[cfg(feature = "serde")]
impl<T: RealScalar + serde::Serialize + serde::de::DeserializeOwned> ConvertToSerializable
    for MeshTopology<T>
{
    type SerializableType = SerializableTopology<T>;
    fn to_serializable(&self) -> SerializableTopology<T> {
        SerializableTopology {
            vertex_coords: array_to_parts(&self.vertex_coords),
            face_vertex_ids: array_to_parts(&self.face_vertex_ids),
            cell_face_ids: array_to_parts(&self.cell_face_ids),
        }
    }
    fn from_serializable(s: SerializableTopology<T>) -> Result<Self> {
        Self::from_parts(
            array_from_parts(s.vertex_coords)?,
            array_from_parts(s.face_vertex_ids)?,
            array_from_parts(s.cell_face_ids)?,
        )
    }
}
