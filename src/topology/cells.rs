//! Cells as vertex tuples

use crate::error::{MeshImportError, Result};
use crate::types::ShapeType;
use itertools::izip;

/// Cells given by their vertices, each with a shape
///
/// The vertices of each cell are kept in the order they were added. This order
/// determines which faces are derived for the cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellTable {
    cells_to_vertex_ids: Vec<Vec<usize>>,
    shape_types: Vec<ShapeType>,
}

impl CellTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell
    pub fn add_cell(&mut self, vertices: Vec<usize>, shape: ShapeType) -> Result<()> {
        if vertices.len() != shape.vertex_count() {
            return Err(MeshImportError::VertexCountMismatch {
                shape,
                expected: shape.vertex_count(),
                found: vertices.len(),
            });
        }
        self.cells_to_vertex_ids.push(vertices);
        self.shape_types.push(shape);
        Ok(())
    }

    /// Append all the cells of another table
    pub fn extend(&mut self, other: CellTable) {
        self.cells_to_vertex_ids.extend(other.cells_to_vertex_ids);
        self.shape_types.extend(other.shape_types);
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.shape_types.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.shape_types.is_empty()
    }

    /// The vertices of each cell
    pub fn cells_to_vertex_ids(&self) -> &[Vec<usize>] {
        &self.cells_to_vertex_ids
    }

    /// The shape of each cell
    pub fn shape_types(&self) -> &[ShapeType] {
        &self.shape_types
    }

    /// Iterate over the cells and their shapes
    pub fn iter(&self) -> impl Iterator<Item = (&[usize], ShapeType)> {
        izip!(&self.cells_to_vertex_ids, &self.shape_types).map(|(c, s)| (c.as_slice(), *s))
    }

    /// Replace every vertex of every cell using `map`
    pub fn try_map_vertices<F: FnMut(usize) -> Result<usize>>(&self, mut map: F) -> Result<Self> {
        let cells_to_vertex_ids = self
            .cells_to_vertex_ids
            .iter()
            .map(|cell| cell.iter().map(|v| map(*v)).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            cells_to_vertex_ids,
            shape_types: self.shape_types.clone(),
        })
    }
}
