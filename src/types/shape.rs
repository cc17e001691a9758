//! Cell shapes

/// A cell shape that can be read from a Gmsh file
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeType {
    /// A three-vertex triangle
    Triangle,
    /// A four-vertex quadrangle
    Quadrangle,
    /// A four-vertex tetrahedron
    Tetrahedron,
}

impl ShapeType {
    /// Interpret a Gmsh element type code
    pub fn from_gmsh(code: i64) -> Option<Self> {
        match code {
            2 => Some(ShapeType::Triangle),
            3 => Some(ShapeType::Quadrangle),
            4 => Some(ShapeType::Tetrahedron),
            _ => None,
        }
    }

    /// The Gmsh element type code
    pub fn gmsh_code(self) -> i64 {
        match self {
            ShapeType::Triangle => 2,
            ShapeType::Quadrangle => 3,
            ShapeType::Tetrahedron => 4,
        }
    }

    /// Number of vertices
    pub fn vertex_count(self) -> usize {
        match self {
            ShapeType::Triangle => 3,
            ShapeType::Quadrangle => 4,
            ShapeType::Tetrahedron => 4,
        }
    }

    /// Number of faces (sides in 2D)
    pub fn face_count(self) -> usize {
        match self {
            ShapeType::Triangle => 3,
            ShapeType::Quadrangle => 4,
            ShapeType::Tetrahedron => 4,
        }
    }
}

/// The shapes that are read as cells for a mesh
///
/// Elements of any other type (points and lines in a surface mesh, or
/// triangles on the boundary of a volume mesh) are not cells and are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeTable {
    shapes: Vec<ShapeType>,
}

impl ShapeTable {
    /// The cell shapes of a mesh of the given topological dimension
    pub fn for_dimension(dimension: usize) -> Self {
        if dimension == 2 {
            Self::from_shapes(&[ShapeType::Triangle, ShapeType::Quadrangle])
        } else {
            Self::from_shapes(&[ShapeType::Tetrahedron])
        }
    }

    /// Create a table containing the given shapes
    pub fn from_shapes(shapes: &[ShapeType]) -> Self {
        let mut shapes = shapes.to_vec();
        shapes.sort();
        shapes.dedup();
        Self { shapes }
    }

    /// The shape a Gmsh element type code is read as, if it is a cell of this mesh
    pub fn recognise(&self, code: i64) -> Option<ShapeType> {
        ShapeType::from_gmsh(code).filter(|s| self.contains(*s))
    }

    /// Does the table contain this shape?
    pub fn contains(&self, shape: ShapeType) -> bool {
        self.shapes.contains(&shape)
    }

    /// Number of faces of a shape, if the shape is in this table
    pub fn faces_per_shape(&self, shape: ShapeType) -> Option<usize> {
        if self.contains(shape) {
            Some(shape.face_count())
        } else {
            None
        }
    }

    /// The shapes in the table
    pub fn shapes(&self) -> &[ShapeType] {
        &self.shapes
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_gmsh_codes() {
        for shape in [
            ShapeType::Triangle,
            ShapeType::Quadrangle,
            ShapeType::Tetrahedron,
        ] {
            assert_eq!(ShapeType::from_gmsh(shape.gmsh_code()), Some(shape));
        }
        assert_eq!(ShapeType::from_gmsh(1), None);
        assert_eq!(ShapeType::from_gmsh(15), None);
    }

    #[test]
    fn test_table_for_surface() {
        let t = ShapeTable::for_dimension(2);
        assert_eq!(t.recognise(2), Some(ShapeType::Triangle));
        assert_eq!(t.recognise(3), Some(ShapeType::Quadrangle));
        assert_eq!(t.recognise(4), None);
        assert_eq!(t.recognise(1), None);
        assert_eq!(t.faces_per_shape(ShapeType::Quadrangle), Some(4));
        assert_eq!(t.faces_per_shape(ShapeType::Tetrahedron), None);
    }

    #[test]
    fn test_table_for_volume() {
        let t = ShapeTable::for_dimension(3);
        assert_eq!(t.recognise(4), Some(ShapeType::Tetrahedron));
        assert_eq!(t.recognise(2), None);
        assert_eq!(t.shapes(), &[ShapeType::Tetrahedron]);
    }
}
