//! Errors

use crate::types::ShapeType;
use thiserror::Error;

/// Result type alias using [`MeshImportError`]
pub type Result<T> = std::result::Result<T, MeshImportError>;

/// Errors that can occur while importing a mesh
#[derive(Error, Debug)]
pub enum MeshImportError {
    /// A required section marker is absent from the input
    #[error("no `${0}' header found")]
    HeaderNotFound(String),

    /// The mesh file uses a format this importer cannot read
    #[error("unsupported Gmsh format: {0}")]
    UnsupportedFormat(String),

    /// A row of a section could not be parsed
    #[error("parse error in ${section} section, line {line}: {message}")]
    Parse {
        /// The section being parsed
        section: &'static str,
        /// Line number within the section (1-based, the count line is line 1)
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// The external mesh generator failed or produced no output
    #[error("mesh generation failed: {0}")]
    MeshGeneration(String),

    /// A shape type reached face derivation without being in the recognised set
    #[error("shape {0:?} is not recognised for this mesh")]
    UnknownShape(ShapeType),

    /// A cell was given the wrong number of vertices for its shape
    #[error("{shape:?} cells need {expected} vertices, got {found}")]
    VertexCountMismatch {
        /// The shape of the cell
        shape: ShapeType,
        /// Number of vertices of the shape
        expected: usize,
        /// Number of vertices supplied
        found: usize,
    },

    /// The requested mesh or coordinate dimension is not supported
    #[error("invalid mesh dimensions: {0}")]
    InvalidDimensions(String),

    /// Topology arrays are inconsistent with each other
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON encoding error
    #[cfg(feature = "serde")]
    #[error("RON encoding error: {0}")]
    RonEncode(#[from] ron::Error),

    /// RON decoding error
    #[cfg(feature = "serde")]
    #[error("RON decoding error: {0}")]
    RonDecode(#[from] ron::error::SpannedError),
}

impl MeshImportError {
    /// Create a parse error for a line of a section
    pub(crate) fn parse(section: &'static str, line: usize, message: impl Into<String>) -> Self {
        MeshImportError::Parse {
            section,
            line,
            message: message.into(),
        }
    }
}
