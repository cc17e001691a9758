//! Import options

use crate::error::{MeshImportError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Topological and coordinate dimension of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshDimensions {
    dimension: usize,
    coord_dim: usize,
}

impl MeshDimensions {
    /// Create new dimensions
    ///
    /// `dimension` must be 2 or 3 and `coord_dim` must be between `dimension` and 3.
    pub fn new(dimension: usize, coord_dim: usize) -> Result<Self> {
        if !(2..=3).contains(&dimension) || !(dimension..=3).contains(&coord_dim) {
            return Err(MeshImportError::InvalidDimensions(format!(
                "a {dimension}D mesh cannot have {coord_dim}D coordinates"
            )));
        }
        Ok(Self {
            dimension,
            coord_dim,
        })
    }

    /// A 2D mesh in the plane
    pub fn planar() -> Self {
        Self {
            dimension: 2,
            coord_dim: 2,
        }
    }

    /// A 2D mesh in 3D space
    pub fn surface_in_3d() -> Self {
        Self {
            dimension: 2,
            coord_dim: 3,
        }
    }

    /// A 3D mesh
    pub fn volume() -> Self {
        Self {
            dimension: 3,
            coord_dim: 3,
        }
    }

    /// Topological dimension. This is also the number of vertices of each face
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of coordinates of each vertex
    pub fn coord_dim(&self) -> usize {
        self.coord_dim
    }
}

/// Options for running the Gmsh mesh generator
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GmshOptions {
    /// The Gmsh executable
    pub executable: PathBuf,
    /// Gmsh verbosity level (`-v`)
    pub verbosity: u32,
    /// Output format (`-format`)
    pub format: String,
    /// Number of partitions to split the mesh into (`-part`)
    pub partitions: Option<usize>,
    /// How long Gmsh may run before it is killed
    pub timeout: Duration,
}

impl Default for GmshOptions {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("gmsh"),
            verbosity: 0,
            format: String::from("msh2"),
            partitions: None,
            timeout: Duration::from_secs(120),
        }
    }
}

impl GmshOptions {
    /// Set the Gmsh executable
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Set the verbosity level
    pub fn with_verbosity(mut self, verbosity: u32) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the number of partitions
    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = Some(partitions);
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Command line flags passed to Gmsh before the output file
    pub fn flags(&self, dimensions: MeshDimensions) -> Vec<String> {
        let mut flags = vec![
            format!("-{}", dimensions.dimension()),
            String::from("-v"),
            self.verbosity.to_string(),
        ];
        if let Some(n) = self.partitions {
            flags.push(String::from("-part"));
            flags.push(n.to_string());
        }
        flags.push(String::from("-format"));
        flags.push(self.format.clone());
        flags
    }

    /// Read options from a RON string. Missing fields take their default values
    #[cfg(feature = "serde")]
    pub fn from_ron_str(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dimensions() {
        assert_eq!(MeshDimensions::new(2, 2).unwrap(), MeshDimensions::planar());
        assert_eq!(
            MeshDimensions::new(2, 3).unwrap(),
            MeshDimensions::surface_in_3d()
        );
        assert_eq!(MeshDimensions::new(3, 3).unwrap(), MeshDimensions::volume());
        assert!(MeshDimensions::new(3, 2).is_err());
        assert!(MeshDimensions::new(1, 1).is_err());
        assert!(MeshDimensions::new(2, 4).is_err());
    }

    #[test]
    fn test_flags() {
        let options = GmshOptions::default();
        assert_eq!(
            options.flags(MeshDimensions::planar()),
            vec!["-2", "-v", "0", "-format", "msh2"]
        );
        let options = options.with_partitions(4).with_verbosity(2);
        assert_eq!(
            options.flags(MeshDimensions::volume()),
            vec!["-3", "-v", "2", "-part", "4", "-format", "msh2"]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_options_from_ron() {
        let options = GmshOptions::from_ron_str("(executable: \"/opt/gmsh/bin/gmsh\", partitions: Some(3))")
            .unwrap();
        assert_eq!(options.executable, PathBuf::from("/opt/gmsh/bin/gmsh"));
        assert_eq!(options.partitions, Some(3));
        assert_eq!(options.format, "msh2");
        assert_eq!(options.timeout, Duration::from_secs(120));
    }
}
