//! The `$MeshFormat` header

use super::section::isolate;
use crate::error::{MeshImportError, Result};
use std::io::{BufRead, Seek};

/// Mesh format information from the `$MeshFormat` section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetaHeader {
    /// Format version
    pub version: f64,
    /// File type (0 for ASCII, 1 for binary)
    pub file_type: f64,
    /// Size of floating point numbers in the file
    pub data_size: f64,
}

impl MetaHeader {
    /// Parse the first line of a `$MeshFormat` section
    pub fn parse(line: &str) -> Result<Self> {
        let values = line
            .split_whitespace()
            .take(3)
            .map(|v| {
                v.parse::<f64>().map_err(|_| {
                    MeshImportError::parse("MeshFormat", 1, format!("`{v}` is not a number"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let [version, file_type, data_size] = values[..] else {
            return Err(MeshImportError::parse(
                "MeshFormat",
                1,
                "expected `<version> <file-type> <data-size>`",
            ));
        };
        Ok(Self {
            version,
            file_type,
            data_size,
        })
    }

    /// Check that this importer can read files with this header
    ///
    /// Only ASCII files of version 2.x are supported.
    pub fn check_supported(&self) -> Result<()> {
        if self.version < 2.0 {
            return Err(MeshImportError::UnsupportedFormat(format!(
                "version {} is older than 2",
                self.version
            )));
        }
        if self.version >= 3.0 {
            return Err(MeshImportError::UnsupportedFormat(format!(
                "version {} is not supported, write the mesh with `-format msh2`",
                self.version
            )));
        }
        if self.file_type != 0.0 {
            return Err(MeshImportError::UnsupportedFormat(String::from(
                "binary mesh files are not supported",
            )));
        }
        Ok(())
    }
}

/// Read the `$MeshFormat` header of a stream and check that it is supported
///
/// The position of the stream is unchanged.
pub fn read_meta_header<R: BufRead + Seek>(stream: &mut R) -> Result<MetaHeader> {
    let section = isolate("MeshFormat", stream)?;
    let first_line = section.as_bytes().lines().next().transpose()?.unwrap_or_default();
    let header = MetaHeader::parse(&first_line)?;
    header.check_supported()?;
    Ok(header)
}
