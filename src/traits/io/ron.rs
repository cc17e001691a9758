//! RON I/O
use crate::error::Result;
use std::fs;
use std::path::Path;

pub trait ConvertToSerializable: Sized {
    //! Convert to/from a serializable type

    /// The serializable type
    type SerializableType: serde::Serialize;
    /// Convert to the serializable type
    fn to_serializable(&self) -> Self::SerializableType;
    /// Convert from the serializable type
    fn from_serializable(s: Self::SerializableType) -> Result<Self>;
}

pub trait RONExport {
    //! Export to RON

    /// Generate the RON string
    fn to_ron_string(&self) -> Result<String>;

    /// Export as RON
    fn export_as_ron(&self, filename: impl AsRef<Path>) -> Result<()> {
        let ron_s = self.to_ron_string()?;
        fs::write(filename, ron_s)?;
        Ok(())
    }
}

pub trait RONImport: Sized {
    //! Import from RON

    /// Create from a RON string
    fn from_ron_string(s: &str) -> Result<Self>;

    /// Import from a RON file
    fn import_from_ron(filename: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(filename)?;
        Self::from_ron_string(&content)
    }
}
