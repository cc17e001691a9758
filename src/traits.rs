//! Traits

mod io;
mod mesh;

#[cfg(feature = "serde")]
pub use io::{ConvertToSerializable, RONExport, RONImport};
pub use mesh::MeshConstructor;
