#[cfg(feature = "serde")]
mod ron;

#[cfg(feature = "serde")]
pub use ron::{ConvertToSerializable, RONExport, RONImport};
