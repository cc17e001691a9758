//! Input and output
pub mod gmsh;
#[cfg(feature = "serde")]
mod ron;
