//! Types

mod ownership;
mod shape;

pub use ownership::Ownership;
pub use shape::{ShapeTable, ShapeType};

use num::Float;
use std::fmt::Debug;
use std::str::FromStr;

/// Scalar type used for vertex coordinates
pub trait RealScalar: Float + FromStr + Debug + Default + Send + Sync + 'static {}

impl<T: Float + FromStr + Debug + Default + Send + Sync + 'static> RealScalar for T {}

/// Entry used in cell-to-face arrays for the slots of cells that have fewer
/// faces than the cell with the most faces
pub const PADDING: isize = -1;
