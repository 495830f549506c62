//! Mathematical utilities: curvature inversion and regular grids.

pub mod grid;
pub mod linalg;

pub use grid::*;
pub use linalg::*;
