//! Sinusoid model implementation.
//!
//! Kept as small, pure functions so the objective and fitter code stay generic over
//! the sample set they are given.

pub mod model;

pub use model::*;
