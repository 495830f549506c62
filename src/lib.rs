//! `sine-newton` library crate.
//!
//! Fits `y = A·sin(W·t + Z)` to sampled data with a pseudo-Newton iteration whose
//! curvature is the outer product of the gradient with itself.
//!
//! The binary (`sinefit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the fitter can be driven directly with caller-supplied samples

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
