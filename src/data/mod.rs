//! Input data: synthetic samples.

pub mod sample;

pub use sample::*;
