//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the parameter vector (`SineParams`) and observed data (`SampleSet`)
//! - fitter options and state (`NewtonOptions`, `InversePolicy`, `FitStatus`)
//! - fit outputs and the export schema (`FitOutcome`, `FitFile`)

pub mod types;

pub use types::*;
