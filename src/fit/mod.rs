//! Curve fitting.
//!
//! Responsibilities:
//!
//! - MSE objective and its analytic gradient
//! - the pseudo-Newton step and driver
//! - multi-start scans over the initial angular frequency

pub mod newton;
pub mod objective;
pub mod scan;

pub use newton::*;
pub use objective::*;
pub use scan::*;
