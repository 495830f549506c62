//! Input/output helpers.
//!
//! - fit JSON read/write
//! - samples and iteration-trace CSV exports

pub mod export;

pub use export::*;
