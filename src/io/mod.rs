//! Input/output helpers.
//!
//! - delimited-text ingest + validation (`ingest`)
//! - predictions/weights/table exports (`export`)
//! - model JSON read/write (`model`)

pub mod export;
pub mod ingest;
pub mod model;

pub use export::*;
pub use ingest::*;
pub use model::*;
