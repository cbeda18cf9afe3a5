//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run configuration (`FitConfig`, `PredictConfig`, `GenerateConfig`, `CsvOptions`)
//! - fit outputs (`FitQuality`, `Residual`)
//! - the serializable model file (`ModelFile`)

pub mod types;

pub use types::*;
