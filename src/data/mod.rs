//! Synthetic datasets for demos and smoke tests.

pub mod synthetic;

pub use synthetic::*;
