//! Linear regression models.
//!
//! The model owns fitted state; all numerical work is delegated to `crate::math`.

pub mod ridge;

pub use ridge::*;
