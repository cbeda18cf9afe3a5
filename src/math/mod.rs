//! Numerical core: design matrix construction and the regularized least squares solver.

pub mod design;
pub mod solve;

pub use design::*;
pub use solve::*;
