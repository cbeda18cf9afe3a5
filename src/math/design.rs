//! Design matrix construction.
//!
//! The intercept is modeled with the "ones trick": a constant column is appended
//! as the **last** column of `X`, so the last fitted coefficient is the offset.
//! Prediction code relies on this ordering.

use nalgebra::DMatrix;

use crate::error::RegressionError;

/// Append a column of ones as the last column of `x`.
///
/// Not idempotent: augmenting twice yields two ones-columns.
pub fn augment(x: &DMatrix<f64>) -> Result<DMatrix<f64>, RegressionError> {
    if x.nrows() == 0 {
        return Err(RegressionError::EmptyInput {
            what: "feature matrix",
        });
    }
    let p = x.ncols();
    Ok(x.clone().insert_column(p, 1.0))
}
