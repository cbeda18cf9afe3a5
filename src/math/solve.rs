//! Regularized least squares solver.
//!
//! We solve
//!
//! ```text
//! minimize ‖y - Xβ‖² + λ‖β‖²
//! ```
//!
//! through the normal equations `(λI + XᵀX) β = Xᵀy`.
//!
//! Implementation choices:
//! - `λ > 0`: the regularized Gram matrix is strictly positive definite for any
//!   real `X` (even rank-deficient), so we factorize it with Cholesky.
//! - `λ = 0`: forming `XᵀX` squares the condition number, so we apply
//!   Householder QR to `X` directly and back-substitute `Rβ = Qᵀy`.
//! - Rank-deficient OLS is rejected with `RankDeficient` instead of returning
//!   an unstable solution. `m > n` is always rank deficient.
//! - The penalty applies uniformly to every column, including an appended
//!   intercept column.
//!
//! Factorizations are locals of `solve_ridge`; nothing is cached between calls.

use nalgebra::{Cholesky, DMatrix, DVector};

use crate::error::RegressionError;

/// Check that `lambda` is a usable ridge penalty.
pub fn validate_lambda(lambda: f64) -> Result<(), RegressionError> {
    if lambda.is_finite() && lambda >= 0.0 {
        Ok(())
    } else {
        Err(RegressionError::InvalidParameter(lambda))
    }
}

/// Solve the (ridge-)regularized least squares problem for `β` (length `cols(x)`).
pub fn solve_ridge(x: &DMatrix<f64>, y: &DVector<f64>, lambda: f64) -> Result<DVector<f64>, RegressionError> {
    let (n, m) = x.shape();
    if n != y.len() {
        return Err(RegressionError::mismatch("rows(X) vs len(y)", n, y.len()));
    }
    validate_lambda(lambda)?;
    if n == 0 {
        return Err(RegressionError::EmptyInput { what: "design matrix" });
    }
    if m == 0 {
        return Ok(DVector::zeros(0));
    }

    if lambda > 0.0 {
        log::debug!("solving {n}x{m} ridge system (lambda={lambda}) via Cholesky");
        solve_cholesky(x, y, lambda)
    } else {
        log::debug!("solving {n}x{m} least squares system via Householder QR");
        solve_householder_qr(x, y)
    }
}

fn solve_cholesky(x: &DMatrix<f64>, y: &DVector<f64>, lambda: f64) -> Result<DVector<f64>, RegressionError> {
    let mut gram = x.tr_mul(x);
    for i in 0..gram.nrows() {
        gram[(i, i)] += lambda;
    }
    let rhs = x.tr_mul(y);

    let chol = Cholesky::new(gram).ok_or(RegressionError::NotPositiveDefinite)?;
    Ok(chol.solve(&rhs))
}

fn solve_householder_qr(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
    let (n, m) = x.shape();
    if m > n {
        // rank(X) <= n < m
        return Err(RegressionError::RankDeficient { rank: n, cols: m });
    }

    let qr = x.clone().qr();
    let r = qr.r();

    let rank = numerical_rank(&r, n.max(m));
    if rank < m {
        return Err(RegressionError::RankDeficient { rank, cols: m });
    }

    let qty = qr.q().tr_mul(y);
    r.solve_upper_triangular(&qty)
        .ok_or(RegressionError::RankDeficient { rank, cols: m })
}

/// Count diagonal entries of `R` that are significant relative to the largest one.
fn numerical_rank(r: &DMatrix<f64>, dim: usize) -> usize {
    let k = r.nrows().min(r.ncols());
    let diag_max = (0..k).map(|i| r[(i, i)].abs()).fold(0.0, f64::max);
    let tol = dim as f64 * f64::EPSILON * diag_max;
    (0..k).filter(|&i| r[(i, i)].abs() > tol).count()
}
