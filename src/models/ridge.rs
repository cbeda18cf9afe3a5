//! Ridge regression model.
//!
//! The model is an explicit two-state machine:
//!
//! - `Unfitted`: constructed with a fixed penalty `λ`, no coefficients
//! - `Fitted`: owns `β` and whether an intercept column was appended
//!
//! `fit` is the only transition and may be called again to replace the fitted
//! state. The new state is computed completely before it is swapped in, so a
//! failing `fit` leaves the previous coefficients untouched.
//!
//! Coefficient layout: with an intercept, `β = [slope_1, ..., slope_p, offset]`.

use nalgebra::{DMatrix, DVector};

use crate::error::RegressionError;
use crate::math::{augment, solve_ridge, validate_lambda};

#[derive(Debug, Clone, PartialEq)]
enum ModelState {
    Unfitted,
    Fitted { weights: DVector<f64>, intercept: bool },
}

/// Linear model fitted by (ridge-)regularized least squares.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeRegression {
    lambda: f64,
    state: ModelState,
}

impl RidgeRegression {
    /// Create an unfitted model. `lambda` is validated when fitting.
    pub fn new(lambda: f64) -> Self {
        Self {
            lambda,
            state: ModelState::Unfitted,
        }
    }

    /// Ordinary least squares (`λ = 0`).
    pub fn ols() -> Self {
        Self::new(0.0)
    }

    /// Rebuild a fitted model from previously computed coefficients.
    pub fn from_weights(lambda: f64, weights: DVector<f64>, intercept: bool) -> Result<Self, RegressionError> {
        validate_lambda(lambda)?;
        if intercept && weights.is_empty() {
            return Err(RegressionError::EmptyInput {
                what: "weights (intercept requires at least one coefficient)",
            });
        }
        Ok(Self {
            lambda,
            state: ModelState::Fitted { weights, intercept },
        })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.state, ModelState::Fitted { .. })
    }

    /// Fit the model to `x` (n × p) and `y` (length n).
    pub fn fit(&mut self, x: &DMatrix<f64>, y: &DVector<f64>, add_intercept: bool) -> Result<(), RegressionError> {
        if x.nrows() != y.len() {
            return Err(RegressionError::mismatch("rows(X) vs len(y)", x.nrows(), y.len()));
        }
        validate_lambda(self.lambda)?;

        let weights = if add_intercept {
            solve_ridge(&augment(x)?, y, self.lambda)?
        } else {
            solve_ridge(x, y, self.lambda)?
        };

        self.state = ModelState::Fitted {
            weights,
            intercept: add_intercept,
        };
        Ok(())
    }

    /// Predict one value per row of `x`.
    pub fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, RegressionError> {
        let ModelState::Fitted { weights, intercept } = &self.state else {
            return Err(RegressionError::NotFitted);
        };

        let p = n_slopes(weights, *intercept);
        if x.ncols() != p {
            return Err(RegressionError::mismatch("cols(X) vs fitted features", p, x.ncols()));
        }

        let slope = weights.rows(0, p);
        let mut out = x * slope;
        if *intercept {
            out.add_scalar_mut(weights[p]);
        }
        Ok(out)
    }

    /// Full coefficient vector (intercept last when present).
    pub fn weights(&self) -> Result<&DVector<f64>, RegressionError> {
        match &self.state {
            ModelState::Fitted { weights, .. } => Ok(weights),
            ModelState::Unfitted => Err(RegressionError::NotFitted),
        }
    }

    pub fn has_intercept(&self) -> Result<bool, RegressionError> {
        match &self.state {
            ModelState::Fitted { intercept, .. } => Ok(*intercept),
            ModelState::Unfitted => Err(RegressionError::NotFitted),
        }
    }

    /// Offset term, if the model was fitted with an intercept.
    pub fn intercept(&self) -> Result<Option<f64>, RegressionError> {
        match &self.state {
            ModelState::Fitted { weights, intercept: true } => Ok(weights.iter().last().copied()),
            ModelState::Fitted { .. } => Ok(None),
            ModelState::Unfitted => Err(RegressionError::NotFitted),
        }
    }

    /// Per-feature slopes (β without the intercept).
    pub fn coefficients(&self) -> Result<&[f64], RegressionError> {
        match &self.state {
            ModelState::Fitted { weights, intercept } => {
                let p = n_slopes(weights, *intercept);
                Ok(&weights.as_slice()[..p])
            }
            ModelState::Unfitted => Err(RegressionError::NotFitted),
        }
    }

    /// Number of input features expected by `predict`.
    pub fn n_features(&self) -> Result<usize, RegressionError> {
        self.coefficients().map(<[f64]>::len)
    }
}

fn n_slopes(weights: &DVector<f64>, intercept: bool) -> usize {
    if intercept { weights.len() - 1 } else { weights.len() }
}
