//! Error types.
//!
//! - `RegressionError`: deterministic, input-dependent failures of the numerical
//!   core. The core never exits the process; callers decide what is fatal.
//! - `AppError`: message + process exit code for the `linregress` binary.
//!
//! Exit codes:
//! - `2`: usage, input or I/O problems
//! - `3`: no usable data after ingest
//! - `4`: numerical failure (rank deficiency, failed factorization)

use thiserror::Error;

/// Failures reported by the design-matrix builder, the solver, the model and
/// the reporter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("Dimension mismatch ({context}): expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid regularization parameter: {0} (must be finite and >= 0)")]
    InvalidParameter(f64),

    #[error("Model is not fitted: call `fit` before `predict` or `weights`")]
    NotFitted,

    #[error("Design matrix is rank deficient: rank {rank} < {cols} columns (use --lambda > 0)")]
    RankDeficient { rank: usize, cols: usize },

    #[error("Regularized Gram matrix is not positive definite (non-finite input or lambda too small)")]
    NotPositiveDefinite,

    #[error("Empty input: {what} cannot be empty")]
    EmptyInput { what: &'static str },
}

impl RegressionError {
    pub(crate) fn mismatch(context: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            found,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<RegressionError> for AppError {
    fn from(err: RegressionError) -> Self {
        let exit_code = match err {
            RegressionError::RankDeficient { .. } | RegressionError::NotPositiveDefinite => 4,
            _ => 2,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
