//! Reporting utilities: error metrics, residuals and rankings.

use crate::domain::{FitQuality, Residual};
use crate::error::RegressionError;

pub mod format;

pub use format::*;

/// Largest residuals on each side (top-N each).
#[derive(Debug, Clone, Default)]
pub struct Rankings {
    /// Positive residuals: the model predicts too low.
    pub under: Vec<Residual>,
    /// Negative residuals: the model predicts too high.
    pub over: Vec<Residual>,
}

/// Root-mean-squared error `sqrt(mean((y_true - y_pred)^2))`.
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> Result<f64, RegressionError> {
    check_lengths(y_true, y_pred)?;
    let sse = sum_squared_errors(y_true, y_pred);
    Ok((sse / y_true.len() as f64).sqrt())
}

/// SSE, RMSE, MAE and R² in one pass over the data.
pub fn fit_quality(y_true: &[f64], y_pred: &[f64]) -> Result<FitQuality, RegressionError> {
    check_lengths(y_true, y_pred)?;
    let n = y_true.len();

    let sse = sum_squared_errors(y_true, y_pred);
    let mae = y_true
        .iter()
        .zip(y_pred)
        .map(|(a, b)| (a - b).abs())
        .sum::<f64>()
        / n as f64;

    let mean = y_true.iter().sum::<f64>() / n as f64;
    let sst: f64 = y_true.iter().map(|v| (v - mean).powi(2)).sum();
    let r_squared = (sst > 0.0).then(|| 1.0 - sse / sst);

    Ok(FitQuality {
        n,
        sse,
        rmse: (sse / n as f64).sqrt(),
        mae,
        r_squared,
    })
}

/// Pair observed and fitted values row by row.
pub fn compute_residuals(y_true: &[f64], y_pred: &[f64]) -> Result<Vec<Residual>, RegressionError> {
    check_lengths(y_true, y_pred)?;
    Ok(y_true
        .iter()
        .zip(y_pred)
        .enumerate()
        .map(|(i, (&y_obs, &y_fit))| Residual {
            row: i + 1,
            y_obs,
            y_fit,
            residual: y_obs - y_fit,
        })
        .collect())
}

/// Rank the top under- and over-predicted rows by residual.
pub fn rank_residuals(residuals: &[Residual], top_n: usize) -> Rankings {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| b.residual.partial_cmp(&a.residual).unwrap_or(std::cmp::Ordering::Equal));
    let under = sorted.iter().filter(|r| r.residual > 0.0).take(top_n).cloned().collect();

    sorted.reverse();
    let over = sorted.iter().filter(|r| r.residual < 0.0).take(top_n).cloned().collect();

    Rankings { under, over }
}

fn check_lengths(y_true: &[f64], y_pred: &[f64]) -> Result<(), RegressionError> {
    if y_true.len() != y_pred.len() {
        return Err(RegressionError::mismatch("len(y_true) vs len(y_pred)", y_true.len(), y_pred.len()));
    }
    if y_true.is_empty() {
        return Err(RegressionError::EmptyInput { what: "targets" });
    }
    Ok(())
}

fn sum_squared_errors(y_true: &[f64], y_pred: &[f64]) -> f64 {
    y_true.iter().zip(y_pred).map(|(a, b)| (a - b).powi(2)).sum()
}
