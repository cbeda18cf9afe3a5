//! Formatted terminal output.
//!
//! We keep formatting code in one place so the math and model code stay free of
//! presentation concerns.

use crate::domain::{FitConfig, FitQuality, Residual};
use crate::error::RegressionError;
use crate::io::ingest::IngestedData;
use crate::models::RidgeRegression;
use crate::report::Rankings;

/// Render the fitted model as `y = c1*x1 + c2*x2 + ... + intercept`.
///
/// Negative terms after the first are written with ` - ` and the absolute value.
pub fn format_equation(model: &RidgeRegression, precision: usize) -> Result<String, RegressionError> {
    let mut terms: Vec<(f64, Option<String>)> = model
        .coefficients()?
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, Some(format!("x{}", i + 1))))
        .collect();
    if let Some(offset) = model.intercept()? {
        terms.push((offset, None));
    }

    let mut out = String::from("y =");
    if terms.is_empty() {
        out.push_str(" 0");
        return Ok(out);
    }

    for (i, (coef, name)) in terms.iter().enumerate() {
        let value = if i == 0 {
            format!(" {coef:.precision$}")
        } else if *coef < 0.0 {
            format!(" - {:.precision$}", coef.abs())
        } else {
            format!(" + {coef:.precision$}")
        };
        out.push_str(&value);
        if let Some(name) = name {
            out.push('*');
            out.push_str(name);
        }
    }
    Ok(out)
}

/// Format the run summary (dataset stats, penalty, fitted equation, error metrics).
pub fn format_run_summary(
    ingest: &IngestedData,
    model: &RidgeRegression,
    quality: &FitQuality,
    config: &FitConfig,
) -> Result<String, RegressionError> {
    let prec = config.precision;
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", config.input.display()));
    out.push_str(&format!(
        "Rows: used={} read={} skipped={} | features={}\n",
        ingest.rows_used,
        ingest.rows_read,
        ingest.row_errors.len(),
        ingest.n_features(),
    ));
    out.push_str(&format!(
        "Model: {} (lambda={}) | intercept={}\n",
        if model.lambda() > 0.0 { "ridge" } else { "ols" },
        model.lambda(),
        model.has_intercept()?,
    ));
    out.push('\n');
    out.push_str(&format_equation(model, prec)?);
    out.push('\n');
    out.push_str(&format!("RMSE: {:.prec$}\n", quality.rmse));
    out.push_str(&format!("MAE : {:.prec$}\n", quality.mae));
    match quality.r_squared {
        Some(r2) => out.push_str(&format!("R^2 : {r2:.prec$}\n")),
        None => out.push_str("R^2 : n/a (constant target)\n"),
    }

    Ok(out)
}

/// Format the under/over-predicted residual tables.
pub fn format_rankings(rankings: &Rankings, precision: usize) -> String {
    let mut out = String::new();

    out.push_str("Largest under-predictions (positive residual):\n");
    out.push_str(&format_table(&rankings.under, precision));
    out.push('\n');

    out.push_str("Largest over-predictions (negative residual):\n");
    out.push_str(&format_table(&rankings.over, precision));

    out
}

fn format_table(rows: &[Residual], precision: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>8} {:>14} {:>14} {:>14}\n", "row", "y_obs", "y_fit", "residual"));
    out.push_str(&format!("{:->8} {:->14} {:->14} {:->14}\n", "", "", "", ""));

    for r in rows {
        out.push_str(&format!(
            "{:>8} {:>14} {:>14} {:>14}\n",
            r.row,
            fmt_num(r.y_obs, precision),
            fmt_num(r.y_fit, precision),
            fmt_num(r.residual, precision),
        ));
    }

    out
}

fn fmt_num(v: f64, precision: usize) -> String {
    format!("{v:.precision$}")
}
