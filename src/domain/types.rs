//! Shared domain types.
//!
//! Run configuration is derived from CLI flags (plus environment defaults) and
//! handed to the pipeline; fit outputs are kept serializable so a fitted model
//! can be written to JSON and reloaded for `linregress predict`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::RegressionError;
use crate::models::RidgeRegression;

/// Name written into model files.
pub const TOOL_NAME: &str = "linregress";

/// How delimited input files are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Single-byte field delimiter.
    pub delimiter: u8,
    /// Skip the first record.
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: false,
        }
    }
}

/// Configuration for `linregress fit`.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input: PathBuf,
    pub lambda: f64,
    pub precision: usize,
    pub csv: CsvOptions,
    pub intercept: bool,
    /// Show the N largest positive and negative residuals (0 disables).
    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    /// Write `<stem>.fittedvalues` and `<stem>.weights` next to the input.
    pub write_outputs: bool,
    pub export_model: Option<PathBuf>,
}

/// Configuration for `linregress predict`.
#[derive(Debug, Clone)]
pub struct PredictConfig {
    pub input: PathBuf,
    pub model: PathBuf,
    pub precision: usize,
    pub csv: CsvOptions,
    /// Defaults to `<stem>.predictions` next to the input.
    pub output: Option<PathBuf>,
}

/// Configuration for `linregress generate`.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub out_dir: PathBuf,
    pub n_examples: usize,
    pub seed: u64,
    /// Noise std-dev for `single_input.csv` (`y = x - 2 + ε`).
    pub sigma_single: f64,
    /// Noise std-dev for `multiple_inputs.csv` (`y = 5·x₁ + 2·x₂ + ε`).
    pub sigma_multi: f64,
}

/// Fit-quality statistics comparing observed and predicted targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub n: usize,
    pub sse: f64,
    pub rmse: f64,
    pub mae: f64,
    /// `None` when the observed targets have zero variance.
    pub r_squared: Option<f64>,
}

/// Observed vs fitted value for one input row.
#[derive(Debug, Clone, PartialEq)]
pub struct Residual {
    /// 1-based index into the rows used for fitting.
    pub row: usize,
    pub y_obs: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// Portable representation of a fitted model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub fitted_at: DateTime<Utc>,
    pub lambda: f64,
    pub intercept: bool,
    pub n_features: usize,
    /// Full coefficient vector, intercept last when present.
    pub weights: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training: Option<FitQuality>,
}

impl ModelFile {
    pub fn from_model(model: &RidgeRegression, training: Option<FitQuality>) -> Result<Self, RegressionError> {
        Ok(Self {
            tool: TOOL_NAME.to_string(),
            fitted_at: Utc::now(),
            lambda: model.lambda(),
            intercept: model.has_intercept()?,
            n_features: model.n_features()?,
            weights: model.weights()?.iter().copied().collect(),
            training,
        })
    }

    /// Rebuild a fitted model, checking that the stored shape is consistent.
    pub fn to_model(&self) -> Result<RidgeRegression, RegressionError> {
        let expected = self
            .n_features
            .checked_add(usize::from(self.intercept))
            .ok_or(RegressionError::DimensionMismatch {
                context: "model file n_features vs weights",
                expected: self.weights.len(),
                found: self.n_features,
            })?;
        if self.weights.len() != expected {
            return Err(RegressionError::DimensionMismatch {
                context: "model file weights vs n_features",
                expected,
                found: self.weights.len(),
            });
        }
        RidgeRegression::from_weights(self.lambda, DVector::from_vec(self.weights.clone()), self.intercept)
    }
}
