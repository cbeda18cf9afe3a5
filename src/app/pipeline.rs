//! Shared fit/predict workflows.
//!
//! Keeping these in one place keeps the core workflow free of presentation:
//! ingest -> fit -> fitted values -> quality -> residuals -> rankings
//!
//! `app` then focuses on printing and writing files.

use nalgebra::DVector;

use crate::domain::{FitConfig, FitQuality, ModelFile, PredictConfig, Residual};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, RowError, load_dataset, load_table};
use crate::models::RidgeRegression;
use crate::report::{Rankings, compute_residuals, fit_quality, rank_residuals};

/// All computed outputs of a single `linregress fit` run.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub ingest: IngestedData,
    pub model: RidgeRegression,
    pub fitted: DVector<f64>,
    pub quality: FitQuality,
    pub residuals: Vec<Residual>,
    pub rankings: Rankings,
}

/// All computed outputs of a single `linregress predict` run.
#[derive(Debug, Clone)]
pub struct PredictRun {
    pub model: ModelFile,
    pub predictions: DVector<f64>,
    /// Present when the input carried a target column.
    pub quality: Option<FitQuality>,
    pub rows_used: usize,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<FitRun, AppError> {
    let ingest = load_dataset(&config.input, &config.csv)?;
    warn_row_errors(&ingest.row_errors);
    log::debug!(
        "ingested {} rows x {} features from {}",
        ingest.rows_used,
        ingest.n_features(),
        config.input.display()
    );

    fit_ingested(ingest, config)
}

/// Fit an already-ingested dataset.
pub fn fit_ingested(ingest: IngestedData, config: &FitConfig) -> Result<FitRun, AppError> {
    let mut model = RidgeRegression::new(config.lambda);
    model.fit(&ingest.x, &ingest.y, config.intercept)?;

    let fitted = model.predict(&ingest.x)?;
    let quality = fit_quality(ingest.y.as_slice(), fitted.as_slice())?;
    let residuals = compute_residuals(ingest.y.as_slice(), fitted.as_slice())?;
    let rankings = rank_residuals(&residuals, config.top_n);

    Ok(FitRun {
        ingest,
        model,
        fitted,
        quality,
        residuals,
        rankings,
    })
}

/// Load a saved model and apply it to the input table.
///
/// The input must have either `n_features` columns, or `n_features + 1` columns
/// where the last one is an observed target used to report fit quality.
pub fn run_predict(config: &PredictConfig) -> Result<PredictRun, AppError> {
    let file = crate::io::model::read_model_json(&config.model)?;
    let model = file.to_model()?;

    let table = load_table(&config.input, &config.csv)?;
    warn_row_errors(&table.row_errors);

    let n_features = file.n_features;
    let n_cols = table.values.ncols();
    let (x, y) = if n_cols == n_features {
        (table.values, None)
    } else if n_cols == n_features + 1 {
        let x = table.values.columns(0, n_features).into_owned();
        let y = table.values.column(n_features).into_owned();
        (x, Some(y))
    } else {
        return Err(AppError::new(
            2,
            format!(
                "Input has {n_cols} columns; model expects {n_features} feature columns (optionally followed by a target)."
            ),
        ));
    };

    let predictions = model.predict(&x)?;
    let quality = y
        .map(|y| fit_quality(y.as_slice(), predictions.as_slice()))
        .transpose()?;

    Ok(PredictRun {
        model: file,
        predictions,
        quality,
        rows_used: table.rows_used,
    })
}

fn warn_row_errors(row_errors: &[RowError]) {
    if row_errors.is_empty() {
        return;
    }
    log::warn!("skipped {} unusable input row(s)", row_errors.len());
    for e in row_errors.iter().take(5) {
        log::warn!("  line {}: {}", e.line, e.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use approx::assert_relative_eq;

    use crate::domain::CsvOptions;
    use crate::io::ingest::{read_table, split_target};

    fn config(lambda: f64, intercept: bool) -> FitConfig {
        FitConfig {
            input: PathBuf::from("mem.csv"),
            lambda,
            precision: 4,
            csv: CsvOptions::default(),
            intercept,
            top_n: 2,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            write_outputs: false,
            export_model: None,
        }
    }

    fn ingest(text: &str) -> IngestedData {
        split_target(read_table(text.as_bytes(), &CsvOptions::default()).unwrap()).unwrap()
    }

    #[test]
    fn fit_pipeline_on_exact_line() {
        let run = fit_ingested(ingest("0,1\n1,3\n2,5\n3,7\n4,9\n"), &config(0.0, true)).unwrap();

        let w = run.model.weights().unwrap();
        assert_relative_eq!(w[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(w[1], 1.0, epsilon = 1e-10);
        assert!(run.quality.rmse < 1e-10);
        assert_eq!(run.residuals.len(), 5);
        assert_eq!(run.fitted.len(), 5);
    }

    #[test]
    fn fit_pipeline_surfaces_rank_deficiency() {
        // Two identical feature columns.
        let err = fit_ingested(ingest("1,1,2\n2,2,4\n3,3,7\n"), &config(0.0, false)).unwrap_err();
        assert_eq!(err.exit_code(), 4);

        let run = fit_ingested(ingest("1,1,2\n2,2,4\n3,3,7\n"), &config(0.1, false)).unwrap();
        assert_eq!(run.model.weights().unwrap().len(), 2);
    }

    #[test]
    fn predict_pipeline_with_and_without_target() {
        let dir = std::env::temp_dir().join(format!("linregress-pipeline-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let model = RidgeRegression::from_weights(0.0, DVector::from_row_slice(&[2.0, 1.0]), true).unwrap();
        let model_path = dir.join("model.json");
        crate::io::model::write_model_json(&model_path, &ModelFile::from_model(&model, None).unwrap()).unwrap();

        let features = dir.join("features.csv");
        std::fs::write(&features, "0\n1\n2\n").unwrap();
        let with_target = dir.join("labelled.csv");
        std::fs::write(&with_target, "0,1\n1,3\n2,6\n").unwrap();
        let too_wide = dir.join("wide.csv");
        std::fs::write(&too_wide, "0,1,2\n").unwrap();

        let cfg = |input: PathBuf| PredictConfig {
            input,
            model: model_path.clone(),
            precision: 4,
            csv: CsvOptions::default(),
            output: None,
        };

        let run = run_predict(&cfg(features)).unwrap();
        assert_eq!(run.predictions.as_slice(), &[1.0, 3.0, 5.0]);
        assert!(run.quality.is_none());

        let run = run_predict(&cfg(with_target)).unwrap();
        assert_relative_eq!(run.quality.unwrap().rmse, (1.0f64 / 3.0).sqrt(), epsilon = 1e-12);

        let err = run_predict(&cfg(too_wide)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
