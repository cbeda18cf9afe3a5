//! Plain-text exports.
//!
//! Predictions and weights are written one value per line so they are easy to
//! load from other tools (e.g. `numpy.loadtxt`). Output paths are derived from
//! the input path by replacing its extension.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use nalgebra::DMatrix;

use crate::error::AppError;

/// Extension of the fitted-values file written by `linregress fit`.
pub const FITTED_VALUES_EXT: &str = "fittedvalues";
/// Extension of the weights file written by `linregress fit`.
pub const WEIGHTS_EXT: &str = "weights";
/// Extension of the predictions file written by `linregress predict`.
pub const PREDICTIONS_EXT: &str = "predictions";

/// Replace the extension of `input` with `ext` (`data/foo.csv` -> `data/foo.<ext>`).
pub fn derived_path(input: &Path, ext: &str) -> PathBuf {
    input.with_extension(ext)
}

/// Write one value per line with `precision` decimals.
pub fn write_values(path: &Path, values: &[f64], precision: usize) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    for v in values {
        writeln!(out, "{v:.precision$}")
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    }
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;

    Ok(())
}

/// Write a numeric table as delimited text without a header.
pub fn write_table_csv(path: &Path, table: &DMatrix<f64>, delimiter: u8) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;

    for row in table.row_iter() {
        let record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;

    Ok(())
}
