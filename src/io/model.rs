//! Read/write model JSON files.
//!
//! Model JSON is the portable representation of a fitted model: penalty,
//! intercept flag, feature count and the full coefficient vector, plus the
//! training fit quality. The schema is defined by `domain::ModelFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::ModelFile;
use crate::error::AppError;

/// Write a model JSON file.
pub fn write_model_json(path: &Path, model: &ModelFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create model JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, model)
        .map_err(|e| AppError::new(2, format!("Failed to write model JSON: {e}")))?;

    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let model: ModelFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))?;
    Ok(model)
}
