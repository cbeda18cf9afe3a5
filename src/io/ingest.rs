//! Delimited-text ingest.
//!
//! Each non-empty row is one example. For training data the **last** column is
//! the target `y` and every preceding column is a feature.
//!
//! Design goals:
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Rectangular output**: the first valid row fixes the column count
//! - **Deterministic behavior**
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use nalgebra::{DMatrix, DVector};

use crate::domain::CsvOptions;
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Numeric table read from a delimited file.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub values: DMatrix<f64>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Training data: features, target and ingest bookkeeping.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub x: DMatrix<f64>,
    pub y: DVector<f64>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl IngestedData {
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }
}

/// Load training data from `path`: all columns but the last are features.
pub fn load_dataset(path: &Path, options: &CsvOptions) -> Result<IngestedData, AppError> {
    split_target(load_table(path, options)?)
}

/// Load a numeric table from `path`.
pub fn load_table(path: &Path, options: &CsvOptions) -> Result<IngestedTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open input '{}': {e}", path.display())))?;
    read_table(file, options)
}

/// Read a numeric table from any reader.
pub fn read_table<R: Read>(reader: R, options: &CsvOptions) -> Result<IngestedTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut data = Vec::new();
    let mut n_cols: Option<usize> = None;
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_used = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                rows_read += 1;
                row_errors.push(RowError {
                    line: e.position().map_or(idx + 1, |p| p.line() as usize),
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        if is_blank(&record) {
            continue;
        }
        rows_read += 1;

        let line = record.position().map_or(idx + 1, |p| p.line() as usize);
        let row = match parse_row(&record, rows_read == 1) {
            Ok(row) => row,
            Err(message) => {
                row_errors.push(RowError { line, message });
                continue;
            }
        };

        match n_cols {
            Some(expected) if row.len() != expected => {
                row_errors.push(RowError {
                    line,
                    message: format!("Expected {expected} columns, found {}.", row.len()),
                });
                continue;
            }
            Some(_) => {}
            None => n_cols = Some(row.len()),
        }

        data.extend(row);
        rows_used += 1;
    }

    let Some(n_cols) = n_cols else {
        return Err(AppError::new(3, "No valid rows found in input."));
    };

    Ok(IngestedTable {
        values: DMatrix::from_row_slice(rows_used, n_cols, &data),
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Split the last column off as the target vector.
pub fn split_target(table: IngestedTable) -> Result<IngestedData, AppError> {
    let n_cols = table.values.ncols();
    if n_cols == 0 {
        return Err(AppError::new(3, "Input has no columns (need at least a target column)."));
    }

    let x = table.values.columns(0, n_cols - 1).into_owned();
    let y = table.values.column(n_cols - 1).into_owned();

    Ok(IngestedData {
        x,
        y,
        row_errors: table.row_errors,
        rows_read: table.rows_read,
        rows_used: table.rows_used,
    })
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn parse_row(record: &StringRecord, first_row: bool) -> Result<Vec<f64>, String> {
    record
        .iter()
        .enumerate()
        .map(|(col, field)| {
            // Spreadsheet exports sometimes prefix the file with a UTF-8 BOM.
            let field = if first_row && col == 0 {
                field.trim_start_matches('\u{feff}').trim()
            } else {
                field
            };
            parse_value(field).map_err(|e| format!("Column {}: {e}", col + 1))
        })
        .collect()
}

fn parse_value(s: &str) -> Result<f64, String> {
    if s.is_empty() {
        return Err("missing value.".to_string());
    }
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("invalid number '{s}'."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("non-finite value '{s}'."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(input: &str, options: CsvOptions) -> Result<IngestedTable, AppError> {
        read_table(input.as_bytes(), &options)
    }

    #[test]
    fn last_column_is_target() {
        let table = read("1,2,3\n4,5,6\n", CsvOptions::default()).unwrap();
        let data = split_target(table).unwrap();

        assert_eq!(data.x, DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 4.0, 5.0]));
        assert_eq!(data.y, DVector::from_row_slice(&[3.0, 6.0]));
        assert_eq!(data.n_features(), 2);
        assert_eq!(data.rows_used, 2);
    }

    #[test]
    fn skips_blank_lines() {
        let table = read("\n1,2\n\n   \n3,4\n\n", CsvOptions::default()).unwrap();
        assert_eq!(table.rows_used, 2);
        assert_eq!(table.rows_read, 2);
        assert!(table.row_errors.is_empty());
    }

    #[test]
    fn custom_delimiter_and_whitespace() {
        let options = CsvOptions {
            delimiter: b';',
            has_header: false,
        };
        let table = read(" 1.5 ; -2e1 \n3;4\n", options).unwrap();
        assert_eq!(table.values, DMatrix::from_row_slice(2, 2, &[1.5, -20.0, 3.0, 4.0]));
    }

    #[test]
    fn header_and_bom_are_handled() {
        let options = CsvOptions {
            delimiter: b',',
            has_header: true,
        };
        let table = read("x,y\n1,2\n", options).unwrap();
        assert_eq!(table.rows_used, 1);

        let table = read("\u{feff}1,2\n3,4\n", CsvOptions::default()).unwrap();
        assert_eq!(table.values[(0, 0)], 1.0);
        assert!(table.row_errors.is_empty());
    }

    #[test]
    fn bad_rows_are_collected_and_skipped() {
        let input = "1,2,3\n4,oops,6\n7,8\n9,10,11\n12,nan,13\n";
        let table = read(input, CsvOptions::default()).unwrap();

        assert_eq!(table.rows_read, 5);
        assert_eq!(table.rows_used, 2);
        assert_eq!(table.values.row(1).iter().copied().collect::<Vec<_>>(), vec![9.0, 10.0, 11.0]);

        let lines: Vec<usize> = table.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 3, 5]);
        assert!(table.row_errors[1].message.contains("Expected 3 columns"));
    }

    #[test]
    fn no_valid_rows_is_an_error() {
        let err = read("a,b\n\n", CsvOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        let err = read("", CsvOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn single_column_means_no_features() {
        let data = split_target(read("1\n2\n3\n", CsvOptions::default()).unwrap()).unwrap();
        assert_eq!(data.x.shape(), (3, 0));
        assert_eq!(data.y.len(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_dataset(Path::new("/definitely/not/here.csv"), &CsvOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
