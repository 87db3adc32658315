//! # Patient Table Loading
//!
//! Reads a tab-separated file of patients and validates it against a fixed schema:
//! the columns `age`, `phosphate_1mo`, `alp_1mo` and `pth_3mo` are required, and
//! `sample_id` is optional. Column names are not configurable.
//!
//! Failures are assumed to be user-input errors, so every `DataError` names the
//! offending column.

use ndarray::Array1;
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

use crate::domain::InputField;
use crate::types::PatientInputs;

/// Validated patient columns ready for scoring.
#[derive(Debug)]
pub struct PatientData {
    pub age: Array1<f64>,
    pub phosphate_1mo: Array1<f64>,
    pub alp_1mo: Array1<f64>,
    pub pth_3mo: Array1<f64>,
    /// Taken from the `sample_id` column if present, otherwise sequential 1-based IDs.
    pub sample_ids: Vec<String>,
}

impl PatientData {
    pub fn len(&self) -> usize {
        self.sample_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_ids.is_empty()
    }

    /// The inputs for row `index`.
    pub fn row(&self, index: usize) -> PatientInputs {
        PatientInputs::new(
            self.age[index],
            self.phosphate_1mo[index],
            self.alp_1mo[index],
            self.pth_3mo[index],
        )
    }
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Error from the underlying Polars DataFrame library: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error(
        "The required column '{0}' was not found in the input file. Please check spelling and case."
    )]
    ColumnNotFound(String),
    #[error(
        "The required column '{column_name}' could not be converted to the expected type '{expected_type}'. It contains non-numeric data. (Found type: {found_type})"
    )]
    ColumnWrongType {
        column_name: String,
        expected_type: &'static str,
        found_type: String,
    },
    #[error(
        "Missing or null values were found in the required column '{0}'. Every patient needs all four measurements."
    )]
    MissingValuesFound(String),
    #[error(
        "Non-finite values (NaN or Infinity) were found in the required column '{0}'. All measurements must be finite."
    )]
    NonFiniteValuesFound(String),
    #[error("The input file contains no patient rows.")]
    NoRows,
}

pub const SAMPLE_ID_COLUMN: &str = "sample_id";

/// Loads and validates a patient table.
pub fn load_patient_data(path: &str) -> Result<PatientData, DataError> {
    log::info!("Loading patient data from '{path}'");

    let df = CsvReader::new(File::open(Path::new(path))?)
        .with_options(
            CsvReadOptions::default()
                .with_has_header(true)
                .with_parse_options(CsvParseOptions::default().with_separator(b'\t')),
        )
        .finish()?;

    if df.height() == 0 {
        return Err(DataError::NoRows);
    }

    let columns: HashSet<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    for field in InputField::ALL {
        if !columns.contains(field.column_name()) {
            return Err(DataError::ColumnNotFound(field.column_name().to_string()));
        }
    }

    let sample_ids = if columns.contains(SAMPLE_ID_COLUMN) {
        build_sample_ids(&df)?
    } else {
        sequential_ids(df.height())
    };

    let data = PatientData {
        age: extract_numeric_column(&df, InputField::Age.column_name())?,
        phosphate_1mo: extract_numeric_column(&df, InputField::Phosphate1mo.column_name())?,
        alp_1mo: extract_numeric_column(&df, InputField::Alp1mo.column_name())?,
        pth_3mo: extract_numeric_column(&df, InputField::Pth3mo.column_name())?,
        sample_ids,
    };

    log::info!("Loaded {} patients from '{path}'", data.len());
    Ok(data)
}

fn extract_numeric_column(df: &DataFrame, column_name: &str) -> Result<Array1<f64>, DataError> {
    let series = df.column(column_name)?;
    if series.null_count() > 0 {
        return Err(DataError::MissingValuesFound(column_name.to_string()));
    }

    let wrong_type = || DataError::ColumnWrongType {
        column_name: column_name.to_string(),
        expected_type: "f64 (numeric)",
        found_type: format!("{:?}", series.dtype()),
    };

    if series.dtype() == &DataType::String {
        return Err(wrong_type());
    }
    let casted = series.cast(&DataType::Float64).map_err(|_| wrong_type())?;
    if casted.null_count() > 0 {
        return Err(wrong_type());
    }

    let values: Vec<f64> = casted.f64()?.rechunk().into_no_null_iter().collect();
    if values.iter().any(|v| !v.is_finite()) {
        return Err(DataError::NonFiniteValuesFound(column_name.to_string()));
    }
    Ok(Array1::from_vec(values))
}

fn sequential_ids(n: usize) -> Vec<String> {
    (1..=n).map(|i| i.to_string()).collect()
}

/// Blank or null identifiers fall back to the 1-based row number.
fn build_sample_ids(df: &DataFrame) -> Result<Vec<String>, DataError> {
    let series = df.column(SAMPLE_ID_COLUMN)?.cast(&DataType::String)?;
    let ids = series
        .str()?
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => (i + 1).to_string(),
        })
        .collect();
    Ok(ids)
}
