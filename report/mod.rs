//! # Presentation Layer
//!
//! Everything here consumes a finished [`RiskAssessment`]; nothing feeds back into
//! scoring. `chart` computes what the charts show, `render` draws it.

pub mod chart;
pub mod render;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use thiserror::Error;

use crate::domain::{Adjustment, PreparedInputs};
use crate::types::{PatientInputs, RiskAssessment};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read or write report file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML report file: {0}")]
    TomlParseError(#[from] toml::de::Error),
    #[error("Failed to serialize report to TOML format: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// A single assessment together with the inputs it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub inputs: PatientInputs,
    pub adjustments: Vec<Adjustment>,
    pub assessment: RiskAssessment,
}

impl AssessmentReport {
    pub fn new(prepared: &PreparedInputs, assessment: &RiskAssessment) -> Self {
        Self {
            inputs: prepared.inputs,
            adjustments: prepared.adjustments.clone(),
            assessment: assessment.clone(),
        }
    }

    /// Saves the report in a human-readable TOML format.
    pub fn save(&self, path: &str) -> Result<(), ReportError> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut file = BufWriter::new(fs::File::create(path)?);
        file.write_all(toml_string.as_bytes())?;
        Ok(())
    }

    pub fn load(path: &str) -> Result<Self, ReportError> {
        let toml_string = fs::read_to_string(path)?;
        let report = toml::from_str(&toml_string)?;
        Ok(report)
    }
}
