//! # Batch Scoring
//!
//! Scores every row of a patient table. Rows are independent, so they are prepared
//! and evaluated in parallel; output preserves input order. The run is atomic: any
//! row failing the range policy or the engine aborts the whole batch before
//! anything is written.

pub mod data;
pub mod output;

use rayon::prelude::*;
use thiserror::Error;

use crate::domain::{Adjustment, DomainError, RangePolicy, prepare};
use crate::evaluate::{EngineError, evaluate};
use crate::types::{RiskAssessment, RiskCategory};

use data::{DataError, PatientData, load_patient_data};
use output::save_predictions;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("Patient '{sample_id}': {source}")]
    Domain {
        sample_id: String,
        source: DomainError,
    },
    #[error("Patient '{sample_id}': {source}")]
    Engine {
        sample_id: String,
        source: EngineError,
    },
    #[error("Failed to write predictions: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPatient {
    pub sample_id: String,
    pub adjustments: Vec<Adjustment>,
    pub assessment: RiskAssessment,
}

/// Counts per risk band for a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub low: usize,
    pub intermediate: usize,
    pub high: usize,
    /// Rows with at least one value outside its validated range.
    pub adjusted: usize,
}

impl BatchSummary {
    pub fn from_scored(scored: &[ScoredPatient]) -> Self {
        scored.iter().fold(
            BatchSummary {
                total: scored.len(),
                ..BatchSummary::default()
            },
            |mut summary, patient| {
                match patient.assessment.category {
                    RiskCategory::Low => summary.low += 1,
                    RiskCategory::Intermediate => summary.intermediate += 1,
                    RiskCategory::High => summary.high += 1,
                }
                if !patient.adjustments.is_empty() {
                    summary.adjusted += 1;
                }
                summary
            },
        )
    }
}

/// Scores every row of already-loaded data.
pub fn score_patients(
    data: &PatientData,
    policy: RangePolicy,
) -> Result<Vec<ScoredPatient>, BatchError> {
    (0..data.len())
        .into_par_iter()
        .map(|i| {
            let sample_id = &data.sample_ids[i];
            let prepared = prepare(data.row(i), policy).map_err(|source| BatchError::Domain {
                sample_id: sample_id.clone(),
                source,
            })?;
            let assessment = evaluate(&prepared.inputs).map_err(|source| BatchError::Engine {
                sample_id: sample_id.clone(),
                source,
            })?;
            Ok(ScoredPatient {
                sample_id: sample_id.clone(),
                adjustments: prepared.adjustments,
                assessment,
            })
        })
        .collect()
}

/// Loads `input_path`, scores it and writes predictions to `output_path`.
pub fn run_batch(
    input_path: &str,
    output_path: &str,
    policy: RangePolicy,
) -> Result<BatchSummary, BatchError> {
    let data = load_patient_data(input_path)?;
    log::info!("Scoring {} patients with range policy {policy:?}", data.len());

    let scored = score_patients(&data, policy)?;
    save_predictions(output_path, &scored)?;

    let summary = BatchSummary::from_scored(&scored);
    log::info!("Batch complete: {summary:?}");
    Ok(summary)
}
