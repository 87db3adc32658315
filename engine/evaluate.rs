//! # Risk Engine
//!
//! The single scoring entry point. `evaluate` is a stateless pure function: it
//! touches no shared state, performs no I/O and is safe to call concurrently from
//! any number of threads. It either fully succeeds or fails with
//! [`EngineError::InvalidInput`] before any probability is computed.

use thiserror::Error;

use crate::model::{linear_predictor, logistic};
use crate::types::{PatientInputs, RiskAssessment, RiskCategory};

/// Probability (in percent) at which the Intermediate band begins.
pub const INTERMEDIATE_THRESHOLD: f64 = 30.0;
/// Probability (in percent) at which the High band begins.
pub const HIGH_THRESHOLD: f64 = 70.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Input '{field}' must be a finite number, got {value}.")]
    InvalidInput { field: &'static str, value: f64 },
}

/// Maps a probability percentage to its risk band.
///
/// `< 30` is Low, `< 70` is Intermediate, anything else is High.
pub fn classify(probability_percent: f64) -> RiskCategory {
    if probability_percent < INTERMEDIATE_THRESHOLD {
        RiskCategory::Low
    } else if probability_percent < HIGH_THRESHOLD {
        RiskCategory::Intermediate
    } else {
        RiskCategory::High
    }
}

/// Scores one patient.
pub fn evaluate(inputs: &PatientInputs) -> Result<RiskAssessment, EngineError> {
    validate_finite(inputs)?;

    let logit = linear_predictor(inputs);
    let probability = logistic(logit);
    let probability_percent = probability * 100.0;
    let category = classify(probability_percent);

    log::debug!(
        "Evaluated {inputs:?}: logit={logit:.7}, probability={probability_percent:.4}%, category={category}"
    );

    Ok(RiskAssessment {
        logit,
        probability,
        probability_percent,
        category,
        recommendations: category
            .recommendations()
            .iter()
            .map(|r| r.to_string())
            .collect(),
    })
}

fn validate_finite(inputs: &PatientInputs) -> Result<(), EngineError> {
    let fields = [
        ("age", inputs.age),
        ("phosphate_1mo", inputs.phosphate_1mo),
        ("alp_1mo", inputs.alp_1mo),
        ("pth_3mo", inputs.pth_3mo),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(EngineError::InvalidInput { field, value });
        }
    }
    Ok(())
}
