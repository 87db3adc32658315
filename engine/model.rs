use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use thiserror::Error;

use crate::types::PatientInputs;

// --- Published Model Parameters ---
// These are fixed literals from the published logistic regression. They are not
// tunable and must be reproduced bit-for-bit.

pub const INTERCEPT: f64 = -2.7425363;
pub const AGE_COEFFICIENT: f64 = -0.01346972;
pub const PHOSPHATE_COEFFICIENT: f64 = 1.4125066;
pub const ALP_COEFFICIENT: f64 = 0.00250891;
pub const PTH_COEFFICIENT: f64 = 0.00236971;

/// Computes the linear predictor (logit) for a patient.
///
/// Terms are accumulated left to right in the published order so that the result is
/// identical across platforms.
pub fn linear_predictor(inputs: &PatientInputs) -> f64 {
    INTERCEPT
        + AGE_COEFFICIENT * inputs.age
        + PHOSPHATE_COEFFICIENT * inputs.phosphate_1mo
        + ALP_COEFFICIENT * inputs.alp_1mo
        + PTH_COEFFICIENT * inputs.pth_3mo
}

/// The standard logistic (sigmoid) transform.
pub fn logistic(logit: f64) -> f64 {
    1.0 / (1.0 + f64::exp(-logit))
}

/// The direction in which a predictor moves the predicted risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Protective,
    Harmful,
}

/// One named term of the linear predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predictor {
    pub name: String,
    pub unit: String,
    pub coefficient: f64,
    pub effect: Effect,
}

/// Discrimination and validation figures reported for the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    /// Optimism-corrected area under the ROC curve.
    pub auc: f64,
    pub calibration: String,
    /// Threshold probabilities over which net benefit was demonstrated.
    pub clinical_utility_range: (f64, f64),
    pub bootstrap_iterations: u32,
    pub cohort_size: u32,
    pub hbs_incidence_percent: f64,
}

/// The public, human-readable description of the published model.
/// This is the structure that gets saved to and loaded from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCard {
    pub name: String,
    pub formula: String,
    pub intercept: f64,
    pub predictors: Vec<Predictor>,
    pub performance: ModelPerformance,
}

/// Custom error type for saving and loading the model card.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read or write model file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML model file: {0}")]
    TomlParseError(#[from] toml::de::Error),
    #[error("Failed to serialize model to TOML format: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

const FORMULA: &str = "logit(p) = -2.7425363 + (-0.01346972) × Age + 1.4125066 × Phosphate_1month + 0.00250891 × ALP_1month + 0.00236971 × PTH_3months
Probability = 1 / (1 + exp(-logit(p)))";

impl ModelCard {
    /// The model exactly as published.
    pub fn published() -> Self {
        let predictor = |name: &str, unit: &str, coefficient: f64| Predictor {
            name: name.to_string(),
            unit: unit.to_string(),
            coefficient,
            effect: if coefficient < 0.0 {
                Effect::Protective
            } else {
                Effect::Harmful
            },
        };

        Self {
            name: "HBS post-parathyroidectomy risk model".to_string(),
            formula: FORMULA.to_string(),
            intercept: INTERCEPT,
            predictors: vec![
                predictor("Age", "years", AGE_COEFFICIENT),
                predictor("Phosphate", "mmol/L", PHOSPHATE_COEFFICIENT),
                predictor("ALP", "U/L", ALP_COEFFICIENT),
                predictor("PTH at 3 months", "pmol/L", PTH_COEFFICIENT),
            ],
            performance: ModelPerformance {
                auc: 0.742,
                calibration: "Excellent".to_string(),
                clinical_utility_range: (0.1, 0.8),
                bootstrap_iterations: 500,
                cohort_size: 227,
                hbs_incidence_percent: 49.8,
            },
        }
    }

    /// Saves the model card to a file in a human-readable TOML format.
    pub fn save(&self, path: &str) -> Result<(), ModelError> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut file = BufWriter::new(fs::File::create(path)?);
        file.write_all(toml_string.as_bytes())?;
        Ok(())
    }

    /// Loads a model card from a TOML file.
    pub fn load(path: &str) -> Result<Self, ModelError> {
        let toml_string = fs::read_to_string(path)?;
        let card = toml::from_str(&toml_string)?;
        Ok(card)
    }
}
