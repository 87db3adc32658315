// ========================================================================================
//                             High-Level Data Contracts
// ========================================================================================

// This file is ONLY for types that are SHARED BETWEEN FILES, not types that only are used in one file.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::guidelines;

/// The four clinical measurements the model is defined over.
///
/// Constructed once per evaluation and never mutated afterwards. The engine accepts any
/// finite value; the declared clinical domains live in [`crate::domain`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientInputs {
    /// Age in years.
    pub age: f64,
    /// Serum phosphate at 1 month post-surgery, mmol/L.
    pub phosphate_1mo: f64,
    /// Serum alkaline phosphatase at 1 month post-surgery, U/L.
    pub alp_1mo: f64,
    /// Parathyroid hormone at 3 months post-surgery, pmol/L.
    pub pth_3mo: f64,
}

impl PatientInputs {
    pub fn new(age: f64, phosphate_1mo: f64, alp_1mo: f64, pth_3mo: f64) -> Self {
        Self {
            age,
            phosphate_1mo,
            alp_1mo,
            pth_3mo,
        }
    }
}

/// One of the three risk bands. The partition is total over the real line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Intermediate,
    High,
}

impl RiskCategory {
    /// All categories, lowest band first.
    pub const ALL: [RiskCategory; 3] = [
        RiskCategory::Low,
        RiskCategory::Intermediate,
        RiskCategory::High,
    ];

    /// Short machine-friendly name, used in TSV output.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "low",
            RiskCategory::Intermediate => "intermediate",
            RiskCategory::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk",
            RiskCategory::Intermediate => "Intermediate Risk",
            RiskCategory::High => "High Risk",
        }
    }

    /// Label including the probability band, as shown on charts and guideline headings.
    pub fn band_label(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk (<30%)",
            RiskCategory::Intermediate => "Intermediate Risk (30-70%)",
            RiskCategory::High => "High Risk (>70%)",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            RiskCategory::Low => "🟢",
            RiskCategory::Intermediate => "🟡",
            RiskCategory::High => "🔴",
        }
    }

    /// The fixed, ordered recommendation set for this band.
    pub fn recommendations(&self) -> &'static [&'static str; 5] {
        match self {
            RiskCategory::Low => &guidelines::LOW_RISK_RECOMMENDATIONS,
            RiskCategory::Intermediate => &guidelines::INTERMEDIATE_RISK_RECOMMENDATIONS,
            RiskCategory::High => &guidelines::HIGH_RISK_RECOMMENDATIONS,
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The output of a single evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// The linear predictor (log-odds).
    pub logit: f64,
    /// Predicted probability in (0, 1).
    pub probability: f64,
    /// `probability * 100`.
    pub probability_percent: f64,
    pub category: RiskCategory,
    pub recommendations: Vec<String>,
}
