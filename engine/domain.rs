//! # Input Domains and Range Policy
//!
//! The model was validated only within the ranges declared here. The engine itself
//! scores any finite value; it is the consuming interface that decides what to do
//! with a value outside its domain, according to a [`RangePolicy`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::types::PatientInputs;

/// The declared inclusive range of one input, with the collecting widget's default
/// and step size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputDomain {
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl InputDomain {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Decimal places implied by the step size: 1.0 gives 0, 0.01 gives 2.
    pub fn decimals(&self) -> usize {
        (-self.step.log10()).ceil().max(0.0) as usize
    }

    /// Formats `value` at the precision the input is collected with.
    pub fn format_value(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.decimals())
    }
}

/// Identifies one of the four model inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputField {
    Age,
    Phosphate1mo,
    Alp1mo,
    Pth3mo,
}

impl InputField {
    pub const ALL: [InputField; 4] = [
        InputField::Age,
        InputField::Phosphate1mo,
        InputField::Alp1mo,
        InputField::Pth3mo,
    ];

    /// Column name used in tabular input and output.
    pub fn column_name(&self) -> &'static str {
        match self {
            InputField::Age => "age",
            InputField::Phosphate1mo => "phosphate_1mo",
            InputField::Alp1mo => "alp_1mo",
            InputField::Pth3mo => "pth_3mo",
        }
    }

    pub fn domain(&self) -> InputDomain {
        match self {
            InputField::Age => InputDomain {
                label: "Age",
                unit: "years",
                min: 18.0,
                max: 85.0,
                default: 55.0,
                step: 1.0,
            },
            InputField::Phosphate1mo => InputDomain {
                label: "Phosphate at 1 month",
                unit: "mmol/L",
                min: 0.50,
                max: 4.00,
                default: 2.00,
                step: 0.01,
            },
            InputField::Alp1mo => InputDomain {
                label: "Alkaline Phosphatase at 1 month",
                unit: "U/L",
                min: 50.0,
                max: 1500.0,
                default: 300.0,
                step: 1.0,
            },
            InputField::Pth3mo => InputDomain {
                label: "PTH at 3 months",
                unit: "pmol/L",
                min: 15.0,
                max: 600.0,
                default: 150.0,
                step: 1.0,
            },
        }
    }

    pub fn get(&self, inputs: &PatientInputs) -> f64 {
        match self {
            InputField::Age => inputs.age,
            InputField::Phosphate1mo => inputs.phosphate_1mo,
            InputField::Alp1mo => inputs.alp_1mo,
            InputField::Pth3mo => inputs.pth_3mo,
        }
    }

    fn set(&self, inputs: &mut PatientInputs, value: f64) {
        match self {
            InputField::Age => inputs.age = value,
            InputField::Phosphate1mo => inputs.phosphate_1mo = value,
            InputField::Alp1mo => inputs.alp_1mo = value,
            InputField::Pth3mo => inputs.pth_3mo = value,
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Inputs populated with every widget default (age 55, phosphate 2.00, ALP 300, PTH 150).
pub fn default_inputs() -> PatientInputs {
    PatientInputs::new(
        InputField::Age.domain().default,
        InputField::Phosphate1mo.domain().default,
        InputField::Alp1mo.domain().default,
        InputField::Pth3mo.domain().default,
    )
}

/// What the interface does with a finite value outside its declared domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Pull the value to the nearest domain bound and log a warning.
    #[default]
    Clamp,
    /// Keep the value and log a warning.
    Warn,
    /// Refuse to score.
    Reject,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Input '{field}' = {value} is outside the validated range [{min}, {max}].")]
    OutOfRange {
        field: InputField,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// A value the range policy flagged, and what became of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub field: InputField,
    pub original: f64,
    pub used: f64,
}

impl Adjustment {
    pub fn was_clamped(&self) -> bool {
        self.original != self.used
    }
}

/// Inputs after the range policy has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedInputs {
    pub inputs: PatientInputs,
    pub adjustments: Vec<Adjustment>,
}

/// Applies `policy` to every field.
///
/// Non-finite values are passed through untouched; rejecting them is the engine's job.
pub fn prepare(inputs: PatientInputs, policy: RangePolicy) -> Result<PreparedInputs, DomainError> {
    let mut prepared = inputs;
    let mut adjustments = Vec::new();

    for field in InputField::ALL {
        let value = field.get(&inputs);
        let domain = field.domain();
        if !value.is_finite() || domain.contains(value) {
            continue;
        }

        let used = match policy {
            RangePolicy::Reject => {
                return Err(DomainError::OutOfRange {
                    field,
                    value,
                    min: domain.min,
                    max: domain.max,
                });
            }
            RangePolicy::Clamp => {
                let clamped = domain.clamp(value);
                log::warn!(
                    "{} = {value} is outside the validated range [{}, {}] {}; clamped to {clamped}.",
                    domain.label,
                    domain.min,
                    domain.max,
                    domain.unit
                );
                field.set(&mut prepared, clamped);
                clamped
            }
            RangePolicy::Warn => {
                log::warn!(
                    "{} = {value} is outside the validated range [{}, {}] {}; the model is extrapolating.",
                    domain.label,
                    domain.min,
                    domain.max,
                    domain.unit
                );
                value
            }
        };

        adjustments.push(Adjustment {
            field,
            original: value,
            used,
        });
    }

    Ok(PreparedInputs {
        inputs: prepared,
        adjustments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_lie_inside_their_domains() {
        for field in InputField::ALL {
            let domain = field.domain();
            assert!(domain.contains(domain.default), "{field} default outside domain");
            assert!(domain.min < domain.max);
        }
        assert_eq!(default_inputs(), PatientInputs::new(55.0, 2.0, 300.0, 150.0));
    }

    #[test]
    fn display_precision_follows_step() {
        assert_eq!(InputField::Age.domain().decimals(), 0);
        assert_eq!(InputField::Phosphate1mo.domain().decimals(), 2);
        assert_eq!(InputField::Phosphate1mo.domain().format_value(2.0), "2.00");
        assert_eq!(InputField::Alp1mo.domain().format_value(300.0), "300");
    }

    #[test]
    fn bounds_are_inclusive() {
        let inputs = PatientInputs::new(18.0, 4.0, 50.0, 600.0);
        let prepared = prepare(inputs, RangePolicy::Reject).unwrap();
        assert_eq!(prepared.inputs, inputs);
        assert!(prepared.adjustments.is_empty());
    }

    #[test]
    fn clamp_policy_pulls_values_into_range() {
        let prepared = prepare(
            PatientInputs::new(200.0, 0.1, 300.0, 700.0),
            RangePolicy::Clamp,
        )
        .unwrap();
        assert_eq!(prepared.inputs, PatientInputs::new(85.0, 0.5, 300.0, 600.0));
        assert_eq!(prepared.adjustments.len(), 3);
        assert_eq!(prepared.adjustments[0].field, InputField::Age);
        assert_eq!(prepared.adjustments[0].original, 200.0);
        assert_eq!(prepared.adjustments[0].used, 85.0);
        assert!(prepared.adjustments.iter().all(|a| a.was_clamped()));
    }

    #[test]
    fn warn_policy_keeps_values() {
        let inputs = PatientInputs::new(10.0, 2.0, 300.0, 150.0);
        let prepared = prepare(inputs, RangePolicy::Warn).unwrap();
        assert_eq!(prepared.inputs, inputs);
        assert_eq!(prepared.adjustments.len(), 1);
        assert!(!prepared.adjustments[0].was_clamped());
    }

    #[test]
    fn reject_policy_reports_the_first_offending_field() {
        let err = prepare(
            PatientInputs::new(55.0, 2.0, 2000.0, 10.0),
            RangePolicy::Reject,
        )
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::OutOfRange {
                field: InputField::Alp1mo,
                value: 2000.0,
                min: 50.0,
                max: 1500.0,
            }
        );
    }

    #[test]
    fn non_finite_values_are_left_for_the_engine() {
        let prepared = prepare(
            PatientInputs::new(f64::NAN, 2.0, 300.0, 150.0),
            RangePolicy::Reject,
        )
        .unwrap();
        assert!(prepared.inputs.age.is_nan());
        assert!(prepared.adjustments.is_empty());
    }
}
