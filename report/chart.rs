//! Chart data, computed independently of how it is drawn.

use crate::evaluate::{HIGH_THRESHOLD, INTERMEDIATE_THRESHOLD};
use crate::guidelines::observed_hbs_rate;
use crate::model::ModelCard;
use crate::types::{RiskAssessment, RiskCategory};

/// The gauge's fixed reference marker, in percent.
pub const GAUGE_REFERENCE_MARK: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeBand {
    pub category: RiskCategory,
    pub start: f64,
    pub end: f64,
}

/// A 0-100 dial with one coloured segment per risk band.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeChart {
    pub title: &'static str,
    pub value: f64,
    pub bands: [GaugeBand; 3],
    pub reference_mark: f64,
}

impl GaugeChart {
    pub fn new(assessment: &RiskAssessment) -> Self {
        Self {
            title: "HBS Risk Probability (%)",
            value: assessment.probability_percent,
            bands: [
                GaugeBand {
                    category: RiskCategory::Low,
                    start: 0.0,
                    end: INTERMEDIATE_THRESHOLD,
                },
                GaugeBand {
                    category: RiskCategory::Intermediate,
                    start: INTERMEDIATE_THRESHOLD,
                    end: HIGH_THRESHOLD,
                },
                GaugeBand {
                    category: RiskCategory::High,
                    start: HIGH_THRESHOLD,
                    end: 100.0,
                },
            ],
            reference_mark: GAUGE_REFERENCE_MARK,
        }
    }

    /// The band a point on the dial falls into.
    pub fn band_at(&self, percent: f64) -> RiskCategory {
        self.bands
            .iter()
            .find(|band| percent < band.end)
            .map_or(RiskCategory::High, |band| band.category)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonBar {
    pub category: RiskCategory,
    /// Observed HBS rate in the derivation cohort, percent.
    pub observed_rate: f64,
    /// The patient's probability if it falls in this band, otherwise 0.
    pub your_risk: f64,
}

/// Observed HBS rate per band, with the patient's own value overlaid on its band.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonChart {
    pub title: &'static str,
    pub bars: Vec<ComparisonBar>,
}

impl ComparisonChart {
    pub fn new(assessment: &RiskAssessment) -> Self {
        let bars = RiskCategory::ALL
            .iter()
            .map(|&category| ComparisonBar {
                category,
                observed_rate: observed_hbs_rate(category),
                your_risk: if category == assessment.category {
                    assessment.probability_percent
                } else {
                    0.0
                },
            })
            .collect();
        Self {
            title: "Risk Category Comparison",
            bars,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectBar {
    pub name: String,
    pub coefficient: f64,
}

/// One bar per predictor coefficient, in model order.
pub fn predictor_effects(card: &ModelCard) -> Vec<EffectBar> {
    card.predictors
        .iter()
        .map(|p| EffectBar {
            name: p.name.clone(),
            coefficient: p.coefficient,
        })
        .collect()
}
