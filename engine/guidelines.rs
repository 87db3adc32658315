//! # Clinical Reference Content
//!
//! Static data published with the model: the recommendation set and monitoring
//! protocol for each risk band, the observed HBS rate per band in the derivation
//! cohort, and the study background. None of this is computed; it is reproduced
//! verbatim because it carries clinical meaning.

use crate::types::RiskCategory;

pub const LOW_RISK_RECOMMENDATIONS: [&str; 5] = [
    "Standard postoperative monitoring",
    "Regular calcium and vitamin D supplementation",
    "Outpatient follow-up at 1-2 weeks",
    "Early discharge planning appropriate",
    "Patient education on hypocalcemia symptoms",
];

pub const INTERMEDIATE_RISK_RECOMMENDATIONS: [&str; 5] = [
    "Enhanced postoperative monitoring",
    "Proactive calcium supplementation",
    "Consider prolonged observation (24-48 hours)",
    "Frequent biochemical monitoring",
    "Close outpatient follow-up",
];

pub const HIGH_RISK_RECOMMENDATIONS: [&str; 5] = [
    "Intensive postoperative monitoring",
    "Prophylactic high-dose calcium/calcitriol",
    "Consider ICU-level monitoring",
    "Extended hospitalization",
    "Immediate intervention protocols ready",
];

const LOW_RISK_MONITORING: [&str; 3] = [
    "Serum calcium q8h for first 24 hours",
    "Daily calcium levels until stable",
    "Standard supplementation: Calcium carbonate 1-2g TID, Calcitriol 0.25-0.5 mcg BID",
];

const INTERMEDIATE_RISK_MONITORING: [&str; 3] = [
    "Serum calcium q6h for first 48 hours",
    "Consider ionized calcium monitoring",
    "Enhanced supplementation: Calcium carbonate 2-3g TID, Calcitriol 0.5-1.0 mcg BID",
];

const HIGH_RISK_MONITORING: [&str; 3] = [
    "Continuous cardiac monitoring",
    "Serum calcium q4-6h",
    "Prophylactic treatment: High-dose calcium carbonate 3-4g TID, Calcitriol 1.0-2.0 mcg BID",
];

/// Observed HBS incidence (%) per risk band in the derivation cohort.
pub fn observed_hbs_rate(category: RiskCategory) -> f64 {
    match category {
        RiskCategory::Low => 23.8,
        RiskCategory::Intermediate => 50.0,
        RiskCategory::High => 93.3,
    }
}

pub fn monitoring_protocol(category: RiskCategory) -> &'static [&'static str; 3] {
    match category {
        RiskCategory::Low => &LOW_RISK_MONITORING,
        RiskCategory::Intermediate => &INTERMEDIATE_RISK_MONITORING,
        RiskCategory::High => &HIGH_RISK_MONITORING,
    }
}

/// Management guidance for one band, as presented on the guidelines page.
#[derive(Debug, Clone, Copy)]
pub struct CategoryGuideline {
    pub category: RiskCategory,
    pub recommendations: &'static [&'static str; 5],
    pub monitoring_protocol: &'static [&'static str; 3],
}

/// Guidance for every band, lowest band first.
pub fn clinical_guidelines() -> [CategoryGuideline; 3] {
    RiskCategory::ALL.map(|category| CategoryGuideline {
        category,
        recommendations: category.recommendations(),
        monitoring_protocol: monitoring_protocol(category),
    })
}

/// Cohort and methodology notes for the published model.
#[derive(Debug, Clone, Copy)]
pub struct ResearchBackground {
    pub syndrome_features: &'static [&'static str],
    pub screened_patients: u32,
    pub total_patients: u32,
    pub hbs_cases: u32,
    pub hbs_incidence_percent: f64,
    pub mean_age: f64,
    pub age_sd: f64,
    pub male_percent: f64,
    pub diabetes_percent: f64,
    pub hypertension_percent: f64,
    pub development_notes: &'static [&'static str],
}

pub const RESEARCH_BACKGROUND: ResearchBackground = ResearchBackground {
    syndrome_features: &[
        "Severe, prolonged hypocalcemia",
        "Hypophosphatemia",
        "Hypomagnesemia",
        "Increased bone mineral uptake",
        "Potential for life-threatening complications",
    ],
    screened_patients: 251,
    total_patients: 227,
    hbs_cases: 113,
    hbs_incidence_percent: 49.8,
    mean_age: 52.7,
    age_sd: 14.2,
    male_percent: 56.4,
    diabetes_percent: 42.7,
    hypertension_percent: 81.1,
    development_notes: &[
        "Variable Selection: LASSO regularization",
        "Internal Validation: 500 bootstrap iterations",
        "Performance Assessment: Discrimination, calibration, clinical utility",
        "Risk Stratification: Three clinically meaningful categories",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_band_has_five_recommendations_and_three_protocol_lines() {
        for guideline in clinical_guidelines() {
            assert_eq!(guideline.recommendations.len(), 5);
            assert_eq!(guideline.monitoring_protocol.len(), 3);
        }
    }

    #[test]
    fn guidelines_are_ordered_lowest_band_first() {
        let order: Vec<RiskCategory> = clinical_guidelines()
            .iter()
            .map(|g| g.category)
            .collect();
        assert_eq!(order, RiskCategory::ALL.to_vec());
    }

    #[test]
    fn observed_rates_increase_with_band() {
        let rates: Vec<f64> = RiskCategory::ALL
            .iter()
            .map(|&c| observed_hbs_rate(c))
            .collect();
        assert_eq!(rates, vec![23.8, 50.0, 93.3]);
    }

    #[test]
    fn cohort_counts_are_consistent_with_incidence() {
        let b = RESEARCH_BACKGROUND;
        let incidence = 100.0 * b.hbs_cases as f64 / b.total_patients as f64;
        assert!((incidence - b.hbs_incidence_percent).abs() < 0.05);
        assert!(b.total_patients <= b.screened_patients);
    }
}
