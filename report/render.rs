//! Terminal rendering of assessments and reference pages.

use crate::domain::{InputField, PreparedInputs};
use crate::guidelines::{RESEARCH_BACKGROUND, clinical_guidelines};
use crate::model::{Effect, ModelCard};
use crate::settings::Settings;
use crate::types::{RiskAssessment, RiskCategory};

use super::chart::{ComparisonChart, GaugeChart, predictor_effects};

const LABEL_WIDTH: usize = 28;

const DISCLAIMER: &str = "Developed for clinical research and educational purposes.\n\
Always consult with healthcare professionals for clinical decisions.";

/// Turns engine output and static reference content into displayable text.
pub trait Renderer {
    fn render_assessment(&self, prepared: &PreparedInputs, assessment: &RiskAssessment) -> String;
    fn render_model_card(&self, card: &ModelCard) -> String;
    fn render_guidelines(&self) -> String;
    fn render_background(&self) -> String;
}

/// Plain-text renderer with block-character charts.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub decimals: usize,
    pub draw_charts: bool,
    pub chart_width: usize,
}

impl TextRenderer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            decimals: settings.decimals,
            draw_charts: settings.draw_charts,
            chart_width: settings.chart_width,
        }
    }

    fn percent(&self, value: f64) -> String {
        format!("{:.*}%", self.decimals, value)
    }

    /// Column (0-based, excluding the left frame) of a percentage on the chart scale.
    fn position(&self, percent: f64) -> usize {
        let span = (self.chart_width - 1) as f64;
        ((percent.clamp(0.0, 100.0) / 100.0) * span).round() as usize
    }

    pub fn draw_gauge(&self, gauge: &GaugeChart) -> String {
        let width = self.chart_width;
        let mut out = format!("{}\n", gauge.title);

        out.push_str(&format!(
            "{}▼ {}\n",
            " ".repeat(self.position(gauge.value) + 1),
            self.percent(gauge.value)
        ));

        let dial: String = (0..width)
            .map(|i| {
                let midpoint = (i as f64 + 0.5) * 100.0 / width as f64;
                band_fill(gauge.band_at(midpoint))
            })
            .collect();
        out.push_str(&format!("|{dial}|\n"));

        let mut scale = vec![' '; width + 2];
        scale[self.position(gauge.reference_mark) + 1] = '┆';
        place_label(&mut scale, 0, "0");
        for band in &gauge.bands[1..] {
            place_label(&mut scale, self.position(band.start) + 1, &format!("{}", band.start));
        }
        place_label(&mut scale, width - 1, "100");
        out.push_str(scale.iter().collect::<String>().trim_end());
        out.push('\n');
        out
    }

    pub fn draw_comparison(&self, chart: &ComparisonChart) -> String {
        let width = self.chart_width;
        let mut out = format!("{}\n", chart.title);
        for bar in &chart.bars {
            let filled = ((bar.observed_rate / 100.0) * width as f64).round() as usize;
            out.push_str(&format!(
                "{:<LABEL_WIDTH$}|{}{}| {}\n",
                bar.category.band_label(),
                "█".repeat(filled.min(width)),
                " ".repeat(width - filled.min(width)),
                self.percent(bar.observed_rate)
            ));
            if bar.your_risk > 0.0 {
                let column = self.position(bar.your_risk);
                out.push_str(&format!(
                    "{:<LABEL_WIDTH$}|{}◆{}| {}\n",
                    "  Your Risk",
                    " ".repeat(column),
                    " ".repeat(width - column - 1),
                    self.percent(bar.your_risk)
                ));
            }
        }
        out
    }

    fn draw_predictor_effects(&self, card: &ModelCard) -> String {
        let effects = predictor_effects(card);
        let largest = effects
            .iter()
            .map(|e| e.coefficient.abs())
            .fold(0.0_f64, f64::max);
        let half = self.chart_width / 2;

        let mut out = String::from("Predictor Variables and Their Effects\n");
        for effect in effects {
            let length = if largest > 0.0 {
                ((effect.coefficient.abs() / largest) * half as f64).ceil() as usize
            } else {
                0
            };
            let (left, right) = if effect.coefficient < 0.0 {
                (
                    format!("{}{}", " ".repeat(half - length), "▒".repeat(length)),
                    " ".repeat(half),
                )
            } else {
                (" ".repeat(half), "█".repeat(length) + &" ".repeat(half - length))
            };
            out.push_str(&format!(
                "{:<18}{left}┃{right} {}\n",
                effect.name, effect.coefficient
            ));
        }
        out
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

fn band_fill(category: RiskCategory) -> char {
    match category {
        RiskCategory::Low => '░',
        RiskCategory::Intermediate => '▒',
        RiskCategory::High => '▓',
    }
}

/// Writes `label` into `line` starting at `start`, shifted left if it would overrun.
fn place_label(line: &mut [char], start: usize, label: &str) {
    let chars: Vec<char> = label.chars().collect();
    let start = start.min(line.len().saturating_sub(chars.len()));
    for (offset, c) in chars.into_iter().enumerate() {
        line[start + offset] = c;
    }
}

impl Renderer for TextRenderer {
    fn render_assessment(&self, prepared: &PreparedInputs, assessment: &RiskAssessment) -> String {
        let mut out = String::from("## Patient Information\n");
        for field in InputField::ALL {
            let domain = field.domain();
            out.push_str(&format!(
                "  {}: {} {}\n",
                domain.label,
                domain.format_value(field.get(&prepared.inputs)),
                domain.unit
            ));
        }
        for adjustment in &prepared.adjustments {
            let domain = adjustment.field.domain();
            if adjustment.was_clamped() {
                out.push_str(&format!(
                    "  ⚠️ {} entered as {} was clamped to {} (validated range {}-{} {})\n",
                    domain.label,
                    adjustment.original,
                    adjustment.used,
                    domain.min,
                    domain.max,
                    domain.unit
                ));
            } else {
                out.push_str(&format!(
                    "  ⚠️ {} = {} is outside the validated range {}-{} {}; result is an extrapolation\n",
                    domain.label, adjustment.original, domain.min, domain.max, domain.unit
                ));
            }
        }

        out.push_str("\n## Risk Assessment Results\n");
        out.push_str(&format!(
            "HBS Probability: {}\n",
            self.percent(assessment.probability_percent)
        ));
        out.push_str("Risk of developing Hungry Bone Syndrome\n");
        out.push_str(&format!(
            "{} {} (Probability: {})\n",
            assessment.category.marker(),
            assessment.category.label(),
            self.percent(assessment.probability_percent)
        ));

        out.push_str("\n## Clinical Recommendations\n");
        for recommendation in &assessment.recommendations {
            out.push_str(&format!("• {recommendation}\n"));
        }

        if self.draw_charts {
            out.push_str("\n## Risk Visualization\n");
            out.push_str(&self.draw_gauge(&GaugeChart::new(assessment)));
            out.push_str("\n## Risk Comparison\n");
            out.push_str(&self.draw_comparison(&ComparisonChart::new(assessment)));
        }

        out.push('\n');
        out.push_str(DISCLAIMER);
        out.push('\n');
        out
    }

    fn render_model_card(&self, card: &ModelCard) -> String {
        let performance = &card.performance;
        let mut out = format!("# {}\n\n## Model Performance\n", card.name);
        out.push_str(&format!(
            "• Discrimination (AUC): {} (optimism-corrected)\n",
            performance.auc
        ));
        out.push_str(&format!("• Calibration: {}\n", performance.calibration));
        out.push_str(&format!(
            "• Clinical Utility: Demonstrated across threshold probabilities {}-{}\n",
            performance.clinical_utility_range.0, performance.clinical_utility_range.1
        ));
        out.push_str(&format!(
            "• Validation: {} bootstrap iterations\n",
            performance.bootstrap_iterations
        ));
        out.push_str(&format!(
            "• Validated on {} patients ({}% HBS incidence)\n",
            performance.cohort_size, performance.hbs_incidence_percent
        ));

        out.push_str("\n## Model Formula\n");
        out.push_str(&card.formula);
        out.push('\n');

        out.push_str("\n## Coefficients\n");
        out.push_str(&format!("  {:<18}{}\n", "Intercept", card.intercept));
        for predictor in &card.predictors {
            let direction = match predictor.effect {
                Effect::Protective => "lowers risk",
                Effect::Harmful => "raises risk",
            };
            out.push_str(&format!(
                "  {:<18}{:<12} per {} ({direction})\n",
                predictor.name, predictor.coefficient, predictor.unit
            ));
        }

        if self.draw_charts {
            out.push('\n');
            out.push_str(&self.draw_predictor_effects(card));
        }
        out
    }

    fn render_guidelines(&self) -> String {
        let mut out = String::from("# Clinical Management Guidelines\n");
        for guideline in clinical_guidelines() {
            out.push_str(&format!(
                "\n## {} {}\nClinical Recommendations:\n",
                guideline.category.marker(),
                guideline.category.band_label()
            ));
            for recommendation in guideline.recommendations {
                out.push_str(&format!("  - {recommendation}\n"));
            }
            out.push_str("Monitoring Protocol:\n");
            for line in guideline.monitoring_protocol {
                out.push_str(&format!("  - {line}\n"));
            }
        }
        out
    }

    fn render_background(&self) -> String {
        let b = &RESEARCH_BACKGROUND;
        let mut out = String::from("# Research Background\n\n## What is Hungry Bone Syndrome?\n");
        out.push_str(
            "Hungry Bone Syndrome (HBS) is a serious complication following parathyroidectomy, characterized by:\n",
        );
        for feature in b.syndrome_features {
            out.push_str(&format!("  - {feature}\n"));
        }

        out.push_str("\n## Study Population\n");
        out.push_str(&format!(
            "  - Total Patients: {} (from {} screened)\n",
            b.total_patients, b.screened_patients
        ));
        out.push_str(&format!(
            "  - HBS Cases: {} ({}% incidence)\n",
            b.hbs_cases, b.hbs_incidence_percent
        ));
        out.push_str(&format!("  - Mean Age: {} ± {} years\n", b.mean_age, b.age_sd));
        out.push_str(&format!("  - Gender: {}% male\n", b.male_percent));
        out.push_str(&format!(
            "  - Comorbidities: {}% diabetes, {}% hypertension\n",
            b.diabetes_percent, b.hypertension_percent
        ));

        out.push_str("\n## Model Development\n");
        for note in b.development_notes {
            out.push_str(&format!("  - {note}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RangePolicy, prepare};
    use crate::evaluate::evaluate;
    use crate::types::PatientInputs;

    fn canonical_report(renderer: &TextRenderer) -> String {
        let prepared = prepare(
            PatientInputs::new(55.0, 2.0, 300.0, 150.0),
            RangePolicy::Clamp,
        )
        .unwrap();
        let assessment = evaluate(&prepared.inputs).unwrap();
        renderer.render_assessment(&prepared, &assessment)
    }

    #[test]
    fn probability_is_shown_to_one_decimal_by_default() {
        let text = canonical_report(&TextRenderer::default());
        assert!(text.contains("HBS Probability: 61.1%"));
        assert!(text.contains("🟡 Intermediate Risk (Probability: 61.1%)"));
        assert!(text.contains("Phosphate at 1 month: 2.00 mmol/L"));
        assert!(text.contains("PTH at 3 months: 150 pmol/L"));
    }

    #[test]
    fn decimals_setting_is_respected() {
        let renderer = TextRenderer {
            decimals: 3,
            ..TextRenderer::default()
        };
        assert!(canonical_report(&renderer).contains("HBS Probability: 61.058%"));
    }

    #[test]
    fn recommendations_are_listed_in_order() {
        let text = canonical_report(&TextRenderer::default());
        let positions: Vec<usize> = RiskCategory::Intermediate
            .recommendations()
            .iter()
            .map(|r| text.find(&format!("• {r}")).expect("recommendation missing"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn charts_can_be_disabled() {
        let renderer = TextRenderer {
            draw_charts: false,
            ..TextRenderer::default()
        };
        let text = canonical_report(&renderer);
        assert!(!text.contains("## Risk Visualization"));
        assert!(!text.contains("Risk Category Comparison"));
    }

    #[test]
    fn gauge_needle_sits_at_the_patient_value() {
        let renderer = TextRenderer::default();
        let assessment = evaluate(&PatientInputs::new(55.0, 2.0, 300.0, 150.0)).unwrap();
        let gauge = renderer.draw_gauge(&GaugeChart::new(&assessment));
        let needle_line = gauge.lines().nth(1).unwrap();
        let column = needle_line.chars().position(|c| c == '▼').unwrap();
        // 61.06% of 49 columns rounds to 30, plus the left frame.
        assert_eq!(column, 31);

        let dial_line = gauge.lines().nth(2).unwrap();
        assert_eq!(dial_line.chars().count(), 52);
        assert!(dial_line.starts_with("|░"));
        assert!(dial_line.ends_with("▓|"));
    }

    #[test]
    fn comparison_marks_only_the_matching_band() {
        let text = canonical_report(&TextRenderer::default());
        assert_eq!(text.matches("Your Risk").count(), 1);
        let lines: Vec<&str> = text.lines().collect();
        let marker = lines
            .iter()
            .position(|l| l.contains("Your Risk"))
            .unwrap();
        assert!(lines[marker - 1].starts_with("Intermediate Risk (30-70%)"));
        assert!(lines[marker].ends_with("61.1%"));
    }

    #[test]
    fn clamped_inputs_are_called_out() {
        let prepared = prepare(
            PatientInputs::new(200.0, 2.0, 300.0, 150.0),
            RangePolicy::Clamp,
        )
        .unwrap();
        let assessment = evaluate(&prepared.inputs).unwrap();
        let text = TextRenderer::default().render_assessment(&prepared, &assessment);
        assert!(text.contains("Age: 85 years"));
        assert!(text.contains("Age entered as 200 was clamped to 85"));
    }

    #[test]
    fn model_card_lists_formula_and_performance() {
        let text = TextRenderer::default().render_model_card(&ModelCard::published());
        assert!(text.contains("Discrimination (AUC): 0.742"));
        assert!(text.contains("logit(p) = -2.7425363"));
        assert!(text.contains("Predictor Variables and Their Effects"));
        assert!(text.contains("lowers risk"));
    }

    #[test]
    fn guidelines_cover_every_band() {
        let text = TextRenderer::default().render_guidelines();
        for category in RiskCategory::ALL {
            assert!(text.contains(category.band_label()));
        }
        assert!(text.contains("Serum calcium q4-6h"));
    }

    #[test]
    fn background_reports_the_cohort() {
        let text = TextRenderer::default().render_background();
        assert!(text.contains("Total Patients: 227 (from 251 screened)"));
        assert!(text.contains("HBS Cases: 113 (49.8% incidence)"));
    }
}
