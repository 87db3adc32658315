use std::fs::File;
use std::io::{BufWriter, Write};

use super::ScoredPatient;

pub const PREDICTIONS_HEADER: &str =
    "sample_id\tlog_odds\tprobability\tprobability_percent\tcategory\tadjusted";

/// Writes one row per patient, in input order.
///
/// `adjusted` lists the columns the range policy flagged (comma-separated), or `NA`.
pub fn save_predictions(output_path: &str, scored: &[ScoredPatient]) -> Result<(), std::io::Error> {
    let mut file = BufWriter::new(File::create(output_path)?);
    writeln!(file, "{PREDICTIONS_HEADER}")?;

    for patient in scored {
        let adjusted = if patient.adjustments.is_empty() {
            "NA".to_string()
        } else {
            patient
                .adjustments
                .iter()
                .map(|a| a.field.column_name())
                .collect::<Vec<_>>()
                .join(",")
        };
        writeln!(
            file,
            "{}\t{}\t{}\t{}\t{}\t{}",
            patient.sample_id,
            patient.assessment.logit,
            patient.assessment.probability,
            patient.assessment.probability_percent,
            patient.assessment.category.as_str(),
            adjusted
        )?;
    }

    file.flush()
}
