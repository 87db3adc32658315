use std::fs;
use std::process::Command;

use hbs_risk::model::ModelCard;
use hbs_risk::report::AssessmentReport;
use hbs_risk::settings::Settings;
use hbs_risk::RiskCategory;
use tempfile::tempdir;

fn hbs_risk() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hbs-risk"))
}

#[test]
fn assess_defaults_to_the_canonical_patient() {
    let output = hbs_risk().arg("assess").output().expect("run hbs-risk cli");
    assert!(output.status.success(), "CLI exited with {:?}", output.status);

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("HBS Probability: 61.1%"));
    assert!(stdout.contains("Intermediate Risk"));
    assert!(stdout.contains("• Enhanced postoperative monitoring"));
    assert!(stdout.contains("Risk Category Comparison"));
}

#[test]
fn assess_reports_high_risk_patient() {
    let output = hbs_risk()
        .args([
            "assess",
            "--age",
            "30",
            "--phosphate",
            "3.5",
            "--alp",
            "900",
            "--pth",
            "400",
            "--no-charts",
        ])
        .output()
        .expect("run hbs-risk cli");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("High Risk"));
    assert!(stdout.contains("• Consider ICU-level monitoring"));
    assert!(!stdout.contains("Risk Category Comparison"));
}

#[test]
fn reject_policy_fails_on_out_of_range_age() {
    let output = hbs_risk()
        .args(["assess", "--age", "200", "--range-policy", "reject"])
        .output()
        .expect("run hbs-risk cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("outside the validated range"));
}

#[test]
fn negative_values_reach_the_range_policy() {
    let output = hbs_risk()
        .args(["assess", "--phosphate", "-1", "--no-charts"])
        .output()
        .expect("run hbs-risk cli");
    assert!(output.status.success(), "CLI exited with {:?}", output.status);
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("Phosphate at 1 month entered as -1 was clamped to 0.5"));
    assert!(stdout.contains("Phosphate at 1 month: 0.50 mmol/L"));

    let rejected = hbs_risk()
        .args(["assess", "--age=-5", "--range-policy", "reject"])
        .output()
        .expect("run hbs-risk cli");
    assert!(!rejected.status.success());
    let stderr = String::from_utf8(rejected.stderr).expect("utf8 stderr");
    assert!(stderr.contains("outside the validated range"));
}

#[test]
fn settings_command_writes_loadable_defaults() {
    let tmp = tempdir().expect("temporary directory");
    let settings_path = tmp.path().join("hbs-risk.toml");

    let status = hbs_risk()
        .args(["settings", settings_path.to_str().unwrap()])
        .status()
        .expect("run hbs-risk cli");
    assert!(status.success());

    let written = Settings::load(settings_path.to_str().unwrap()).expect("load settings");
    assert_eq!(written, Settings::default());
}

#[test]
fn assess_save_writes_a_toml_report() {
    let tmp = tempdir().expect("temporary directory");
    let report_path = tmp.path().join("assessment.toml");

    let status = hbs_risk()
        .args([
            "assess",
            "--age",
            "200",
            "--save",
            report_path.to_str().expect("path str"),
        ])
        .status()
        .expect("run hbs-risk cli");
    assert!(status.success());

    let report = AssessmentReport::load(report_path.to_str().unwrap()).expect("load report");
    assert_eq!(report.inputs.age, 85.0);
    assert_eq!(report.adjustments.len(), 1);
    assert_eq!(report.assessment.category, RiskCategory::Intermediate);
}

#[test]
fn settings_file_controls_decimals_and_policy() {
    let tmp = tempdir().expect("temporary directory");
    let settings_path = tmp.path().join("settings.toml");
    fs::write(&settings_path, "decimals = 2\nrange_policy = \"reject\"\n").unwrap();

    let output = hbs_risk()
        .args(["assess", "--settings", settings_path.to_str().unwrap()])
        .output()
        .expect("run hbs-risk cli");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("HBS Probability: 61.06%"));

    let rejected = hbs_risk()
        .args([
            "assess",
            "--settings",
            settings_path.to_str().unwrap(),
            "--pth",
            "700",
        ])
        .output()
        .expect("run hbs-risk cli");
    assert!(!rejected.status.success());
}

#[test]
fn batch_writes_predictions_table() {
    let tmp = tempdir().expect("temporary directory");
    let input_path = tmp.path().join("patients.tsv");
    let output_path = tmp.path().join("out.tsv");
    fs::write(
        &input_path,
        "sample_id\tage\tphosphate_1mo\talp_1mo\tpth_3mo\n\
A\t55\t2.00\t300\t150\n\
B\t85\t0.50\t50\t15\n\
C\t18\t4.00\t1500\t600\n",
    )
    .unwrap();

    let output = hbs_risk()
        .args([
            "batch",
            input_path.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
        ])
        .output()
        .expect("run hbs-risk cli");
    assert!(output.status.success(), "CLI exited with {:?}", output.status);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Scored 3 patients: 1 low, 1 intermediate, 1 high risk"));

    let table = fs::read_to_string(&output_path).unwrap();
    let rows: Vec<&str> = table.lines().collect();
    assert_eq!(
        rows[0],
        "sample_id\tlog_odds\tprobability\tprobability_percent\tcategory\tadjusted"
    );
    let categories: Vec<&str> = rows[1..]
        .iter()
        .map(|r| r.split('\t').nth(4).unwrap())
        .collect();
    assert_eq!(categories, vec!["intermediate", "low", "high"]);
}

#[test]
fn model_save_round_trips_the_published_card() {
    let tmp = tempdir().expect("temporary directory");
    let card_path = tmp.path().join("model.toml");

    let output = hbs_risk()
        .args(["model", "--save", card_path.to_str().unwrap()])
        .output()
        .expect("run hbs-risk cli");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Discrimination (AUC): 0.742"));

    let card = ModelCard::load(card_path.to_str().unwrap()).expect("load card");
    assert_eq!(card, ModelCard::published());
}

#[test]
fn reference_pages_print() {
    for (command, needle) in [
        ("guidelines", "Monitoring Protocol:"),
        ("background", "Total Patients: 227"),
        ("version", "Model: HBS post-parathyroidectomy risk model (AUC 0.742"),
    ] {
        let output = hbs_risk().arg(command).output().expect("run hbs-risk cli");
        assert!(output.status.success(), "{command} failed");
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.contains(needle), "{command} output missing {needle:?}");
    }
}
