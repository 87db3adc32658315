#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(clippy::no_effect_underscore_binding)]

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::process;

use hbs_risk::batch::run_batch;
use hbs_risk::domain::{InputField, RangePolicy, prepare};
use hbs_risk::evaluate;
use hbs_risk::model::ModelCard;
use hbs_risk::report::AssessmentReport;
use hbs_risk::report::render::{Renderer, TextRenderer};
use hbs_risk::settings::Settings;
use hbs_risk::types::PatientInputs;

#[derive(Clone, Copy, ValueEnum)]
pub enum RangePolicyCli {
    Clamp,
    Warn,
    Reject,
}

impl From<RangePolicyCli> for RangePolicy {
    fn from(value: RangePolicyCli) -> Self {
        match value {
            RangePolicyCli::Clamp => RangePolicy::Clamp,
            RangePolicyCli::Warn => RangePolicy::Warn,
            RangePolicyCli::Reject => RangePolicy::Reject,
        }
    }
}

#[derive(Args)]
pub struct AssessArgs {
    /// Patient age in years [18-85]
    #[arg(long, allow_negative_numbers = true)]
    pub age: Option<f64>,

    /// Serum phosphate level at 1 month post-surgery, mmol/L [0.50-4.00]
    #[arg(long, allow_negative_numbers = true)]
    pub phosphate: Option<f64>,

    /// Serum alkaline phosphatase at 1 month post-surgery, U/L [50-1500]
    #[arg(long, allow_negative_numbers = true)]
    pub alp: Option<f64>,

    /// Parathyroid hormone level at 3 months post-surgery, pmol/L [15-600]
    #[arg(long, allow_negative_numbers = true)]
    pub pth: Option<f64>,

    /// Path to a settings file (.toml)
    #[arg(long)]
    pub settings: Option<String>,

    /// What to do with values outside the validated ranges (overrides the settings file)
    #[arg(long, value_enum)]
    pub range_policy: Option<RangePolicyCli>,

    /// Skip the gauge and comparison charts
    #[arg(long)]
    pub no_charts: bool,

    /// Also write the assessment to this path as TOML
    #[arg(long, value_name = "PATH")]
    pub save: Option<String>,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Path to a TSV file with age, phosphate_1mo, alp_1mo, pth_3mo (and optional sample_id) columns
    pub input: String,

    /// Where to write the predictions table
    #[arg(long, default_value = "predictions.tsv")]
    pub output: String,

    /// Path to a settings file (.toml)
    #[arg(long)]
    pub settings: Option<String>,

    /// What to do with values outside the validated ranges (overrides the settings file)
    #[arg(long, value_enum)]
    pub range_policy: Option<RangePolicyCli>,
}

#[derive(Args)]
pub struct ModelArgs {
    /// Also write the model card to this path as TOML
    #[arg(long, value_name = "PATH")]
    pub save: Option<String>,
}

#[derive(Args)]
pub struct SettingsArgs {
    /// Where to write the settings file
    #[arg(default_value = "hbs-risk.toml")]
    pub output: String,
}

#[derive(Parser)]
#[command(
    name = "hbs-risk",
    about = "Hungry Bone Syndrome risk calculator for post-parathyroidectomy patients",
    long_about = "Evaluates the published HBS logistic regression model for a patient, \
                 classifies the probability into a risk band and prints the matching \
                 clinical recommendations."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single patient
    #[command(about = "Calculate HBS risk for one patient")]
    Assess(AssessArgs),

    /// Score every patient in a table
    #[command(about = "Score a patient table (outputs: predictions.tsv)")]
    Batch(BatchArgs),

    /// Describe the published model
    #[command(about = "Show model formula, coefficients and performance")]
    Model(ModelArgs),

    /// Management guidance per risk band
    #[command(about = "Show clinical management guidelines")]
    Guidelines,

    /// Study background
    #[command(about = "Show research background")]
    Background,

    /// Write the default settings as a starting point for editing
    #[command(about = "Write a default settings file (.toml)")]
    Settings(SettingsArgs),

    /// Display version and build information
    #[command(about = "Display version and build information")]
    Version,
}

fn resolve_settings(
    path: Option<&str>,
    range_policy: Option<RangePolicyCli>,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::load_or_default(path)?;
    if let Some(policy) = range_policy {
        settings.range_policy = policy.into();
    }
    Ok(settings)
}

fn assess(args: AssessArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = resolve_settings(args.settings.as_deref(), args.range_policy)?;
    if args.no_charts {
        settings.draw_charts = false;
    }

    let inputs = PatientInputs::new(
        args.age.unwrap_or(InputField::Age.domain().default),
        args.phosphate
            .unwrap_or(InputField::Phosphate1mo.domain().default),
        args.alp.unwrap_or(InputField::Alp1mo.domain().default),
        args.pth.unwrap_or(InputField::Pth3mo.domain().default),
    );

    let prepared = prepare(inputs, settings.range_policy)?;
    let assessment = evaluate(&prepared.inputs)?;

    let renderer = TextRenderer::from_settings(&settings);
    print!("{}", renderer.render_assessment(&prepared, &assessment));

    if let Some(path) = args.save {
        AssessmentReport::new(&prepared, &assessment).save(&path)?;
        println!("Assessment saved to: {path}");
    }
    Ok(())
}

fn batch(args: BatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = resolve_settings(args.settings.as_deref(), args.range_policy)?;

    println!("Scoring patients from: {}", args.input);
    let summary = run_batch(&args.input, &args.output, settings.range_policy)?;
    println!(
        "Scored {} patients: {} low, {} intermediate, {} high risk",
        summary.total, summary.low, summary.intermediate, summary.high
    );
    if summary.adjusted > 0 {
        println!(
            "{} patients had values outside the validated ranges (policy: {:?})",
            summary.adjusted, settings.range_policy
        );
    }
    println!("Predictions saved to: {}", args.output);
    Ok(())
}

fn model(args: ModelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let card = ModelCard::published();
    print!("{}", TextRenderer::default().render_model_card(&card));
    if let Some(path) = args.save {
        card.save(&path)?;
        println!("Model card saved to: {path}");
    }
    Ok(())
}

fn write_settings(args: SettingsArgs) -> Result<(), Box<dyn std::error::Error>> {
    Settings::default().save(&args.output)?;
    println!("Default settings written to: {}", args.output);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let Cli { command } = cli;

    let result = match command {
        Some(Commands::Assess(args)) => assess(args),
        Some(Commands::Batch(args)) => batch(args),
        Some(Commands::Model(args)) => model(args),
        Some(Commands::Guidelines) => {
            print!("{}", TextRenderer::default().render_guidelines());
            Ok(())
        }
        Some(Commands::Background) => {
            print!("{}", TextRenderer::default().render_background());
            Ok(())
        }
        Some(Commands::Settings(args)) => write_settings(args),
        Some(Commands::Version) => {
            print_version_info();
            Ok(())
        }
        None => {
            Cli::command().print_help().expect("print help");
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Renders an age in seconds as e.g. "2.4 hours ago", using the largest unit that fits.
fn format_duration_ago(seconds: u64) -> String {
    const UNITS: [(&str, u64); 4] = [
        ("weeks", 7 * 24 * 3600),
        ("days", 24 * 3600),
        ("hours", 3600),
        ("minutes", 60),
    ];

    UNITS
        .iter()
        .find(|(_, size)| seconds >= *size)
        .map(|(unit, size)| format!("{:.1} {unit} ago", seconds as f64 / *size as f64))
        .unwrap_or_else(|| format!("{seconds} seconds ago"))
}

fn print_version_info() {
    let version = env!("CARGO_PKG_VERSION");
    let build_timestamp: u64 = env!("HBS_BUILD_TIMESTAMP").parse().unwrap_or(0);

    println!("hbs-risk {}", version);
    let card = ModelCard::published();
    println!(
        "Model: {} (AUC {}, n = {})",
        card.name, card.performance.auc, card.performance.cohort_size
    );

    if build_timestamp > 0 {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        if now > build_timestamp {
            println!("Built: {}", format_duration_ago(now - build_timestamp));
        } else {
            println!("Built: just now");
        }
    }
}
