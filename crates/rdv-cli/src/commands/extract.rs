//! Extract command - amount of a single receipt.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use rdv_core::amount::format_brl;
use rdv_core::models::document::{Category, Document};
use rdv_core::models::report::FileOutcome;
use rdv_core::AmountExtractor;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Receipt PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Document category (toll, meal, lodging)
    #[arg(short, long)]
    category: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let category: Category = args.category.parse()?;
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let document = Document::open(&args.input, category)?;

    info!("Processing {} as {}", args.input.display(), category);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting {}...", document.name()));

    let extractor = AmountExtractor::from_config(&config)?;
    let outcome = extractor.process(&document);

    pb.finish_and_clear();

    let output = format_outcome(&outcome, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_outcome(outcome: &FileOutcome, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Text => Ok(format_text(outcome)),
    }
}

fn format_text(outcome: &FileOutcome) -> String {
    let category = outcome
        .category
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match &outcome.error {
        Some(error) => format!("{} [{}]: error: {}", outcome.name, category, error),
        None => format!("{} [{}]: {}", outcome.name, category, format_brl(outcome.amount)),
    }
}
