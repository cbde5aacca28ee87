//! Batch command - process receipts of every category and total them.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use rdv_core::models::config::RdvConfig;
use rdv_core::models::document::Category;
use rdv_core::models::report::{BatchSummary, FileOutcome};
use rdv_core::AmountExtractor;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Toll statements (file or glob pattern, repeatable)
    #[arg(long)]
    toll: Vec<String>,

    /// Meal receipts (file or glob pattern, repeatable)
    #[arg(long)]
    meal: Vec<String>,

    /// Lodging invoices (file or glob pattern, repeatable)
    #[arg(long)]
    lodging: Vec<String>,

    /// Number of documents processed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Write the JSON summary here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a per-file CSV summary
    #[arg(long)]
    summary: Option<PathBuf>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(super::load_config(config_path)?);

    let mut inputs: Vec<(Category, PathBuf)> = Vec::new();
    for (category, patterns) in [
        (Category::Toll, &args.toll),
        (Category::Meal, &args.meal),
        (Category::Lodging, &args.lodging),
    ] {
        for pattern in patterns {
            let files = expand_pattern(pattern)?;
            if files.is_empty() {
                warn!("No PDF files match {}", pattern);
            }
            inputs.extend(files.into_iter().map(|path| (category, path)));
        }
    }

    if inputs.is_empty() {
        anyhow::bail!("No matching files found; use --toll, --meal or --lodging");
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        inputs.len()
    );

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(inputs.len());

    for (category, path) in inputs {
        let permit = semaphore.clone().acquire_owned().await?;
        let config = Arc::clone(&config);
        let task_path = path.clone();

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            process_file(&config, category, &task_path)
        });
        handles.push((category, path, handle));
    }

    let mut summary = BatchSummary::new();
    for (category, path, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => FileOutcome::failure(Some(category), file_name(&path), e),
        };
        debug!("{}: {}", outcome.name, outcome.amount);
        summary.record(outcome);
        pb.inc(1);
    }

    pb.finish_and_clear();

    let json = serde_json::to_string_pretty(&summary)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("{} Summary written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", json),
    }

    if let Some(csv_path) = &args.summary {
        write_summary(csv_path, &summary)?;
        eprintln!("{} CSV summary written to {}", style("✓").green(), csv_path.display());
    }

    let failed: Vec<&FileOutcome> = summary.failed().collect();
    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        summary.files.len(),
        start.elapsed()
    );
    for category in Category::ALL {
        eprintln!("   {:<8} {}", category.as_str(), summary.subtotal(category));
    }
    eprintln!("   {:<8} {}", "total", summary.total());

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for outcome in &failed {
            eprintln!(
                "  - {}: {}",
                outcome.name,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// PDF files matched by a file name or glob pattern, sorted.
fn expand_pattern(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn process_file(config: &RdvConfig, category: Category, path: &Path) -> FileOutcome {
    match AmountExtractor::from_config(config) {
        Ok(extractor) => extractor.process_path(path, category.as_str()),
        Err(e) => FileOutcome::failure(Some(category), file_name(path), e),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn write_summary(path: &Path, summary: &BatchSummary) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["category", "filename", "status", "amount", "error"])?;

    for outcome in &summary.files {
        let category = outcome.category.map(|c| c.as_str()).unwrap_or("");
        let status = if outcome.is_error() { "error" } else { "success" };
        wtr.write_record([
            category,
            &outcome.name,
            status,
            &outcome.amount.to_string(),
            outcome.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
