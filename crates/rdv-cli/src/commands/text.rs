//! Text command - show what the hybrid resolver reads from a receipt.

use std::path::PathBuf;

use clap::Args;
use console::style;

use rdv_core::AmountExtractor;

/// Arguments for the text command.
#[derive(Args)]
pub struct TextArgs {
    /// Receipt PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: TextArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extractor = AmountExtractor::from_config(&config)?;
    let extracted = extractor.extract_text_at(&args.input);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&extracted)?);
        return Ok(());
    }

    eprintln!(
        "{} Source: {} ({} page(s): {:?} characters)",
        style("ℹ").blue(),
        extracted.source,
        extracted.page_chars.len(),
        extracted.page_chars
    );
    println!("{}", extracted.text);

    Ok(())
}
