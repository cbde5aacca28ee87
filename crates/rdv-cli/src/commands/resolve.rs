//! Resolve command - run only the value resolver over plain text.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use rdv_core::amount::{format_brl, ValueResolver};
use rdv_core::models::document::Category;

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Text file to read (default: stdin)
    input: Option<PathBuf>,

    /// Document category (toll, meal, lodging)
    #[arg(short, long)]
    category: String,

    /// List every candidate instead of only the selected amount
    #[arg(long)]
    candidates: bool,

    /// Print the amount as "R$ 1.234,56"
    #[arg(long)]
    brl: bool,
}

pub async fn run(args: ResolveArgs) -> anyhow::Result<()> {
    let category: Category = args.category.parse()?;

    let text = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let resolver = ValueResolver::new(category);

    if args.candidates {
        for candidate in resolver.candidates(&text) {
            println!(
                "tier={} rank={} amount={}",
                candidate.tier, candidate.rank, candidate.amount
            );
        }
    }

    let amount = resolver.resolve(&text).amount();
    if args.brl {
        println!("{}", format_brl(amount));
    } else {
        println!("{}", amount);
    }

    Ok(())
}
