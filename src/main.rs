use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cardid::core::line::{build_lines, build_lines_diagnostic, RawLine};
use cardid::{derive_card, DeriveRequest, KnowledgeBase};

#[derive(Parser, Debug)]
#[command(name = "cardid")]
#[command(version, about = "Derive trading card identity from OCR line candidates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive a card record from a request payload JSON file
    Derive {
        /// Input payload path ({"lines": [{"text", "confidence"}], ...})
        input: PathBuf,

        /// Write the record here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compact JSON instead of pretty-printed
        #[arg(short, long)]
        compact: bool,
    },

    /// Show the normalized line list the derivation would operate on
    Lines {
        /// Input payload path
        input: PathBuf,

        /// Keep entries that are empty after normalization
        #[arg(short, long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Derive {
            input,
            output,
            compact,
        } => derive(input, output, compact),
        Commands::Lines { input, all } => dump_lines(input, all),
    }
}

fn derive(input: PathBuf, output: Option<PathBuf>, compact: bool) -> Result<()> {
    let request = read_request(&input)?;
    let kb = KnowledgeBase::builtin();
    let record = derive_card(&request, &kb);

    let rendered = if compact {
        serde_json::to_string(&record)?
    } else {
        serde_json::to_string_pretty(&record)?
    };
    match output {
        Some(path) => std::fs::write(&path, rendered)
            .with_context(|| format!("Failed to write record to: {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn dump_lines(input: PathBuf, all: bool) -> Result<()> {
    let request = read_request(&input)?;
    for (label, raw) in [("front", &request.lines), ("back", &request.back_lines)] {
        print_source(label, raw, all);
    }
    for (name, crop) in &request.zone_crops {
        print_source(name, &crop.lines, all);
    }
    Ok(())
}

fn print_source(label: &str, raw: &[RawLine], all: bool) {
    let lines = if all {
        build_lines_diagnostic(raw)
    } else {
        build_lines(raw)
    };
    if lines.is_empty() {
        return;
    }
    println!("[{label}]");
    for line in lines {
        let confidence = line
            .confidence
            .map(|value| format!("{value:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:>3}  {}  {}", line.index, confidence, line.normalized);
    }
}

fn read_request(input: &PathBuf) -> Result<DeriveRequest> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    let payload = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read payload: {}", input.display()))?;
    serde_json::from_str(&payload)
        .with_context(|| format!("Failed to parse payload JSON: {}", input.display()))
}
