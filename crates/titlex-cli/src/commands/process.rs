//! Process command - extract fields from a single title report.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, trace};

use titlex_core::{ReportExtractor, WordTable};

use super::output::{format_report, OutputFormat};
use super::{load_config, load_export};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input document, or a saved OCR export with --from-export
    #[arg(required = true)]
    input: PathBuf,

    /// Treat the input as a previously saved OCR export (JSON)
    #[arg(long)]
    from_export: bool,

    /// Save the OCR export to this path for later reuse
    #[arg(long)]
    save_export: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print the fields that could not be extracted
    #[arg(long)]
    show_warnings: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message(if args.from_export {
        "Loading OCR export..."
    } else {
        "Running OCR..."
    });
    pb.set_position(10);

    let export = load_export(&args.input, args.from_export, &config.ocr).await?;

    if let Some(path) = &args.save_export {
        export.save(path)?;
        debug!("Saved OCR export to {}", path.display());
    }

    pb.set_message("Building word table...");
    pb.set_position(50);

    let table = WordTable::from_export(&export)?;
    debug!("Word table has {} words on {} pages", table.len(), table.page_count());
    trace!("OCR text:\n{}", table.text());

    pb.set_message("Extracting fields...");
    pb.set_position(70);

    let result = ReportExtractor::from_config(&config.extraction).extract(&table);

    pb.finish_with_message("Done");

    let output = format_report(&result.report, args.format, args.pretty)?;

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

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Extraction warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    debug!(
        "Extraction took {}ms, total {:?}",
        result.processing_time_ms,
        start.elapsed()
    );

    Ok(())
}
