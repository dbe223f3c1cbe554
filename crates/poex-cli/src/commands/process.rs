//! Process command - extract line items from a single purchase-order PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use poex_core::order::DocumentParser;
use poex_core::pdf::PdfExtractor;
use poex_core::{LineItemRecord, ParsedDocument};

use super::load_config;
use crate::output::{record_row, write_rows};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

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
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let file_name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Reading PDF...");

    let data = fs::read(&args.input)?;

    pb.set_message("Extracting line items...");
    let parser = DocumentParser::with_processor(PdfExtractor::with_config(config.pdf.clone()))
        .with_config(config.extraction.clone());
    let parsed = parser.try_parse(&data, &file_name)?;

    pb.finish_and_clear();

    let output = format_document(&parsed, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} line items written to {}",
            style("✓").green(),
            parsed.records.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_document(parsed: &ParsedDocument, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&parsed.records)?)),
        OutputFormat::Csv => format_csv(&parsed.records),
        OutputFormat::Text => Ok(format_text(parsed)),
    }
}

fn format_csv(records: &[LineItemRecord]) -> anyhow::Result<String> {
    let rows: Vec<_> = records.iter().map(record_row).collect();

    let mut buf = Vec::new();
    write_rows(&mut buf, &rows)?;
    Ok(String::from_utf8(buf)?)
}

fn format_text(parsed: &ParsedDocument) -> String {
    let Some(first) = parsed.records.first() else {
        return "No line items found\n".to_string();
    };

    let mut output = String::new();

    output.push_str(&format!("Order: {}\n", first.order_number));
    output.push_str(&format!("Date: {}\n", first.order_date));
    output.push_str(&format!("Layout: {:?}\n", parsed.mode));
    output.push('\n');

    output.push_str(&format!("Ship to: {}\n", first.ship_to));
    output.push_str(&format!("Ordering office: {}\n", first.ordering_office));
    output.push('\n');

    output.push_str("Line items:\n");
    for record in &parsed.records {
        output.push_str(&format!(
            "  {:<6} {:<20} qty {:<8} @ {:<10} = {:<12} due {}\n",
            record.line,
            record.part_number,
            record.quantity,
            record.unit_price,
            record.amount,
            record.delivery_date
        ));
    }

    output
}
