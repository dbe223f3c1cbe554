//! Batch processing command for folders of purchase-order PDFs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local, NaiveDate};
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use poex_core::order::DocumentParser;
use poex_core::pdf::PdfExtractor;
use poex_core::{Attachment, AttachmentOutcome, BatchProcessor, BatchResult, ProgressSink};

use super::load_config;
use crate::output::CsvOutput;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern selecting the files to process
    #[arg(required = true)]
    input: String,

    /// Output CSV file (default: from configuration)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only process files modified on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    since: Option<NaiveDate>,

    /// Only process files whose name contains this text (case-insensitive)
    #[arg(long)]
    name_contains: Option<String>,

    /// Copy processed PDFs into DIR/YYYY-MM-DD/
    #[arg(long)]
    archive_dir: Option<PathBuf>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{}': {}", s, e))
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files = select_files(&args)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let archive_dir = args.archive_dir.clone().or(config.output.archive_dir.clone());
    let mut output_config = config.output.clone();
    if let Some(path) = &args.output {
        output_config.path = path.clone();
    }
    let output = CsvOutput::from_config(&output_config);
    output.check_path()?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let parser = DocumentParser::with_processor(PdfExtractor::with_config(config.pdf.clone()))
        .with_config(config.extraction.clone());
    let mut processor = BatchProcessor::with_parser(parser);

    let mut failed = Vec::new();
    let attachments = files.into_iter().filter_map(|(path, received)| {
        match read_attachment(&path, received) {
            Ok(attachment) => Some(attachment),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                failed.push((path, e.to_string()));
                pb.inc(1);
                None
            }
        }
    });

    let mut progress = BatchProgress {
        pb: &pb,
        archive_dir: archive_dir.as_deref(),
    };
    let BatchResult { records, summary } = processor.process_all(attachments, &mut progress);

    pb.finish_with_message("Complete");

    let written = output.write(&records)?;

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        summary.documents + summary.duplicates + summary.ignored + failed.len(),
        start.elapsed()
    );
    println!(
        "   {} documents, {} duplicates skipped, {} line items",
        style(summary.documents).green(),
        style(summary.duplicates).yellow(),
        style(summary.records).green()
    );

    if written.rows > 0 {
        println!(
            "{} Wrote {} rows to {} ({} duplicate rows replaced)",
            style("✓").green(),
            written.rows,
            output_config.path.display(),
            written.duplicates_removed
        );
    } else {
        println!("{} No line items to write", style("ℹ").blue());
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

/// Progress bar updates and archiving of parsed attachments.
struct BatchProgress<'a> {
    pb: &'a ProgressBar,
    archive_dir: Option<&'a Path>,
}

impl ProgressSink for BatchProgress<'_> {
    fn message(&mut self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    fn attachment_done(&mut self, attachment: &Attachment, outcome: &AttachmentOutcome) {
        self.pb.inc(1);

        if let (Some(dir), AttachmentOutcome::Parsed(_)) = (self.archive_dir, outcome) {
            match archive(dir, attachment) {
                Ok(dest) => debug!("Archived to {}", dest.display()),
                Err(e) => warn!("Failed to archive {}: {}", attachment.file_name, e),
            }
        }
    }
}

/// Files matching the pattern and filters, with their modification time.
fn select_files(args: &BatchArgs) -> anyhow::Result<Vec<(PathBuf, DateTime<Local>)>> {
    let needle = args.name_contains.as_deref().map(str::to_lowercase);
    let mut files = Vec::new();

    for path in glob(&args.input)?.filter_map(|r| r.ok()) {
        if !path.is_file() {
            continue;
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_lowercase();
        if let Some(needle) = &needle {
            if !name.contains(needle.as_str()) {
                debug!("Skipping {}: name filter", path.display());
                continue;
            }
        }

        let received: DateTime<Local> = fs::metadata(&path)?.modified()?.into();
        if let Some(since) = args.since {
            if received.date_naive() < since {
                debug!("Skipping {}: older than {}", path.display(), since);
                continue;
            }
        }

        files.push((path, received));
    }

    Ok(files)
}

fn read_attachment(path: &Path, received: DateTime<Local>) -> std::io::Result<Attachment> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(Attachment::new(file_name, received.naive_local(), fs::read(path)?))
}

/// Copy an attachment into `dir/YYYY-MM-DD/`.
fn archive(dir: &Path, attachment: &Attachment) -> std::io::Result<PathBuf> {
    let day_dir = dir.join(attachment.received.format("%Y-%m-%d").to_string());
    fs::create_dir_all(&day_dir)?;

    let dest = day_dir.join(&attachment.file_name);
    fs::write(&dest, &attachment.data)?;
    Ok(dest)
}
