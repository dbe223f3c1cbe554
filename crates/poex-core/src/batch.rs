//! Batch processing of PDF attachments with duplicate detection.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::models::LineItemRecord;
use crate::order::DocumentParser;
use crate::pdf::{PdfExtractor, PdfProcessor};

/// A candidate document handed over by an attachment source.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    /// When the attachment was received.
    pub received: NaiveDateTime,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, received: NaiveDateTime, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            received,
            data,
        }
    }

    /// Whether the file name has a `.pdf` extension (any case).
    pub fn is_pdf(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".pdf")
    }
}

/// Receiver of human-readable progress messages.
pub trait ProgressSink {
    fn message(&mut self, msg: &str);

    /// Called once per attachment after it has been handled.
    fn attachment_done(&mut self, _attachment: &Attachment, _outcome: &AttachmentOutcome) {}
}

impl<F: FnMut(&str)> ProgressSink for F {
    fn message(&mut self, msg: &str) {
        self(msg)
    }
}

/// Progress sink that forwards messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn message(&mut self, msg: &str) {
        info!("{}", msg);
    }
}

/// What happened to a single attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentOutcome {
    /// Not a PDF.
    Ignored,
    /// Same content as an attachment already processed in this batch.
    Duplicate,
    /// Parsed; may hold zero records if the document could not be read.
    Parsed(Vec<LineItemRecord>),
}

/// Counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// PDFs parsed.
    pub documents: usize,
    /// PDFs skipped as duplicates.
    pub duplicates: usize,
    /// Attachments that were not PDFs.
    pub ignored: usize,
    /// Line items extracted.
    pub records: usize,
}

/// Records and counters from one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub records: Vec<LineItemRecord>,
    pub summary: BatchSummary,
}

/// Processes attachments one at a time, skipping repeated content.
pub struct BatchProcessor<P: PdfProcessor = PdfExtractor> {
    parser: DocumentParser<P>,
    seen: HashSet<String>,
}

impl BatchProcessor<PdfExtractor> {
    pub fn new() -> Self {
        Self::with_parser(DocumentParser::new())
    }
}

impl Default for BatchProcessor<PdfExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PdfProcessor> BatchProcessor<P> {
    pub fn with_parser(parser: DocumentParser<P>) -> Self {
        Self {
            parser,
            seen: HashSet::new(),
        }
    }

    /// Process one attachment.
    pub fn process_one(
        &mut self,
        attachment: &Attachment,
        progress: &mut dyn ProgressSink,
    ) -> AttachmentOutcome {
        if !attachment.is_pdf() {
            debug!("Ignoring non-PDF attachment {}", attachment.file_name);
            return AttachmentOutcome::Ignored;
        }

        let hash = content_hash(&attachment.data);
        if !self.seen.insert(hash) {
            progress.message(&format!("Skipping duplicate: {}", attachment.file_name));
            return AttachmentOutcome::Duplicate;
        }

        progress.message(&format!("Processing {}", attachment.file_name));
        let records = self.parser.parse(&attachment.data, &attachment.file_name);
        progress.message(&format!(
            "Extracted {} line items from {}",
            records.len(),
            attachment.file_name
        ));

        AttachmentOutcome::Parsed(records)
    }

    /// Process attachments in order, collecting every record.
    pub fn process_all<I>(&mut self, attachments: I, progress: &mut dyn ProgressSink) -> BatchResult
    where
        I: IntoIterator<Item = Attachment>,
    {
        let mut result = BatchResult::default();

        for attachment in attachments {
            let outcome = self.process_one(&attachment, progress);
            progress.attachment_done(&attachment, &outcome);

            match outcome {
                AttachmentOutcome::Ignored => result.summary.ignored += 1,
                AttachmentOutcome::Duplicate => result.summary.duplicates += 1,
                AttachmentOutcome::Parsed(records) => {
                    result.summary.documents += 1;
                    result.summary.records += records.len();
                    result.records.extend(records);
                }
            }
        }

        progress.message(&format!(
            "Processed {} documents, {} duplicates skipped, {} line items",
            result.summary.documents, result.summary.duplicates, result.summary.records
        ));
        result
    }
}

/// Hex SHA-256 of document content.
pub fn content_hash(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}
