//! Core library for purchase-order PDF processing.
//!
//! This crate provides:
//! - PDF page extraction (text, ruled tables, positioned words)
//! - Order number, order date and address block extraction
//! - Line item recovery from tables or from text-flow layouts
//! - Batch processing with duplicate document detection

pub mod batch;
pub mod error;
pub mod models;
pub mod order;
pub mod pdf;

pub use batch::{
    Attachment, AttachmentOutcome, BatchProcessor, BatchResult, BatchSummary, LogProgress,
    ProgressSink,
};
pub use error::{ExtractionError, PdfError, PoexError, Result};
pub use models::{LineFields, LineItemRecord, OrderHeader, PoexConfig};
pub use order::{DocumentParser, ParseMode, ParsedDocument};
pub use pdf::{PageSource, PdfExtractor, PdfPage, PdfProcessor, PositionedWord, Table};
