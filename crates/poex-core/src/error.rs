//! Error types for the poex-core library.

use thiserror::Error;

/// Main error type for the poex library.
#[derive(Error, Debug)]
pub enum PoexError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Line item extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to read or interpret a page.
    #[error("failed to extract page content: {0}")]
    ContentExtraction(String),

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised while recovering line items from one document.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A page could not supply its text, tables or words.
    #[error("page {page}: {source}")]
    Page {
        page: usize,
        #[source]
        source: PdfError,
    },

    /// The document yielded no pages to parse.
    #[error("document has no pages")]
    EmptyDocument,
}

/// Result type for the poex library.
pub type Result<T> = std::result::Result<T, PoexError>;
