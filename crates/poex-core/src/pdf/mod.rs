//! PDF page source: per-page text, ruled tables and positioned words.

mod extractor;
#[cfg(test)]
pub(crate) mod fixtures;

pub use extractor::PdfExtractor;

use serde::{Deserialize, Serialize};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// One table row; `None` marks a grid slot not covered by any cell.
pub type TableRow = Vec<Option<String>>;

/// A table as a grid of cell strings.
pub type Table = Vec<TableRow>;

/// A word with its position on the page.
///
/// `top` is measured downward from the top edge of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedWord {
    pub text: String,
    pub x0: f64,
    pub top: f64,
}

impl PositionedWord {
    pub fn new(text: impl Into<String>, x0: f64, top: f64) -> Self {
        Self {
            text: text.into(),
            x0,
            top,
        }
    }
}

/// Access to the extracted content of a single page.
pub trait PageSource {
    /// Plain text of the page, lines separated by `\n`.
    fn extract_text(&self) -> Result<String>;

    /// Tables detected on the page.
    fn extract_tables(&self) -> Result<Vec<Table>>;

    /// Words with their page coordinates, in reading order.
    fn extract_words(&self) -> Result<Vec<PositionedWord>>;
}

/// Trait for turning raw PDF bytes into pages.
pub trait PdfProcessor {
    type Page: PageSource;

    /// Load a PDF from bytes and extract every page.
    fn load_pages(&self, data: &[u8]) -> Result<Vec<Self::Page>>;
}

/// Content extracted from a single PDF page.
#[derive(Debug, Clone, Default)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    pub text: String,
    pub tables: Vec<Table>,
    pub words: Vec<PositionedWord>,
}

impl PageSource for PdfPage {
    fn extract_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn extract_tables(&self) -> Result<Vec<Table>> {
        Ok(self.tables.clone())
    }

    fn extract_words(&self) -> Result<Vec<PositionedWord>> {
        Ok(self.words.clone())
    }
}
