//! PDF page extraction backed by pdfplumber.

use std::panic::{self, AssertUnwindSafe};

use pdfplumber::{Page, Pdf, TableSettings, TextOptions, WordOptions};
use tracing::{debug, trace};

use super::{PdfPage, PdfProcessor, PositionedWord, Result};
use crate::error::PdfError;
use crate::models::PdfConfig;

/// PDF page extractor producing text, ruled tables and positioned words.
pub struct PdfExtractor {
    config: PdfConfig,
}

impl PdfExtractor {
    /// Create a new PDF extractor with default tolerances.
    pub fn new() -> Self {
        Self {
            config: PdfConfig::default(),
        }
    }

    /// Create an extractor with custom tolerances.
    pub fn with_config(config: PdfConfig) -> Self {
        Self { config }
    }

    fn word_options(&self) -> WordOptions {
        WordOptions {
            x_tolerance: self.config.x_tolerance,
            y_tolerance: self.config.y_tolerance,
            ..WordOptions::default()
        }
    }

    fn text_options(&self) -> TextOptions {
        TextOptions {
            y_tolerance: self.config.y_tolerance,
            ..TextOptions::default()
        }
    }

    fn load_document(data: &[u8]) -> Result<Pdf> {
        let pdf = Pdf::open(data, None).map_err(|e| PdfError::Parse(e.to_string()))?;

        if pdf.page_count() == 0 {
            return Err(PdfError::NoPages);
        }

        Ok(pdf)
    }

    /// Text, words and lattice tables of one page.
    fn page_content(&self, number: u32, page: &Page) -> PdfPage {
        let words: Vec<PositionedWord> = page
            .extract_words(&self.word_options())
            .into_iter()
            .map(|w| PositionedWord::new(w.text, w.bbox.x0, w.bbox.top))
            .collect();
        let text = page.extract_text(&self.text_options());
        let tables = page.extract_tables(&TableSettings::default());

        trace!("Page {}: {} chars", number, page.chars().len());
        debug!("Page {}: {} words, {} tables", number, words.len(), tables.len());

        PdfPage {
            number,
            text,
            tables,
            words,
        }
    }

    fn collect_pages(&self, pdf: &Pdf) -> Result<Vec<PdfPage>> {
        let mut pages = Vec::with_capacity(pdf.page_count());

        for (i, page) in pdf.pages_iter().enumerate() {
            let number = i as u32 + 1;
            let page = page.map_err(|e| {
                PdfError::ContentExtraction(format!("page {}: {}", number, e))
            })?;

            // The content stream interpreter can panic on malformed input.
            let content = panic::catch_unwind(AssertUnwindSafe(|| self.page_content(number, &page)))
                .map_err(|_| {
                    PdfError::ContentExtraction(format!(
                        "page {}: content stream interpreter panicked",
                        number
                    ))
                })?;
            pages.push(content);
        }

        Ok(pages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    type Page = PdfPage;

    fn load_pages(&self, data: &[u8]) -> Result<Vec<PdfPage>> {
        let pdf = Self::load_document(data)?;
        let pages = self.collect_pages(&pdf)?;

        debug!("Loaded PDF with {} pages", pages.len());
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_text(cell: &Option<String>) -> &str {
        cell.as_deref().map(str::trim).unwrap_or("")
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let extractor = PdfExtractor::new();
        let err = extractor.load_pages(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_extracts_text_words_and_tables() {
        let pages = PdfExtractor::new()
            .load_pages(&crate::pdf::fixtures::purchase_order_pdf())
            .unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert!(pages[0].text.contains("4500012345"));
        assert!(pages[0].words.iter().any(|w| w.text == "Part" && w.x0 >= 150.0));

        assert_eq!(pages[0].tables.len(), 1);
        let table = &pages[0].tables[0];
        assert_eq!(table.len(), 2);
        assert_eq!(cell_text(&table[0][0]), "Line");
        assert_eq!(cell_text(&table[0][1]), "Part");
        assert_eq!(cell_text(&table[1][0]), "1.1");
        assert_eq!(cell_text(&table[1][1]), "ABC123/B");
    }

    #[test]
    fn test_words_use_top_down_coordinates() {
        let pages = PdfExtractor::new()
            .load_pages(&crate::pdf::fixtures::purchase_order_pdf())
            .unwrap();

        let title = pages[0].words.iter().find(|w| w.text == "Purchase").unwrap();
        let line = pages[0].words.iter().find(|w| w.text == "Line").unwrap();
        assert!(title.top < line.top);
        assert!(title.top < 100.0);
    }
}
