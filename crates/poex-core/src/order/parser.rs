//! Document parser: picks the table or text-flow path and assembles records.

use tracing::{debug, info, warn};

use super::blocks::{extract_ordering_office_coordinates, extract_ship_to_coordinates};
use super::rules::{extract_order_date, extract_order_number};
use super::table::parse_tables;
use super::vertical::parse_vertical_text;
use crate::error::{ExtractionError, PdfError, Result};
use crate::models::{ExtractionConfig, LineItemRecord, OrderHeader};
use crate::pdf::{PageSource, PdfExtractor, PdfProcessor, Table};

/// Which parser produced a document's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// At least one table was found; items come from tables only.
    Table,
    /// No tables anywhere; items come from page text.
    Vertical,
}

/// Line items recovered from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub records: Vec<LineItemRecord>,
    pub mode: ParseMode,
}

/// Purchase-order parser over a PDF page source.
pub struct DocumentParser<P: PdfProcessor = PdfExtractor> {
    processor: P,
    config: ExtractionConfig,
}

impl DocumentParser<PdfExtractor> {
    /// Create a parser backed by the default PDF extractor.
    pub fn new() -> Self {
        Self::with_processor(PdfExtractor::new())
    }
}

impl Default for DocumentParser<PdfExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PdfProcessor> DocumentParser<P> {
    /// Create a parser backed by a custom page source.
    pub fn with_processor(processor: P) -> Self {
        Self {
            processor,
            config: ExtractionConfig::default(),
        }
    }

    /// Set extraction heuristics.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse a document, logging failures and returning no records for them.
    pub fn parse(&self, data: &[u8], pdf_file: &str) -> Vec<LineItemRecord> {
        match self.try_parse(data, pdf_file) {
            Ok(parsed) => parsed.records,
            Err(e) => {
                warn!("Failed to parse {}: {}", pdf_file, e);
                Vec::new()
            }
        }
    }

    /// Parse a document, reporting load and page failures.
    pub fn try_parse(&self, data: &[u8], pdf_file: &str) -> Result<ParsedDocument> {
        let pages = self.processor.load_pages(data)?;
        Ok(self.parse_pages(&pages, pdf_file)?)
    }

    /// Parse already-extracted pages.
    ///
    /// Document fields come from the whole text (order number, order date)
    /// and from the first page's words (address blocks).
    pub fn parse_pages<S: PageSource>(
        &self,
        pages: &[S],
        pdf_file: &str,
    ) -> std::result::Result<ParsedDocument, ExtractionError> {
        let first_page = pages.first().ok_or(ExtractionError::EmptyDocument)?;

        let mut full_text = String::new();
        let mut tables: Vec<Table> = Vec::new();
        for (i, page) in pages.iter().enumerate() {
            let page_error = |source: PdfError| ExtractionError::Page { page: i + 1, source };

            full_text.push_str(&page.extract_text().map_err(page_error)?);
            full_text.push('\n');
            tables.extend(page.extract_tables().map_err(page_error)?);
        }

        let header = OrderHeader {
            pdf_file: pdf_file.to_string(),
            order_number: extract_order_number(&full_text),
            order_date: extract_order_date(&full_text),
            ship_to: extract_ship_to_coordinates(first_page, &self.config),
            ordering_office: extract_ordering_office_coordinates(first_page, &self.config),
        };
        debug!(
            "{}: order {:?} dated {:?}",
            pdf_file, header.order_number, header.order_date
        );

        let has_tables = tables.iter().any(|table| !table.is_empty());
        let (mode, items) = if has_tables {
            (ParseMode::Table, parse_tables(&tables))
        } else {
            (
                ParseMode::Vertical,
                parse_vertical_text(&full_text, self.config.vertical_lookahead),
            )
        };

        info!(
            "{}: {} line items from {} pages ({:?})",
            pdf_file,
            items.len(),
            pages.len(),
            mode
        );

        let records = items
            .into_iter()
            .map(|fields| LineItemRecord::new(&header, fields))
            .collect();

        Ok(ParsedDocument { records, mode })
    }
}
