//! Common regex patterns for purchase-order extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Ten-digit order number
    pub static ref ORDER_NUMBER: Regex = Regex::new(r"\b(\d{10})\b").unwrap();

    // Day-MonAbbrev-Year, e.g. 5-Jan-2024
    pub static ref PO_DATE: Regex = Regex::new(
        r"(\d{1,2})-([A-Za-z]{3})-(\d{4})"
    ).unwrap();

    // Dotted line identifier, e.g. 1.1 or 12.3
    pub static ref LINE_NUMBER: Regex = Regex::new(r"^\d+\.\d+$").unwrap();

    // Table cells holding a price or an extended amount
    pub static ref DECIMAL_CELL: Regex = Regex::new(r"^\d+\.\d{2,}$").unwrap();

    // Prices in running text, optionally with a currency symbol
    pub static ref PRICE: Regex = Regex::new(r"[$€£]?\d+\.\d{2}").unwrap();
}

/// Check whether a trimmed string is a dotted line identifier.
pub fn is_line_number(s: &str) -> bool {
    LINE_NUMBER.is_match(s.trim())
}
