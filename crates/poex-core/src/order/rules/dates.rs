//! Day-MonAbbrev-Year date parsing, e.g. `5-Jan-2024`.

use chrono::NaiveDate;
use tracing::debug;

use super::patterns::PO_DATE;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parse a `D-Mon-YYYY` string into a date.
///
/// The month abbreviation is matched case-insensitively.
pub fn parse_po_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let caps = PO_DATE.captures(s)?;

    let whole = caps.get(0)?;
    if whole.start() != 0 || whole.end() != s.len() {
        return None;
    }

    let day: u32 = caps[1].parse().ok()?;
    let month = MONTHS
        .iter()
        .position(|m| caps[2].eq_ignore_ascii_case(m))? as u32
        + 1;
    let year: i32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalize a date to `YYYYMMDD`, passing unparseable input through unchanged.
pub fn normalize_po_date(s: &str) -> String {
    match parse_po_date(s) {
        Some(date) => date.format("%Y%m%d").to_string(),
        None => s.to_string(),
    }
}

/// Extract the order date: the first date-shaped substring of the document.
///
/// Returns an empty string if the document contains no such substring.
pub fn extract_order_date(text: &str) -> String {
    let Some(m) = PO_DATE.find(text) else {
        return String::new();
    };

    match parse_po_date(m.as_str()) {
        Some(date) => date.format("%Y%m%d").to_string(),
        None => {
            debug!("Order date {:?} is not a calendar date, keeping it as found", m.as_str());
            m.as_str().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_po_date() {
        assert_eq!(parse_po_date("5-Jan-2024"), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(parse_po_date("15-MAR-2024"), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(parse_po_date("31-Feb-2024"), None);
        assert_eq!(parse_po_date("5-Foo-2024"), None);
        assert_eq!(parse_po_date("Due 5-Jan-2024"), None);
    }

    #[test]
    fn test_normalize_po_date() {
        assert_eq!(normalize_po_date("5-Jan-2024"), "20240105");
        assert_eq!(normalize_po_date("unparseable-date"), "unparseable-date");
        assert_eq!(normalize_po_date(""), "");
    }

    #[test]
    fn test_extract_order_date_takes_first() {
        let text = "Order Date: 5-Jan-2024\nDelivery 20-Feb-2024";
        assert_eq!(extract_order_date(text), "20240105");
    }

    #[test]
    fn test_extract_order_date_keeps_invalid_match() {
        assert_eq!(extract_order_date("Date 31-Feb-2024"), "31-Feb-2024");
        assert_eq!(extract_order_date("no dates here"), "");
    }
}
