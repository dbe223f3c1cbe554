//! Purchase-order line item record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum length (in characters) of the ship-to and ordering-office blocks.
pub const MAX_BLOCK_CHARS: usize = 300;

/// One output row: a single line item of a purchase order.
///
/// All fields are text; an empty string means the field was not found.
/// Dates that parsed are stored as `YYYYMMDD`, otherwise as the raw match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRecord {
    /// Source file name.
    pub pdf_file: String,

    /// Ten-digit order number.
    pub order_number: String,

    /// Order date.
    pub order_date: String,

    /// Dotted line identifier, e.g. `1.1`.
    pub line: String,

    /// Part number with the revision suffix removed.
    pub part_number: String,

    pub quantity: String,

    pub unit_price: String,

    pub amount: String,

    /// Delivery date.
    pub delivery_date: String,

    /// Ship-to address block.
    pub ship_to: String,

    /// Ordering office address block.
    pub ordering_office: String,
}

/// Document-level fields shared by every line item of one purchase order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderHeader {
    pub pdf_file: String,
    pub order_number: String,
    pub order_date: String,
    pub ship_to: String,
    pub ordering_office: String,
}

/// Per-line fields recovered by one of the parsers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineFields {
    pub line: String,
    pub part_number: String,
    pub quantity: String,
    pub unit_price: String,
    pub amount: String,
    pub delivery_date: String,
}

impl LineItemRecord {
    /// Combine document-level and line-level fields into a record.
    pub fn new(header: &OrderHeader, fields: LineFields) -> Self {
        Self {
            pdf_file: header.pdf_file.clone(),
            order_number: header.order_number.clone(),
            order_date: header.order_date.clone(),
            line: fields.line,
            part_number: fields.part_number,
            quantity: fields.quantity,
            unit_price: fields.unit_price,
            amount: fields.amount,
            delivery_date: fields.delivery_date,
            ship_to: header.ship_to.clone(),
            ordering_office: header.ordering_office.clone(),
        }
    }

    /// Quantity as a number; empty or unparseable text yields `None`.
    pub fn quantity_value(&self) -> Option<Decimal> {
        parse_numeric(&self.quantity)
    }

    pub fn unit_price_value(&self) -> Option<Decimal> {
        parse_numeric(&self.unit_price)
    }

    pub fn amount_value(&self) -> Option<Decimal> {
        parse_numeric(&self.amount)
    }
}

/// Parse a numeric field, ignoring currency symbols and thousands separators.
fn parse_numeric(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '€' | '£' | ' ' | '\u{00a0}'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header() -> OrderHeader {
        OrderHeader {
            pdf_file: "po.pdf".to_string(),
            order_number: "4500012345".to_string(),
            order_date: "20240105".to_string(),
            ship_to: "Dock 4, 1 Main St".to_string(),
            ordering_office: "Purchasing, 2 Side St".to_string(),
        }
    }

    #[test]
    fn test_record_broadcasts_header() {
        let record = LineItemRecord::new(
            &header(),
            LineFields {
                line: "1.1".to_string(),
                part_number: "ABC123".to_string(),
                ..Default::default()
            },
        );

        assert_eq!(record.pdf_file, "po.pdf");
        assert_eq!(record.order_number, "4500012345");
        assert_eq!(record.ship_to, "Dock 4, 1 Main St");
        assert_eq!(record.ordering_office, "Purchasing, 2 Side St");
        assert_eq!(record.line, "1.1");
    }

    #[test]
    fn test_numeric_values() {
        let record = LineItemRecord {
            quantity: "10".to_string(),
            unit_price: "$1,234.50".to_string(),
            amount: "n/a".to_string(),
            ..Default::default()
        };

        assert_eq!(record.quantity_value(), Some(Decimal::from(10)));
        assert_eq!(record.unit_price_value(), Some(Decimal::new(123450, 2)));
        assert_eq!(record.amount_value(), None);
        assert_eq!(parse_numeric(""), None);
    }
}
