//! Line items from documents whose items are laid out as running text.

use tracing::debug;

use super::rules::{is_line_number, normalize_po_date, PO_DATE, PRICE};
use super::table::clean_part_number;
use crate::models::LineFields;

/// Items section starts at the first short line mentioning "line".
const SECTION_MARKER_MAX_CHARS: usize = 50;

/// Quantity lines are short digit runs.
const QUANTITY_MAX_CHARS: usize = 10;

/// Parse line items from page text, one field per text line.
///
/// A line number opens a record, the following line is the part number, and
/// the next `lookahead` lines are searched for the delivery date, quantity and
/// prices. A quantity only counts once a date has been seen.
pub fn parse_vertical_text(text: &str, lookahead: usize) -> Vec<LineFields> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut items = Vec::new();
    let mut in_items = false;

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();

        if !in_items {
            if line.chars().count() < SECTION_MARKER_MAX_CHARS
                && line.to_lowercase().contains("line")
            {
                debug!("Line items section starts at text line {}", i);
                in_items = true;
            }
            continue;
        }

        if !is_line_number(line) {
            continue;
        }

        let mut fields = LineFields {
            line: line.to_string(),
            part_number: lines
                .get(i + 1)
                .map(|next| clean_part_number(next))
                .unwrap_or_default(),
            ..Default::default()
        };

        let mut date = String::new();
        for candidate in lines.iter().skip(i + 1).take(lookahead).map(|l| l.trim()) {
            if date.is_empty() {
                if let Some(m) = PO_DATE.find(candidate) {
                    date = m.as_str().to_string();
                }
            }

            if !date.is_empty()
                && fields.quantity.is_empty()
                && is_quantity(candidate)
            {
                fields.quantity = candidate.to_string();
            }

            if let Some(m) = PRICE.find(candidate) {
                if fields.unit_price.is_empty() {
                    fields.unit_price = m.as_str().to_string();
                } else if fields.amount.is_empty() {
                    fields.amount = m.as_str().to_string();
                }
            }
        }
        fields.delivery_date = normalize_po_date(&date);

        if fields.part_number.is_empty() {
            debug!("Dropping line {} without a part number", fields.line);
            continue;
        }
        items.push(fields);
    }

    items
}

fn is_quantity(s: &str) -> bool {
    !s.is_empty() && s.len() < QUANTITY_MAX_CHARS && s.bytes().all(|b| b.is_ascii_digit())
}
