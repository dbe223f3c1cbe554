//! Line items from ruled tables.
//!
//! Column roles are read from a header row once, then re-derived from the
//! shape of the first data row of every continuation table that follows a page
//! break.

use tracing::debug;

use super::rules::{is_line_number, normalize_po_date, DECIMAL_CELL, PO_DATE};
use crate::models::LineFields;
use crate::pdf::{Table, TableRow};

/// Column holding the line identifier.
pub const LINE_COLUMN: usize = 0;

/// Inferred column index of each line-item field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    pub part: Option<usize>,
    pub date: Option<usize>,
    pub quantity: Option<usize>,
    pub unit_price: Option<usize>,
    pub amount: Option<usize>,
}

impl ColumnLayout {
    /// Derive column roles from header cell labels.
    pub fn from_header(row: &[Option<String>]) -> Self {
        let mut layout = Self::default();
        layout.apply_header(row);
        layout
    }

    /// Overwrite the roles a header row names; roles it lacks keep their column.
    pub fn apply_header(&mut self, row: &[Option<String>]) {
        for (i, cell) in row.iter().enumerate() {
            let Some(label) = cell.as_deref().map(str::to_lowercase) else {
                continue;
            };

            if label.contains("part") {
                self.part = Some(i);
            } else if label.contains("delivery") || label.contains("date") {
                self.date = Some(i);
            } else if label.contains("quantity") {
                self.quantity = Some(i);
            } else if label.contains("unit price") || label.contains("price") {
                self.unit_price = Some(i);
            } else if label.contains("amount") || label.contains("total") {
                self.amount = Some(i);
            }
        }
    }

    /// Re-derive date, quantity and price columns from the cells of a data row.
    ///
    /// The first decimal cell is the unit price, later ones the amount. Roles
    /// not found in the row keep their previous column.
    pub fn reinfer_from_row(&mut self, row: &[Option<String>]) {
        let mut price_seen = false;

        for (i, cell) in row.iter().enumerate().skip(LINE_COLUMN + 1) {
            let Some(text) = cell.as_deref().map(str::trim) else {
                continue;
            };

            if PO_DATE.is_match(text) {
                self.date = Some(i);
            } else if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                self.quantity = Some(i);
            } else if DECIMAL_CELL.is_match(text) {
                if price_seen {
                    self.amount = Some(i);
                } else {
                    self.unit_price = Some(i);
                    price_seen = true;
                }
            }
        }
    }
}

/// How a table takes part in line item extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// First row carries the column labels.
    Header,
    /// Data rows continuing a table from an earlier page.
    Continuation,
    /// Anything else on the page.
    Irrelevant,
}

/// Stateful parser for the tables of one document.
///
/// Create a fresh parser per document; the header flag and column layout
/// carry over between that document's tables only.
#[derive(Debug, Default)]
pub struct TableParser {
    header_found: bool,
    columns: ColumnLayout,
}

impl TableParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header_found(&self) -> bool {
        self.header_found
    }

    /// Current column layout.
    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    /// Classify a table given what has been seen so far in the document.
    pub fn classify(&self, table: &Table) -> TableKind {
        if table.len() >= 2 && is_header_row(&table[0]) {
            return TableKind::Header;
        }

        let first_cell = table
            .first()
            .and_then(|row| row.get(LINE_COLUMN))
            .and_then(|cell| cell.as_deref());

        match first_cell {
            Some(cell) if self.header_found && is_line_number(cell) => TableKind::Continuation,
            _ => TableKind::Irrelevant,
        }
    }

    /// Classify a table, update the column layout and return its line items.
    pub fn parse_table(&mut self, table: &Table) -> Vec<LineFields> {
        let kind = self.classify(table);

        let data_start = match kind {
            TableKind::Header => {
                self.header_found = true;
                self.columns.apply_header(&table[0]);
                debug!("Header table, columns {:?}", self.columns);
                1
            }
            TableKind::Continuation => {
                self.columns.reinfer_from_row(&table[0]);
                debug!("Continuation table, columns {:?}", self.columns);
                0
            }
            TableKind::Irrelevant => {
                debug!("Skipping table with {} rows", table.len());
                return Vec::new();
            }
        };

        table[data_start..]
            .iter()
            .filter_map(|row| self.parse_row(row))
            .collect()
    }

    fn parse_row(&self, row: &TableRow) -> Option<LineFields> {
        let line = cell_text(row, Some(LINE_COLUMN));
        if !is_line_number(&line) {
            return None;
        }

        Some(LineFields {
            line,
            part_number: clean_part_number(&cell_text(row, self.columns.part)),
            quantity: cell_text(row, self.columns.quantity),
            unit_price: cell_text(row, self.columns.unit_price),
            amount: cell_text(row, self.columns.amount),
            delivery_date: normalize_po_date(&cell_text(row, self.columns.date)),
        })
    }
}

/// Parse every table of one document in order.
pub fn parse_tables<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Vec<LineFields> {
    let mut parser = TableParser::new();
    tables
        .into_iter()
        .flat_map(|table| parser.parse_table(table))
        .collect()
}

fn is_header_row(row: &TableRow) -> bool {
    let joined = row
        .iter()
        .filter_map(|cell| cell.as_deref())
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    joined.contains("Line") && joined.contains("Part")
}

fn cell_text(row: &TableRow, column: Option<usize>) -> String {
    column
        .and_then(|i| row.get(i))
        .and_then(|cell| cell.as_deref())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Drop the revision suffix after `/` and fold line breaks into spaces.
pub fn clean_part_number(raw: &str) -> String {
    let base = raw.split('/').next().unwrap_or_default();
    base.trim().replace('\n', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> TableRow {
        cells.iter().map(|c| Some(c.to_string())).collect()
    }

    fn header_table() -> Table {
        vec![
            row(&["Line", "Part", "Delivery Date", "Quantity", "Unit Price", "Amount"]),
            row(&["1.1", "ABC123/A", "5-Jan-2024", "10", "12.50", "125.00"]),
        ]
    }

    #[test]
    fn test_clean_part_number() {
        assert_eq!(clean_part_number("PN1234/REV:B\n"), "PN1234");
        assert_eq!(clean_part_number("PN 12\n34"), "PN 12 34");
        assert_eq!(clean_part_number(""), "");
    }

    #[test]
    fn test_header_layout() {
        let layout = ColumnLayout::from_header(&header_table()[0]);
        assert_eq!(
            layout,
            ColumnLayout {
                part: Some(1),
                date: Some(2),
                quantity: Some(3),
                unit_price: Some(4),
                amount: Some(5),
            }
        );
    }

    #[test]
    fn test_header_labels_case_insensitive() {
        let layout = ColumnLayout::from_header(&row(&["LINE", "PART NO", "QUANTITY", "TOTAL"]));
        assert_eq!(layout.part, Some(1));
        assert_eq!(layout.quantity, Some(2));
        assert_eq!(layout.amount, Some(3));
        assert_eq!(layout.date, None);
    }

    #[test]
    fn test_header_table_end_to_end() {
        let items = parse_tables(&[header_table()]);
        assert_eq!(
            items,
            vec![LineFields {
                line: "1.1".to_string(),
                part_number: "ABC123".to_string(),
                quantity: "10".to_string(),
                unit_price: "12.50".to_string(),
                amount: "125.00".to_string(),
                delivery_date: "20240105".to_string(),
            }]
        );
    }

    #[test]
    fn test_continuation_reinfers_columns() {
        let mut parser = TableParser::new();
        parser.parse_table(&header_table());

        let continuation = vec![row(&["4.1", "15-Mar-2024", "10", "Each", "25.50", "255.00"])];
        assert_eq!(parser.classify(&continuation), TableKind::Continuation);

        let items = parser.parse_table(&continuation);
        assert_eq!(
            parser.columns(),
            &ColumnLayout {
                part: Some(1),
                date: Some(1),
                quantity: Some(2),
                unit_price: Some(4),
                amount: Some(5),
            }
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].delivery_date, "20240315");
        assert_eq!(items[0].quantity, "10");
        assert_eq!(items[0].unit_price, "25.50");
        assert_eq!(items[0].amount, "255.00");
    }

    #[test]
    fn test_continuation_needs_prior_header() {
        let parser = TableParser::new();
        let continuation = vec![row(&["4.1", "15-Mar-2024", "10"])];
        assert_eq!(parser.classify(&continuation), TableKind::Irrelevant);
        assert!(parse_tables(&[continuation]).is_empty());
    }

    #[test]
    fn test_single_row_header_is_irrelevant() {
        let parser = TableParser::new();
        let table = vec![row(&["Line", "Part"])];
        assert_eq!(parser.classify(&table), TableKind::Irrelevant);
    }

    #[test]
    fn test_rows_without_line_number_dropped() {
        let mut table = header_table();
        table.push(row(&["Subtotal", "", "", "", "", "125.00"]));
        table.push(row(&[" 2.1 ", "XYZ9", "bad date", "1", "1.00", "1.00"]));

        let items = parse_tables(&[table]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].line, "2.1");
        assert_eq!(items[1].delivery_date, "bad date");
    }

    #[test]
    fn test_short_rows_and_missing_cells_are_empty() {
        let table = vec![
            row(&["Line", "Part", "Quantity", "Amount"]),
            vec![Some("1.1".to_string()), None],
        ];

        let items = parse_tables(&[table]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].part_number, "");
        assert_eq!(items[0].quantity, "");
        assert_eq!(items[0].amount, "");
        assert_eq!(items[0].delivery_date, "");
    }

    #[test]
    fn test_later_header_keeps_unnamed_roles() {
        let mut parser = TableParser::new();
        parser.parse_table(&header_table());

        let items = parser.parse_table(&vec![
            row(&["Line", "Part", "Quantity"]),
            row(&["2.1", "B", "3", "x", "2.00", "6.00"]),
        ]);

        assert_eq!(parser.columns().quantity, Some(2));
        assert_eq!(parser.columns().amount, Some(5));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, "3");
        assert_eq!(items[0].unit_price, "2.00");
        assert_eq!(items[0].amount, "6.00");
    }

    #[test]
    fn test_irrelevant_tables_keep_state() {
        let mut parser = TableParser::new();
        parser.parse_table(&header_table());
        assert!(parser.parse_table(&vec![row(&["Terms", "Net 30"])]).is_empty());
        assert!(parser.header_found());
        assert_eq!(parser.columns().amount, Some(5));
    }
}
