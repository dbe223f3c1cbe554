//! Purchase-order line item extraction.

pub mod blocks;
mod parser;
pub mod rules;
pub mod table;
pub mod vertical;

pub use blocks::{
    extract_ordering_office, extract_ordering_office_coordinates, extract_ship_to,
    extract_ship_to_coordinates, BlockSpec, Side,
};
pub use parser::{DocumentParser, ParseMode, ParsedDocument};
pub use rules::{extract_order_date, extract_order_number, normalize_po_date, parse_po_date};
pub use table::{clean_part_number, parse_tables, ColumnLayout, TableKind, TableParser};
pub use vertical::parse_vertical_text;
