//! Rule-based field extractors for purchase orders.

pub mod dates;
pub mod numbers;
pub mod patterns;

pub use dates::{extract_order_date, normalize_po_date, parse_po_date};
pub use numbers::extract_order_number;
pub use patterns::*;
