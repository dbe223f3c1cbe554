//! Order number extraction.

use super::patterns::ORDER_NUMBER;

/// Extract the first ten-digit order number, or an empty string.
pub fn extract_order_number(text: &str) -> String {
    ORDER_NUMBER
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
