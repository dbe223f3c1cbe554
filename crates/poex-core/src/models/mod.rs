//! Data models: line item records and pipeline configuration.

pub mod config;
pub mod record;

pub use config::{ExtractionConfig, OutputConfig, PdfConfig, PoexConfig};
pub use record::{LineFields, LineItemRecord, OrderHeader};
