//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::record::MAX_BLOCK_CHARS;

/// Main configuration for the poex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoexConfig {
    /// PDF page extraction configuration.
    pub pdf: PdfConfig,

    /// Line item extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output file configuration.
    pub output: OutputConfig,
}

/// Tolerances used when grouping characters into words and text lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum horizontal gap between characters of one word.
    pub x_tolerance: f64,

    /// Maximum vertical offset between characters of one text line.
    pub y_tolerance: f64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// Heuristic constants for field and line item extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Ship-to anchors above this offset are treated as page header text.
    pub header_band: f64,

    /// Horizontal split between the left (ship-to) and right (ordering office) columns.
    pub column_split_x: f64,

    /// Words must sit this far below an anchor label to belong to its block.
    pub label_gap: f64,

    /// Words whose tops differ by less than this share a line.
    pub line_tolerance: f64,

    /// Number of lines kept for the ship-to block.
    pub ship_to_max_lines: usize,

    /// Number of lines kept for the ordering office block.
    pub ordering_office_max_lines: usize,

    /// Address blocks are truncated to this many characters.
    pub max_block_chars: usize,

    /// Lines examined after a line number in text-flow documents.
    pub vertical_lookahead: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            header_band: 100.0,
            column_split_x: 300.0,
            label_gap: 10.0,
            line_tolerance: 2.0,
            ship_to_max_lines: 5,
            ordering_office_max_lines: 6,
            max_block_chars: MAX_BLOCK_CHARS,
            vertical_lookahead: 10,
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output CSV path.
    pub path: PathBuf,

    /// Directory processed PDFs are copied into, grouped by received date.
    pub archive_dir: Option<PathBuf>,

    /// Attempts made when the output file is locked.
    pub write_attempts: u32,

    /// Pause between write attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("PO_Data.csv"),
            archive_dir: None,
            write_attempts: 5,
            retry_delay_ms: 500,
        }
    }
}

impl PoexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PoexConfig =
            serde_json::from_str(r#"{"extraction": {"ship_to_max_lines": 3}}"#).unwrap();

        assert_eq!(config.extraction.ship_to_max_lines, 3);
        assert_eq!(config.extraction.ordering_office_max_lines, 6);
        assert_eq!(config.extraction.column_split_x, 300.0);
        assert_eq!(config.pdf.y_tolerance, 3.0);
        assert_eq!(config.output.path, PathBuf::from("PO_Data.csv"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PoexConfig::default();
        config.output.archive_dir = Some(PathBuf::from("archive"));
        config.save(&path).unwrap();

        let loaded = PoexConfig::from_file(&path).unwrap();
        assert_eq!(loaded.output.archive_dir, Some(PathBuf::from("archive")));
        assert_eq!(loaded.extraction.vertical_lookahead, 10);
    }

    #[test]
    fn test_invalid_file_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = PoexConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
