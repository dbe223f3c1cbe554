//! Address blocks recovered from positioned words.
//!
//! A block starts below an anchor label, ends above a stop label, keeps the
//! words on one side of the page, and is read back line by line.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::models::ExtractionConfig;
use crate::pdf::{PageSource, PositionedWord};

/// Which half of the page a block occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Predicate deciding whether a word (below the anchor) ends the block.
type StopRule = fn(&PositionedWord, &[PositionedWord]) -> bool;

/// Description of one address block.
#[derive(Clone, Copy)]
pub struct BlockSpec {
    /// Name used in log messages.
    pub name: &'static str,
    /// Lowercase substring identifying the anchor word.
    pub anchor: &'static str,
    /// Only accept anchors below the page header band.
    pub below_header: bool,
    pub side: Side,
    pub max_lines: usize,
    stop: StopRule,
}

impl BlockSpec {
    /// Ship-to block: left column, anchored on "ship", ends at "payment".
    pub fn ship_to(config: &ExtractionConfig) -> Self {
        Self {
            name: "ship-to",
            anchor: "ship",
            below_header: true,
            side: Side::Left,
            max_lines: config.ship_to_max_lines,
            stop: |word, _| word.text.to_lowercase().contains("payment"),
        }
    }

    /// Ordering office block: right column, anchored on "ordering", ends at
    /// the supplier contact row or the buyer label.
    pub fn ordering_office(config: &ExtractionConfig) -> Self {
        Self {
            name: "ordering office",
            anchor: "ordering",
            below_header: false,
            side: Side::Right,
            max_lines: config.ordering_office_max_lines,
            stop: |word, words| {
                if word.text.contains("Buyer") {
                    return true;
                }
                word.text.contains("Supplier")
                    && words
                        .iter()
                        .any(|w| (w.top - word.top).abs() < 5.0 && w.text == "Contact")
            },
        }
    }
}

/// Extract a block from a page's words. Returns an empty string if the anchor is missing.
pub fn extract_block(words: &[PositionedWord], block: &BlockSpec, config: &ExtractionConfig) -> String {
    let Some(anchor) = words.iter().find(|w| {
        w.text.to_lowercase().contains(block.anchor)
            && (!block.below_header || w.top > config.header_band)
    }) else {
        debug!("No {} anchor found", block.name);
        return String::new();
    };

    let stop_top = words
        .iter()
        .find(|w| w.top > anchor.top && (block.stop)(w, words))
        .map(|w| w.top)
        .unwrap_or(f64::INFINITY);

    let mut selected: Vec<&PositionedWord> = words
        .iter()
        .filter(|w| w.top > anchor.top + config.label_gap && w.top < stop_top)
        .filter(|w| match block.side {
            Side::Left => w.x0 < config.column_split_x,
            Side::Right => w.x0 > config.column_split_x,
        })
        .collect();

    selected.sort_by(|a, b| {
        a.top
            .partial_cmp(&b.top)
            .unwrap_or(Ordering::Equal)
            .then(a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal))
    });

    let lines = group_lines(&selected, config.line_tolerance);
    debug!(
        "{} block: anchor at {:.1}, stop at {:.1}, {} lines",
        block.name,
        anchor.top,
        stop_top,
        lines.len()
    );

    let joined = lines
        .iter()
        .take(block.max_lines)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
        .replace(", ,", ",");

    joined
        .trim_matches(|c| c == ' ' || c == ',')
        .chars()
        .take(config.max_block_chars)
        .collect()
}

fn group_lines(words: &[&PositionedWord], tolerance: f64) -> Vec<String> {
    let mut lines: Vec<Vec<&str>> = Vec::new();
    let mut last_top: Option<f64> = None;

    for word in words {
        match (lines.last_mut(), last_top) {
            (Some(line), Some(top)) if (word.top - top).abs() < tolerance => {
                line.push(&word.text)
            }
            _ => lines.push(vec![&word.text]),
        }
        last_top = Some(word.top);
    }

    lines.into_iter().map(|line| line.join(" ")).collect()
}

/// Ship-to address from positioned words.
pub fn extract_ship_to(words: &[PositionedWord], config: &ExtractionConfig) -> String {
    extract_block(words, &BlockSpec::ship_to(config), config)
}

/// Ordering office address from positioned words.
pub fn extract_ordering_office(words: &[PositionedWord], config: &ExtractionConfig) -> String {
    extract_block(words, &BlockSpec::ordering_office(config), config)
}

fn page_block<P: PageSource>(page: &P, block: &BlockSpec, config: &ExtractionConfig) -> String {
    match page.extract_words() {
        Ok(words) => extract_block(&words, block, config),
        Err(e) => {
            warn!("Could not read words for {} block: {}", block.name, e);
            String::new()
        }
    }
}

/// Ship-to address from a page. Never fails; unreadable pages give an empty string.
pub fn extract_ship_to_coordinates<P: PageSource>(page: &P, config: &ExtractionConfig) -> String {
    page_block(page, &BlockSpec::ship_to(config), config)
}

/// Ordering office address from a page. Never fails; unreadable pages give an empty string.
pub fn extract_ordering_office_coordinates<P: PageSource>(
    page: &P,
    config: &ExtractionConfig,
) -> String {
    page_block(page, &BlockSpec::ordering_office(config), config)
}
