//! Flat word table built from a nested OCR export.
//!
//! Every later lookup reads this table by page/block/line index and by
//! bounding-box coordinates. It is built once per document and never
//! mutated afterwards.

mod view;

pub use view::{Line, WordView};

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::ocr::{require_level, OcrExport};

/// A single recognized word with its position in the export hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    pub page_idx: usize,
    pub block_idx: usize,
    pub line_idx: usize,
    pub word_idx: usize,
    /// Recognized text.
    pub value: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Word {
    /// Key of the line this word belongs to.
    pub fn line_key(&self) -> LineKey {
        LineKey {
            page_idx: self.page_idx,
            block_idx: self.block_idx,
            line_idx: self.line_idx,
        }
    }

    /// Key of the block this word belongs to.
    pub fn block_key(&self) -> BlockKey {
        BlockKey {
            page_idx: self.page_idx,
            block_idx: self.block_idx,
        }
    }

    /// Vertical center of the bounding box.
    pub fn center_y(&self) -> f64 {
        (self.y1 + self.y2) / 2.0
    }
}

/// Identifies a line: `(page_idx, block_idx, line_idx)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineKey {
    pub page_idx: usize,
    pub block_idx: usize,
    pub line_idx: usize,
}

impl LineKey {
    pub fn block_key(&self) -> BlockKey {
        BlockKey {
            page_idx: self.page_idx,
            block_idx: self.block_idx,
        }
    }
}

/// Identifies a visual block: `(page_idx, block_idx)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockKey {
    pub page_idx: usize,
    pub block_idx: usize,
}

/// All words of a document in reading order (page, block, line, word).
#[derive(Debug, Clone, Default)]
pub struct WordTable {
    words: Vec<Word>,
    page_count: usize,
}

impl WordTable {
    /// Flatten an OCR export.
    ///
    /// Indices are assigned per level as it is unrolled, so they describe
    /// the position in the export rather than whatever index the OCR engine
    /// reported. Fails when a nesting level is absent.
    pub fn from_export(export: &OcrExport) -> Result<Self> {
        let pages = export.require_pages()?;
        let mut words = Vec::new();

        for (page_idx, page) in pages.iter().enumerate() {
            let blocks = require_level("blocks", &page.blocks, || format!("pages[{page_idx}]"))?;

            for (block_idx, block) in blocks.iter().enumerate() {
                let lines = require_level("lines", &block.lines, || {
                    format!("pages[{page_idx}].blocks[{block_idx}]")
                })?;

                for (line_idx, line) in lines.iter().enumerate() {
                    let line_words = require_level("words", &line.words, || {
                        format!("pages[{page_idx}].blocks[{block_idx}].lines[{line_idx}]")
                    })?;

                    for (word_idx, word) in line_words.iter().enumerate() {
                        let [[ax, ay], [bx, by]] = word.geometry;
                        if ax > bx || ay > by {
                            debug!(
                                "Normalizing inverted box of {:?} at pages[{}].blocks[{}].lines[{}].words[{}]",
                                word.value, page_idx, block_idx, line_idx, word_idx
                            );
                        }
                        words.push(Word {
                            page_idx,
                            block_idx,
                            line_idx,
                            word_idx,
                            value: word.value.clone(),
                            x1: ax.min(bx),
                            y1: ay.min(by),
                            x2: ax.max(bx),
                            y2: ay.max(by),
                        });
                    }
                }
            }
        }

        debug!("Flattened {} pages into {} words", pages.len(), words.len());

        Ok(Self {
            words,
            page_count: pages.len(),
        })
    }

    /// Build a table from words that are already in reading order.
    pub fn from_words(words: Vec<Word>) -> Self {
        let page_count = words.iter().map(|w| w.page_idx + 1).max().unwrap_or(0);
        Self { words, page_count }
    }

    /// View over the whole table.
    pub fn view(&self) -> WordView<'_> {
        WordView::new(self.words.iter().collect())
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Plain text of the document, one OCR line per output line.
    pub fn text(&self) -> String {
        self.view()
            .lines()
            .iter()
            .map(|line| line.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
