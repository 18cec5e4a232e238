//! Synthetic word tables for unit tests.

use crate::words::{Word, WordTable};

/// Approximate width of one character in normalized page units.
const CHAR_WIDTH: f64 = 0.008;
const WORD_HEIGHT: f64 = 0.015;

/// Lays out words in reading order, tracking page/block/line/word indices.
pub(crate) struct PageBuilder {
    words: Vec<Word>,
    page: usize,
    block: usize,
    line: usize,
    word: usize,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            page: 0,
            block: 0,
            line: 0,
            word: 0,
        }
    }

    /// Add a word whose top-left corner is `(x1, y1)`; width follows its length.
    pub fn word(self, value: &str, x1: f64, y1: f64) -> Self {
        let x2 = x1 + CHAR_WIDTH * value.chars().count() as f64;
        self.word_at(value, x1, y1, x2, y1 + WORD_HEIGHT)
    }

    /// Add a word with an explicit box.
    pub fn word_at(mut self, value: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.words.push(Word {
            page_idx: self.page,
            block_idx: self.block,
            line_idx: self.line,
            word_idx: self.word,
            value: value.to_string(),
            x1,
            y1,
            x2,
            y2,
        });
        self.word += 1;
        self
    }

    /// Add a whole line of space-separated words starting at `(x1, y1)`.
    pub fn text(mut self, text: &str, x1: f64, y1: f64) -> Self {
        let mut x = x1;
        for token in text.split_whitespace() {
            self = self.word(token, x, y1);
            x += CHAR_WIDTH * (token.chars().count() + 1) as f64;
        }
        self
    }

    pub fn next_line(mut self) -> Self {
        self.line += 1;
        self.word = 0;
        self
    }

    pub fn next_block(mut self) -> Self {
        self.block += 1;
        self.line = 0;
        self.word = 0;
        self
    }

    pub fn next_page(mut self) -> Self {
        self.page += 1;
        self.block = 0;
        self.line = 0;
        self.word = 0;
        self
    }

    pub fn build(self) -> WordTable {
        WordTable::from_words(self.words)
    }
}
