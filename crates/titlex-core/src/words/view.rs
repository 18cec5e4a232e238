//! Read-only views over a [`WordTable`](super::WordTable).

use super::{BlockKey, LineKey, Word};

/// An ordered subset of table words, used as the search context of a lookup.
///
/// Views borrow from the table; narrowing a view produces a new view and
/// never touches the table itself.
#[derive(Debug, Clone, Default)]
pub struct WordView<'a> {
    words: Vec<&'a Word>,
}

impl<'a> WordView<'a> {
    pub fn new(words: Vec<&'a Word>) -> Self {
        Self { words }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Word> + '_ {
        self.words.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Keep the words matching `pred`.
    pub fn filter(&self, mut pred: impl FnMut(&Word) -> bool) -> WordView<'a> {
        WordView::new(self.iter().filter(|w| pred(w)).collect())
    }

    /// Words on one page.
    pub fn page(&self, page_idx: usize) -> WordView<'a> {
        self.filter(|w| w.page_idx == page_idx)
    }

    /// Words of one visual block.
    pub fn block(&self, key: BlockKey) -> WordView<'a> {
        self.filter(|w| w.block_key() == key)
    }

    /// All words of a line in `word_idx` order, or `None` if the view holds
    /// no word of that line.
    pub fn line(&self, key: LineKey) -> Option<Line<'a>> {
        let mut words: Vec<&'a Word> = self.iter().filter(|w| w.line_key() == key).collect();
        if words.is_empty() {
            return None;
        }
        words.sort_by_key(|w| w.word_idx);
        Some(Line { key, words })
    }

    /// Lines in the order they first appear in the view.
    pub fn lines(&self) -> Vec<Line<'a>> {
        let mut lines: Vec<Line<'a>> = Vec::new();
        for word in self.iter() {
            match lines.last_mut() {
                Some(line) if line.key == word.line_key() => line.words.push(word),
                _ => lines.push(Line {
                    key: word.line_key(),
                    words: vec![word],
                }),
            }
        }
        lines
    }
}

/// The words of one OCR line.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    pub key: LineKey,
    pub words: Vec<&'a Word>,
}

impl Line<'_> {
    /// Space-joined word values.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Union of the word boxes as `(x1, y1, x2, y2)`.
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        self.words.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x1, y1, x2, y2), w| (x1.min(w.x1), y1.min(w.y1), x2.max(w.x2), y2.max(w.y2)),
        )
    }
}
