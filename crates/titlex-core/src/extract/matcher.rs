//! Approximate label search.
//!
//! OCR frequently splits a label into two word tokens, and the same word
//! ("Lien", "Type:") can appear many times on a page. Two-fragment lookups
//! therefore pair each word containing either fragment with the next such
//! word, score the pair textually against the expected label, and break ties
//! spatially so that a tightly spaced pair on a shared baseline wins.

use std::cmp::Ordering;

use strsim::normalized_levenshtein;

use super::Label;
use crate::models::ExtractionConfig;
use crate::words::{Line, LineKey, Word, WordView};

/// Similarity of two strings in `[0, 100]`, 100 meaning identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    100.0 * normalized_levenshtein(a.trim(), b.trim())
}

/// A scored two-word label candidate.
#[derive(Debug, Clone)]
pub struct LabelMatch<'a> {
    /// Line of the first word; the label's value is read from this line.
    pub line: LineKey,
    pub first: &'a Word,
    pub second: &'a Word,
    /// `100 - similarity_ratio`; 0 is an exact match.
    pub distance: f64,
    /// Horizontal gap between the two words.
    pub space: f64,
    /// Mean absolute difference of the top and bottom edges.
    pub align: f64,
}

impl<'a> LabelMatch<'a> {
    fn score(first: &'a Word, second: &'a Word, reference: &str) -> Self {
        let candidate = format!("{} {}", first.value, second.value);
        Self {
            line: first.line_key(),
            first,
            second,
            distance: 100.0 - similarity_ratio(&candidate, reference),
            space: (second.x1 - first.x2).abs(),
            align: ((second.y1 - first.y1).abs() + (second.y2 - first.y2).abs()) / 2.0,
        }
    }

    /// Union of both word boxes as `(x1, y1, x2, y2)`.
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        (
            self.first.x1.min(self.second.x1),
            self.first.y1.min(self.second.y1),
            self.first.x2.max(self.second.x2),
            self.first.y2.max(self.second.y2),
        )
    }

    fn rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.space.total_cmp(&other.space))
            .then(self.align.total_cmp(&other.align))
    }
}

/// Locates labels inside a word view.
#[derive(Debug, Clone)]
pub struct LabelMatcher {
    max_distance: f64,
}

impl LabelMatcher {
    /// Create a matcher with the default distance threshold.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            max_distance: config.max_distance,
        }
    }

    /// Set the distance threshold two-word candidates must stay below.
    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Line holding `label`, if any.
    pub fn find<'a>(&self, view: &WordView<'a>, label: &Label) -> Option<Line<'a>> {
        match *label {
            Label::One(fragment) => self.find_one(view, fragment),
            Label::Two(first, second) => self.find_two(view, first, second),
        }
    }

    /// First line containing a word that contains `fragment`.
    pub fn find_one<'a>(&self, view: &WordView<'a>, fragment: &str) -> Option<Line<'a>> {
        let key = view.iter().find(|w| w.value.contains(fragment))?.line_key();
        view.line(key)
    }

    /// Line of the best-ranked `first second` pairing.
    pub fn find_two<'a>(&self, view: &WordView<'a>, first: &str, second: &str) -> Option<Line<'a>> {
        let best = self.candidates(view, first, second).into_iter().next()?;
        view.line(best.line)
    }

    /// Every pairing below the distance threshold, best first.
    ///
    /// Words containing either fragment are kept in table order and each is
    /// paired with the next kept word. Candidates are ranked by
    /// `(distance, space, align)`.
    pub fn candidates<'a>(&self, view: &WordView<'a>, first: &str, second: &str) -> Vec<LabelMatch<'a>> {
        let reference = format!("{first} {second}");

        let hits: Vec<&'a Word> = view
            .iter()
            .filter(|w| w.value.contains(first) || w.value.contains(second))
            .collect();

        let mut matches: Vec<LabelMatch<'a>> = hits
            .windows(2)
            .map(|pair| LabelMatch::score(pair[0], pair[1], &reference))
            .filter(|m| m.distance < self.max_distance)
            .collect();

        matches.sort_by(LabelMatch::rank);
        matches
    }
}

impl Default for LabelMatcher {
    fn default() -> Self {
        Self::new()
    }
}
