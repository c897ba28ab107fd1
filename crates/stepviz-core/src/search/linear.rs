//! Linear search engine.

use crate::step::{SearchCursor, SearchStep};
use stepviz_common::{ArrayHighlight, HighlightColor};

enum Phase {
    Init,
    Check(usize),
    Found(usize),
    NotFound,
    Finished,
}

/// Scans index `0..n` in order, yielding one "before check" step per index
/// and a single final step on match or exhaustion.
pub struct LinearSearch {
    array: Vec<i64>,
    target: i64,
    phase: Phase,
}

impl LinearSearch {
    /// Creates a run over `array` looking for `target`.
    #[must_use]
    pub fn new(array: Vec<i64>, target: i64) -> Self {
        Self {
            array,
            target,
            phase: Phase::Init,
        }
    }

    fn neutral_highlights(&self) -> Vec<ArrayHighlight> {
        (0..self.array.len())
            .map(|i| ArrayHighlight::new(i, HighlightColor::Neutral))
            .collect()
    }

    fn step(
        &self,
        message: String,
        is_final_step: bool,
        highlights: Vec<ArrayHighlight>,
        cursor: SearchCursor,
        found: Option<usize>,
    ) -> SearchStep {
        SearchStep {
            array: self.array.clone(),
            target: self.target,
            message,
            is_final_step,
            highlights,
            cursor,
            target_found_at_index: found,
        }
    }
}

impl Iterator for LinearSearch {
    type Item = SearchStep;

    fn next(&mut self) -> Option<SearchStep> {
        match self.phase {
            Phase::Init => {
                self.phase = if self.array.is_empty() {
                    Phase::NotFound
                } else {
                    Phase::Check(0)
                };
                Some(self.step(
                    format!("Starting Linear Search for {}.", self.target),
                    false,
                    self.neutral_highlights(),
                    SearchCursor::None,
                    None,
                ))
            }
            Phase::Check(i) => {
                self.phase = if self.array[i] == self.target {
                    Phase::Found(i)
                } else if i + 1 < self.array.len() {
                    Phase::Check(i + 1)
                } else {
                    Phase::NotFound
                };
                let mut highlights = self.neutral_highlights();
                highlights[i] = ArrayHighlight::new(i, HighlightColor::Primary);
                Some(self.step(
                    format!(
                        "Checking element at index {} (value: {})...",
                        i, self.array[i]
                    ),
                    false,
                    highlights,
                    SearchCursor::Scan { index: i },
                    None,
                ))
            }
            Phase::Found(i) => {
                self.phase = Phase::Finished;
                let mut highlights = self.neutral_highlights();
                highlights[i] =
                    ArrayHighlight::new(i, HighlightColor::Accent).with_label("Found!");
                Some(self.step(
                    format!("Element {} found at index {}.", self.target, i),
                    true,
                    highlights,
                    SearchCursor::Scan { index: i },
                    Some(i),
                ))
            }
            Phase::NotFound => {
                self.phase = Phase::Finished;
                let highlights = (0..self.array.len())
                    .map(|i| ArrayHighlight::new(i, HighlightColor::Muted))
                    .collect();
                Some(self.step(
                    format!("Element {} not found in the array.", self.target),
                    true,
                    highlights,
                    SearchCursor::None,
                    None,
                ))
            }
            Phase::Finished => None,
        }
    }
}
