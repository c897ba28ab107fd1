//! Binary search engine.
//!
//! Requires an ascending-sorted sequence; sorting beforehand is the
//! caller's responsibility.

use crate::step::{SearchCursor, SearchStep};
use stepviz_common::{ArrayHighlight, HighlightColor};

enum Phase {
    Init,
    CheckMid,
    Narrowed { mid: usize, went_low: bool },
    Found(usize),
    NotFound,
    Finished,
}

/// Bisects a sorted sequence, maintaining `low`/`high` bounds and yielding
/// a tri-partition step before each comparison.
pub struct BinarySearch {
    array: Vec<i64>,
    target: i64,
    low: i64,
    high: i64,
    phase: Phase,
}

impl BinarySearch {
    /// Creates a run over the sorted `array` looking for `target`.
    #[must_use]
    pub fn new(array: Vec<i64>, target: i64) -> Self {
        let high = array.len() as i64 - 1;
        Self {
            array,
            target,
            low: 0,
            high,
            phase: Phase::Init,
        }
    }

    /// Tri-partition highlights: outside the window muted, the active
    /// window info, bounds marked Low/High, the midpoint Primary (Accent
    /// when found).
    fn window_highlights(&self, mid: Option<usize>, found: bool) -> Vec<ArrayHighlight> {
        (0..self.array.len())
            .map(|i| {
                let idx = i as i64;
                if found && Some(i) == mid {
                    ArrayHighlight::new(i, HighlightColor::Accent).with_label("Found!")
                } else if Some(i) == mid {
                    ArrayHighlight::new(i, HighlightColor::Primary).with_label("Mid")
                } else if idx == self.low {
                    ArrayHighlight::new(i, HighlightColor::Secondary).with_label("Low")
                } else if idx == self.high {
                    ArrayHighlight::new(i, HighlightColor::Secondary).with_label("High")
                } else if idx >= self.low && idx <= self.high {
                    ArrayHighlight::new(i, HighlightColor::Info)
                } else {
                    ArrayHighlight::new(i, HighlightColor::Muted)
                }
            })
            .collect()
    }

    fn step(
        &self,
        message: String,
        is_final_step: bool,
        highlights: Vec<ArrayHighlight>,
        mid: Option<usize>,
        found: Option<usize>,
    ) -> SearchStep {
        SearchStep {
            array: self.array.clone(),
            target: self.target,
            message,
            is_final_step,
            highlights,
            cursor: SearchCursor::Bisect {
                low: self.low,
                high: self.high,
                mid,
            },
            target_found_at_index: found,
        }
    }

    fn next_window_phase(&self) -> Phase {
        if self.low <= self.high {
            Phase::CheckMid
        } else {
            Phase::NotFound
        }
    }
}

impl Iterator for BinarySearch {
    type Item = SearchStep;

    fn next(&mut self) -> Option<SearchStep> {
        match self.phase {
            Phase::Init => {
                self.phase = self.next_window_phase();
                let highlights = self.window_highlights(None, false);
                Some(self.step(
                    format!(
                        "Starting Binary Search for {}. Array must be sorted.",
                        self.target
                    ),
                    false,
                    highlights,
                    None,
                    None,
                ))
            }
            Phase::CheckMid => {
                let mid = ((self.low + self.high) / 2) as usize;
                let guess = self.array[mid];
                // Emit against the pre-narrowing window; bounds move only
                // after this step is built.
                let highlights = self.window_highlights(Some(mid), false);
                let step = self.step(
                    format!(
                        "Checking middle element at index {} (value: {}). Low: {}, High: {}.",
                        mid, guess, self.low, self.high
                    ),
                    false,
                    highlights,
                    Some(mid),
                    None,
                );
                self.phase = if guess == self.target {
                    Phase::Found(mid)
                } else {
                    let went_low = guess < self.target;
                    if went_low {
                        self.low = mid as i64 + 1;
                    } else {
                        self.high = mid as i64 - 1;
                    }
                    Phase::Narrowed { mid, went_low }
                };
                Some(step)
            }
            Phase::Narrowed { mid, went_low } => {
                self.phase = self.next_window_phase();
                let guess = self.array[mid];
                let message = if went_low {
                    format!("Target {} > {}. New Low: {}.", self.target, guess, self.low)
                } else {
                    format!(
                        "Target {} < {}. New High: {}.",
                        self.target, guess, self.high
                    )
                };
                let highlights = self.window_highlights(Some(mid), false);
                Some(self.step(message, false, highlights, Some(mid), None))
            }
            Phase::Found(mid) => {
                self.phase = Phase::Finished;
                let highlights = self.window_highlights(Some(mid), true);
                Some(self.step(
                    format!("Element {} found at index {}.", self.target, mid),
                    true,
                    highlights,
                    Some(mid),
                    Some(mid),
                ))
            }
            Phase::NotFound => {
                self.phase = Phase::Finished;
                let highlights = (0..self.array.len())
                    .map(|i| ArrayHighlight::new(i, HighlightColor::Muted))
                    .collect();
                Some(self.step(
                    format!("Element {} not found. Search range exhausted.", self.target),
                    true,
                    highlights,
                    None,
                    None,
                ))
            }
            Phase::Finished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(array: Vec<i64>, target: i64) -> Vec<SearchStep> {
        BinarySearch::new(array, target).collect()
    }

    #[test]
    fn test_finds_target_at_end() {
        let steps = run(vec![1, 3, 5, 8], 8);
        let last = steps.last().unwrap();
        assert!(last.is_final_step);
        assert_eq!(last.target_found_at_index, Some(3));
    }

    #[test]
    fn test_finds_target_first_probe() {
        let steps = run(vec![1, 3, 5, 8, 9], 5);
        let last = steps.last().unwrap();
        assert_eq!(last.target_found_at_index, Some(2));
        // init, check mid, final
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn test_not_found_reports_exhausted_window() {
        let steps = run(vec![1, 3, 5, 8], 4);
        let last = steps.last().unwrap();
        assert!(last.is_final_step);
        assert_eq!(last.target_found_at_index, None);
        // The exhausted window has crossed bounds.
        match last.cursor {
            SearchCursor::Bisect { low, high, .. } => assert!(low > high),
            _ => panic!("expected bisect cursor"),
        }
    }

    #[test]
    fn test_empty_array() {
        let steps = run(vec![], 4);
        assert_eq!(steps.len(), 2);
        assert!(steps[1].is_final_step);
        assert_eq!(steps[1].target_found_at_index, None);
    }

    #[test]
    fn test_single_element() {
        let steps = run(vec![7], 7);
        assert_eq!(steps.last().unwrap().target_found_at_index, Some(0));
    }

    #[test]
    fn test_found_index_holds_target_value() {
        for target in [1, 3, 5, 8, 9, 12] {
            let array = vec![1, 3, 5, 8, 9, 12];
            let steps = run(array.clone(), target);
            let idx = steps.last().unwrap().target_found_at_index.unwrap();
            assert_eq!(array[idx], target);
        }
    }

    #[test]
    fn test_exactly_one_final_step() {
        let steps = run(vec![1, 2, 3, 4, 5, 6, 7], 0);
        assert_eq!(steps.iter().filter(|s| s.is_final_step).count(), 1);
    }
}
