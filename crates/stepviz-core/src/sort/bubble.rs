//! Bubble sort engine.

use crate::step::SortStep;
use stepviz_common::{ArrayHighlight, HighlightColor};

enum Phase {
    Start,
    PassStart,
    Compare,
    SwapAnnounce,
    PostSwap,
    PassEnd,
    Final,
    Finished,
}

/// Classic adjacent-pairwise passes, with separate "about to swap" and
/// "post swap" steps and an early exit once a full pass performs no swaps.
pub struct BubbleSort {
    array: Vec<i64>,
    pass: usize,
    j: usize,
    swapped: bool,
    sorted_count: usize,
    phase: Phase,
}

impl BubbleSort {
    /// Creates a run over `array`.
    #[must_use]
    pub fn new(array: Vec<i64>) -> Self {
        Self {
            array,
            pass: 0,
            j: 0,
            swapped: false,
            sorted_count: 0,
            phase: Phase::Start,
        }
    }

    /// Confirmed-sorted trailing elements accent, the active comparison
    /// primary (destructive mid-swap), everything else neutral.
    fn highlights(&self, comparison: Option<(usize, usize)>, swapping: bool) -> Vec<ArrayHighlight> {
        let n = self.array.len();
        (0..n)
            .map(|i| {
                if self.sorted_count > 0 && i >= n - self.sorted_count {
                    ArrayHighlight::new(i, HighlightColor::Accent).with_label("Sorted")
                } else if comparison.is_some_and(|(a, b)| i == a || i == b) {
                    let color = if swapping {
                        HighlightColor::Destructive
                    } else {
                        HighlightColor::Primary
                    };
                    ArrayHighlight::new(i, color)
                } else {
                    ArrayHighlight::new(i, HighlightColor::Neutral)
                }
            })
            .collect()
    }

    fn step(
        &self,
        message: String,
        is_final_step: bool,
        highlights: Vec<ArrayHighlight>,
        comparing: Option<(usize, usize)>,
        swapping: Option<(usize, usize)>,
        sorted_indices: Vec<usize>,
    ) -> SortStep {
        SortStep {
            array: self.array.clone(),
            message,
            is_final_step,
            highlights,
            comparing,
            swapping,
            sorted_indices,
            pivot_index: None,
            sub_array_bounds: None,
        }
    }

    fn advance_j(&mut self) {
        let n = self.array.len();
        if self.j + 1 < n - 1 - self.pass {
            self.j += 1;
            self.phase = Phase::Compare;
        } else {
            self.phase = Phase::PassEnd;
        }
    }
}

impl Iterator for BubbleSort {
    type Item = SortStep;

    fn next(&mut self) -> Option<SortStep> {
        let n = self.array.len();
        match self.phase {
            Phase::Start => {
                self.phase = if n < 2 { Phase::Final } else { Phase::PassStart };
                Some(self.step(
                    "Starting Bubble Sort. Pass 1.".to_string(),
                    false,
                    self.highlights(None, false),
                    None,
                    None,
                    vec![],
                ))
            }
            Phase::PassStart => {
                self.swapped = false;
                self.j = 0;
                self.phase = Phase::Compare;
                Some(self.step(
                    format!(
                        "Pass {}. Comparing elements. Largest will bubble to the end.",
                        self.pass + 1
                    ),
                    false,
                    self.highlights(None, false),
                    None,
                    None,
                    vec![],
                ))
            }
            Phase::Compare => {
                let j = self.j;
                let step = self.step(
                    format!("Comparing {} and {}.", self.array[j], self.array[j + 1]),
                    false,
                    self.highlights(Some((j, j + 1)), false),
                    Some((j, j + 1)),
                    None,
                    vec![],
                );
                if self.array[j] > self.array[j + 1] {
                    self.phase = Phase::SwapAnnounce;
                } else {
                    self.advance_j();
                }
                Some(step)
            }
            Phase::SwapAnnounce => {
                let j = self.j;
                let step = self.step(
                    format!("Swapping {} and {}.", self.array[j], self.array[j + 1]),
                    false,
                    self.highlights(Some((j, j + 1)), true),
                    Some((j, j + 1)),
                    Some((j, j + 1)),
                    vec![],
                );
                self.array.swap(j, j + 1);
                self.swapped = true;
                self.phase = Phase::PostSwap;
                Some(step)
            }
            Phase::PostSwap => {
                let j = self.j;
                let step = self.step(
                    format!(
                        "Elements {} and {} swapped (original values).",
                        self.array[j + 1],
                        self.array[j]
                    ),
                    false,
                    self.highlights(Some((j, j + 1)), false),
                    Some((j, j + 1)),
                    None,
                    vec![],
                );
                self.advance_j();
                Some(step)
            }
            Phase::PassEnd => {
                self.sorted_count += 1;
                let settled = self.array[n - 1 - self.pass];
                let step = self.step(
                    format!(
                        "Pass {} complete. Element {} is sorted.",
                        self.pass + 1,
                        settled
                    ),
                    false,
                    self.highlights(None, false),
                    None,
                    None,
                    vec![],
                );
                if !self.swapped {
                    self.phase = Phase::Final;
                } else {
                    self.pass += 1;
                    self.phase = if self.pass < n - 1 {
                        Phase::PassStart
                    } else {
                        Phase::Final
                    };
                }
                Some(step)
            }
            Phase::Final => {
                self.phase = Phase::Finished;
                let highlights = (0..n)
                    .map(|i| ArrayHighlight::new(i, HighlightColor::Accent).with_label("Sorted"))
                    .collect();
                Some(self.step(
                    "Bubble Sort complete. Array is sorted.".to_string(),
                    true,
                    highlights,
                    None,
                    None,
                    (0..n).collect(),
                ))
            }
            Phase::Finished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: Vec<i64>) -> Vec<SortStep> {
        BubbleSort::new(input).collect()
    }

    #[test]
    fn test_sorts_example() {
        let steps = run(vec![5, 3, 8, 1]);
        let last = steps.last().unwrap();
        assert!(last.is_final_step);
        assert_eq!(last.array, vec![1, 3, 5, 8]);
        assert_eq!(last.sorted_indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_early_exit_on_sorted_input() {
        // One pass with zero swaps, then done: exactly n-1 comparisons.
        let steps = run(vec![1, 2, 3, 4, 5]);
        let compares = steps
            .iter()
            .filter(|s| s.comparing.is_some() && s.swapping.is_none())
            .count();
        assert_eq!(compares, 4);
        assert!(steps.iter().all(|s| s.swapping.is_none()));
    }

    #[test]
    fn test_swap_emits_announce_and_post_steps() {
        let steps = run(vec![2, 1]);
        let announce = steps.iter().find(|s| s.swapping.is_some()).unwrap();
        assert_eq!(announce.array, vec![2, 1]);
        let post_idx = steps.iter().position(|s| s.swapping.is_some()).unwrap() + 1;
        assert_eq!(steps[post_idx].array, vec![1, 2]);
    }

    #[test]
    fn test_trivial_inputs() {
        for input in [vec![], vec![42]] {
            let steps = run(input.clone());
            assert_eq!(steps.len(), 2);
            let last = &steps[1];
            assert!(last.is_final_step);
            assert_eq!(last.array, input);
        }
    }

    #[test]
    fn test_reverse_sorted_worst_case() {
        let steps = run(vec![4, 3, 2, 1]);
        assert_eq!(steps.last().unwrap().array, vec![1, 2, 3, 4]);
    }
}
