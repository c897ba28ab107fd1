//! Merge sort engine.
//!
//! The recursion is flattened into an explicit frame stack. All frames
//! operate on one owned buffer with absolute index ranges, so highlights
//! from any sub-range compose into the full-array view.

use crate::step::SortStep;
use stepviz_common::{ArrayHighlight, HighlightColor};

enum MergePhase {
    Announce,
    Compare,
    Place,
    CopyLeft,
    CopyRight,
    Summary,
}

/// In-flight merge of `[left, mid]` and `[mid+1, right]`.
struct MergeState {
    left: usize,
    mid: usize,
    right: usize,
    /// Temporary copies of the two halves, captured when the merge starts
    /// (after both sub-ranges have been sorted).
    l_buf: Vec<i64>,
    r_buf: Vec<i64>,
    i: usize,
    j: usize,
    k: usize,
    phase: MergePhase,
}

impl MergeState {
    fn new(left: usize, mid: usize, right: usize) -> Self {
        Self {
            left,
            mid,
            right,
            l_buf: Vec::new(),
            r_buf: Vec::new(),
            i: 0,
            j: 0,
            k: left,
            phase: MergePhase::Announce,
        }
    }

    fn loop_phase(&self) -> MergePhase {
        if self.i < self.l_buf.len() && self.j < self.r_buf.len() {
            MergePhase::Compare
        } else if self.i < self.l_buf.len() {
            MergePhase::CopyLeft
        } else if self.j < self.r_buf.len() {
            MergePhase::CopyRight
        } else {
            MergePhase::Summary
        }
    }
}

enum Frame {
    Sort { left: usize, right: usize },
    Merge(MergeState),
}

enum Phase {
    Start,
    Run,
    Finished,
}

/// Recursive split/merge over a single backing buffer, one step per split,
/// base case, comparison, placement, and per-merge summary.
pub struct MergeSort {
    array: Vec<i64>,
    stack: Vec<Frame>,
    phase: Phase,
}

impl MergeSort {
    /// Creates a run over `array`.
    #[must_use]
    pub fn new(array: Vec<i64>) -> Self {
        Self {
            array,
            stack: Vec::new(),
            phase: Phase::Start,
        }
    }

    fn range_highlights(
        &self,
        start: usize,
        end: usize,
        in_range: HighlightColor,
        special: &[(usize, HighlightColor)],
    ) -> Vec<ArrayHighlight> {
        (0..self.array.len())
            .map(|idx| {
                if let Some((_, color)) = special.iter().find(|(s, _)| *s == idx) {
                    ArrayHighlight::new(idx, *color)
                } else if idx >= start && idx <= end {
                    ArrayHighlight::new(idx, in_range)
                } else {
                    ArrayHighlight::new(idx, HighlightColor::Neutral)
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
        sorted_indices: Vec<usize>,
        sub_array_bounds: Option<(usize, usize)>,
    ) -> SortStep {
        SortStep {
            array: self.array.clone(),
            message,
            is_final_step,
            highlights,
            comparing,
            swapping: None,
            sorted_indices,
            pivot_index: None,
            sub_array_bounds,
        }
    }

    fn join(values: &[i64]) -> String {
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Advances the in-flight merge by one emission. Returns the step and
    /// whether the merge is finished.
    fn advance_merge(&mut self, state: &mut MergeState) -> (SortStep, bool) {
        let bounds = (state.left, state.right);
        match state.phase {
            MergePhase::Announce => {
                state.l_buf = self.array[state.left..=state.mid].to_vec();
                state.r_buf = self.array[state.mid + 1..=state.right].to_vec();
                let step = self.step(
                    format!(
                        "Merging subarrays: Left from index {} to {}, Right from {} to {}. \
                         Left values: [{}], Right values: [{}]",
                        state.left,
                        state.mid,
                        state.mid + 1,
                        state.right,
                        Self::join(&state.l_buf),
                        Self::join(&state.r_buf),
                    ),
                    false,
                    self.range_highlights(state.left, state.right, HighlightColor::Primary, &[]),
                    None,
                    vec![],
                    Some(bounds),
                );
                state.phase = state.loop_phase();
                (step, false)
            }
            MergePhase::Compare => {
                let li = state.left + state.i;
                let rj = state.mid + 1 + state.j;
                let step = self.step(
                    format!(
                        "Comparing L[{}] ({}) and R[{}] ({}). Placing element into index {}.",
                        state.i, state.l_buf[state.i], state.j, state.r_buf[state.j], state.k
                    ),
                    false,
                    self.range_highlights(
                        state.left,
                        state.right,
                        HighlightColor::Primary,
                        &[
                            (li, HighlightColor::Secondary),
                            (rj, HighlightColor::Secondary),
                        ],
                    ),
                    Some((li, rj)),
                    vec![],
                    Some(bounds),
                );
                state.phase = MergePhase::Place;
                (step, false)
            }
            MergePhase::Place => {
                if state.l_buf[state.i] <= state.r_buf[state.j] {
                    self.array[state.k] = state.l_buf[state.i];
                    state.i += 1;
                } else {
                    self.array[state.k] = state.r_buf[state.j];
                    state.j += 1;
                }
                state.k += 1;
                let step = self.step(
                    format!(
                        "Element placed. Array segment being merged: [{}]",
                        Self::join(&self.array[state.left..state.k]),
                    ),
                    false,
                    self.range_highlights(
                        state.left,
                        state.right,
                        HighlightColor::Primary,
                        &[(state.k - 1, HighlightColor::Accent)],
                    ),
                    None,
                    vec![],
                    Some(bounds),
                );
                state.phase = state.loop_phase();
                (step, false)
            }
            MergePhase::CopyLeft => {
                self.array[state.k] = state.l_buf[state.i];
                let step = self.step(
                    format!(
                        "Copying remaining L[{}] ({}) to index {}.",
                        state.i, state.l_buf[state.i], state.k
                    ),
                    false,
                    self.range_highlights(
                        state.left,
                        state.right,
                        HighlightColor::Primary,
                        &[(state.k, HighlightColor::Accent)],
                    ),
                    None,
                    vec![],
                    Some(bounds),
                );
                state.i += 1;
                state.k += 1;
                state.phase = state.loop_phase();
                (step, false)
            }
            MergePhase::CopyRight => {
                self.array[state.k] = state.r_buf[state.j];
                let step = self.step(
                    format!(
                        "Copying remaining R[{}] ({}) to index {}.",
                        state.j, state.r_buf[state.j], state.k
                    ),
                    false,
                    self.range_highlights(
                        state.left,
                        state.right,
                        HighlightColor::Primary,
                        &[(state.k, HighlightColor::Accent)],
                    ),
                    None,
                    vec![],
                    Some(bounds),
                );
                state.j += 1;
                state.k += 1;
                state.phase = state.loop_phase();
                (step, false)
            }
            MergePhase::Summary => {
                let step = self.step(
                    format!(
                        "Subarray from index {} to {} merged.",
                        state.left, state.right
                    ),
                    false,
                    self.range_highlights(state.left, state.right, HighlightColor::Accent, &[]),
                    None,
                    vec![],
                    Some(bounds),
                );
                (step, true)
            }
        }
    }
}

impl Iterator for MergeSort {
    type Item = SortStep;

    fn next(&mut self) -> Option<SortStep> {
        match self.phase {
            Phase::Start => {
                if !self.array.is_empty() {
                    self.stack.push(Frame::Sort {
                        left: 0,
                        right: self.array.len() - 1,
                    });
                }
                self.phase = Phase::Run;
                let highlights = (0..self.array.len())
                    .map(|i| ArrayHighlight::new(i, HighlightColor::Neutral))
                    .collect();
                Some(self.step(
                    "Starting Merge Sort.".to_string(),
                    false,
                    highlights,
                    None,
                    vec![],
                    None,
                ))
            }
            Phase::Run => loop {
                let Some(frame) = self.stack.pop() else {
                    self.phase = Phase::Finished;
                    let n = self.array.len();
                    let highlights = (0..n)
                        .map(|i| {
                            ArrayHighlight::new(i, HighlightColor::Accent).with_label("Sorted")
                        })
                        .collect();
                    return Some(self.step(
                        "Merge Sort complete. Array is sorted.".to_string(),
                        true,
                        highlights,
                        None,
                        (0..n).collect(),
                        None,
                    ));
                };
                match frame {
                    Frame::Sort { left, right } => {
                        if left >= right {
                            if left > right {
                                continue;
                            }
                            return Some(self.step(
                                format!(
                                    "Base case: element at index {} is a subarray of size 1.",
                                    left
                                ),
                                false,
                                self.range_highlights(
                                    left,
                                    left,
                                    HighlightColor::Info,
                                    &[],
                                ),
                                None,
                                vec![],
                                Some((left, right)),
                            ));
                        }
                        let mid = (left + right) / 2;
                        // Children are pushed in reverse so the left half
                        // sorts first, then the right, then the merge.
                        self.stack.push(Frame::Merge(MergeState::new(left, mid, right)));
                        self.stack.push(Frame::Sort {
                            left: mid + 1,
                            right,
                        });
                        self.stack.push(Frame::Sort { left, right: mid });
                        return Some(self.step(
                            format!(
                                "Splitting array. Left part: indices {} to {}. \
                                 Right part: indices {} to {}.",
                                left,
                                mid,
                                mid + 1,
                                right
                            ),
                            false,
                            self.range_highlights(left, right, HighlightColor::Primary, &[]),
                            None,
                            vec![],
                            Some((left, right)),
                        ));
                    }
                    Frame::Merge(mut state) => {
                        let (step, finished) = self.advance_merge(&mut state);
                        if !finished {
                            self.stack.push(Frame::Merge(state));
                        }
                        return Some(step);
                    }
                }
            },
            Phase::Finished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: Vec<i64>) -> Vec<SortStep> {
        MergeSort::new(input).collect()
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
    fn test_trivial_inputs() {
        let steps = run(vec![]);
        assert_eq!(steps.len(), 2);
        assert!(steps[1].is_final_step);

        let steps = run(vec![9]);
        // start, base case, final
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2].array, vec![9]);
    }

    #[test]
    fn test_split_before_merge_order() {
        let steps = run(vec![2, 1]);
        let messages: Vec<_> = steps.iter().map(|s| s.message.as_str()).collect();
        assert!(messages[1].starts_with("Splitting array."));
        assert!(messages[2].starts_with("Base case"));
        assert!(messages[3].starts_with("Base case"));
        assert!(messages[4].starts_with("Merging subarrays"));
        assert!(steps.last().unwrap().is_final_step);
    }

    #[test]
    fn test_merge_steps_cover_full_array_snapshot() {
        let steps = run(vec![4, 2, 7, 1, 9, 3]);
        for step in &steps {
            assert_eq!(step.array.len(), 6);
            assert_eq!(step.highlights.len(), 6);
        }
        assert_eq!(steps.last().unwrap().array, vec![1, 2, 3, 4, 7, 9]);
    }

    #[test]
    fn test_duplicate_values_stable_result() {
        let steps = run(vec![3, 3, 1, 1, 2]);
        assert_eq!(steps.last().unwrap().array, vec![1, 1, 2, 3, 3]);
    }
}
