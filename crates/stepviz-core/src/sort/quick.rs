//! Quick sort engine.
//!
//! Lomuto partitioning with the last element as pivot, flattened onto an
//! explicit work-stack. Pivot indices confirmed sorted accumulate across
//! sub-ranges for cumulative highlighting.

use crate::step::SortStep;
use stepviz_common::utils::hash::FxHashSet;
use stepviz_common::{ArrayHighlight, HighlightColor};

enum PartPhase {
    Announce,
    Compare,
    SwapAnnounce,
    SwapDone,
    PivotSwapAnnounce,
    PivotPlaced,
    Sorted,
}

/// In-flight Lomuto partition of `[low, high]` with pivot at `high`.
struct PartState {
    low: usize,
    high: usize,
    pivot: i64,
    /// Boundary of the less-than-pivot region, one below the next swap
    /// destination. Starts below `low`.
    i: i64,
    j: usize,
    /// Final pivot position, set once the pivot swap lands.
    placed: usize,
    phase: PartPhase,
}

impl PartState {
    fn new(low: usize, high: usize, pivot: i64) -> Self {
        Self {
            low,
            high,
            pivot,
            i: low as i64 - 1,
            j: low,
            placed: 0,
            phase: PartPhase::Announce,
        }
    }
}

enum Frame {
    Sort { low: i64, high: i64 },
    Partition(PartState),
}

enum Phase {
    Start,
    Run,
    Finished,
}

/// Divide-and-conquer sort yielding comparison, boundary-swap, and
/// pivot-placement steps for every partition.
pub struct QuickSort {
    array: Vec<i64>,
    sorted: FxHashSet<usize>,
    stack: Vec<Frame>,
    phase: Phase,
}

impl QuickSort {
    /// Creates a run over `array`.
    #[must_use]
    pub fn new(array: Vec<i64>) -> Self {
        Self {
            array,
            sorted: FxHashSet::default(),
            stack: Vec::new(),
            phase: Phase::Start,
        }
    }

    fn step(
        &self,
        message: String,
        is_final_step: bool,
        highlights: Vec<ArrayHighlight>,
        comparing: Option<(usize, usize)>,
        swapping: Option<(usize, usize)>,
        pivot_index: Option<usize>,
        sub_array_bounds: Option<(usize, usize)>,
    ) -> SortStep {
        let mut sorted_indices: Vec<usize> = self.sorted.iter().copied().collect();
        sorted_indices.sort_unstable();
        SortStep {
            array: self.array.clone(),
            message,
            is_final_step,
            highlights,
            comparing,
            swapping,
            sorted_indices,
            pivot_index,
            sub_array_bounds,
        }
    }

    /// Partition-view highlights: pivot destructive, the less-than region
    /// info, the active window primary, settled pivots accent, the rest
    /// neutral. `special` wins over everything.
    fn partition_highlights(
        &self,
        st: &PartState,
        special: &[(usize, HighlightColor, Option<&str>)],
        pivot_labeled: bool,
    ) -> Vec<ArrayHighlight> {
        (0..self.array.len())
            .map(|k| {
                if let Some((_, color, label)) = special.iter().find(|(s, _, _)| *s == k) {
                    let h = ArrayHighlight::new(k, *color);
                    match label {
                        Some(l) => h.with_label(*l),
                        None => h,
                    }
                } else if pivot_labeled && k == st.high {
                    ArrayHighlight::new(k, HighlightColor::Destructive).with_label("Pivot")
                } else if k >= st.low && (k as i64) <= st.i {
                    ArrayHighlight::new(k, HighlightColor::Info)
                } else if k >= st.low && k <= st.high {
                    ArrayHighlight::new(k, HighlightColor::Primary)
                } else {
                    ArrayHighlight::new(k, HighlightColor::Neutral)
                }
            })
            .collect()
    }

    /// Advances the in-flight partition by one emission. Returns the step
    /// and, once finished, the pivot's final index.
    fn advance_partition(&mut self, st: &mut PartState) -> (SortStep, Option<usize>) {
        let bounds = (st.low, st.high);
        match st.phase {
            PartPhase::Announce => {
                let step = self.step(
                    format!(
                        "Partitioning from index {} to {}. Pivot is {} (at index {}).",
                        st.low, st.high, st.pivot, st.high
                    ),
                    false,
                    self.partition_highlights(st, &[], true),
                    None,
                    None,
                    Some(st.high),
                    Some(bounds),
                );
                st.phase = PartPhase::Compare;
                (step, None)
            }
            PartPhase::Compare => {
                let j = st.j;
                let step = self.step(
                    format!(
                        "Comparing element at index {} ({}) with pivot {}.",
                        j, self.array[j], st.pivot
                    ),
                    false,
                    self.partition_highlights(
                        st,
                        &[(j, HighlightColor::Secondary, None)],
                        true,
                    ),
                    Some((j, st.high)),
                    None,
                    Some(st.high),
                    Some(bounds),
                );
                if self.array[j] < st.pivot {
                    st.i += 1;
                    st.phase = PartPhase::SwapAnnounce;
                } else {
                    st.j += 1;
                    st.phase = if st.j < st.high {
                        PartPhase::Compare
                    } else {
                        PartPhase::PivotSwapAnnounce
                    };
                }
                (step, None)
            }
            PartPhase::SwapAnnounce => {
                let i = st.i as usize;
                let j = st.j;
                let step = self.step(
                    format!(
                        "Element {} < pivot. Swapping {} (at index {}) and {} (at index {}).",
                        self.array[j], self.array[i], i, self.array[j], j
                    ),
                    false,
                    self.partition_highlights(
                        st,
                        &[
                            (i, HighlightColor::Accent, None),
                            (j, HighlightColor::Accent, None),
                        ],
                        true,
                    ),
                    None,
                    Some((i, j)),
                    Some(st.high),
                    Some(bounds),
                );
                self.array.swap(i, j);
                st.phase = PartPhase::SwapDone;
                (step, None)
            }
            PartPhase::SwapDone => {
                let step = self.step(
                    format!(
                        "Swap complete. Smaller elements partition boundary is now at index {}.",
                        st.i
                    ),
                    false,
                    self.partition_highlights(st, &[], true),
                    None,
                    None,
                    Some(st.high),
                    Some(bounds),
                );
                st.j += 1;
                st.phase = if st.j < st.high {
                    PartPhase::Compare
                } else {
                    PartPhase::PivotSwapAnnounce
                };
                (step, None)
            }
            PartPhase::PivotSwapAnnounce => {
                let dest = (st.i + 1) as usize;
                let step = self.step(
                    format!(
                        "Placing pivot {} in its sorted position. Swapping {} (at index {}) \
                         and {} (pivot at index {}).",
                        st.pivot, self.array[dest], dest, self.array[st.high], st.high
                    ),
                    false,
                    self.partition_highlights(
                        st,
                        &[
                            (dest, HighlightColor::Accent, None),
                            (st.high, HighlightColor::Accent, None),
                        ],
                        false,
                    ),
                    None,
                    Some((dest, st.high)),
                    Some(st.high),
                    Some(bounds),
                );
                self.array.swap(dest, st.high);
                st.placed = dest;
                st.phase = PartPhase::PivotPlaced;
                (step, None)
            }
            PartPhase::PivotPlaced => {
                let p = st.placed;
                let step = self.step(
                    format!(
                        "Pivot {} (original pivot) is now at its sorted position: index {}.",
                        self.array[p], p
                    ),
                    false,
                    self.partition_highlights(
                        st,
                        &[(p, HighlightColor::Accent, Some("Sorted Pivot"))],
                        false,
                    ),
                    None,
                    None,
                    Some(p),
                    Some(bounds),
                );
                st.phase = PartPhase::Sorted;
                (step, None)
            }
            PartPhase::Sorted => {
                let p = st.placed;
                self.sorted.insert(p);
                let highlights = (0..self.array.len())
                    .map(|k| {
                        if k == p {
                            ArrayHighlight::new(k, HighlightColor::Accent).with_label("Sorted")
                        } else if k >= st.low && k < p {
                            ArrayHighlight::new(k, HighlightColor::Info)
                        } else if k > p && k <= st.high {
                            ArrayHighlight::new(k, HighlightColor::Primary)
                        } else {
                            ArrayHighlight::new(k, HighlightColor::Neutral)
                        }
                    })
                    .collect();
                let step = self.step(
                    format!(
                        "Pivot at index {} is sorted. Recursively sorting left and right \
                         partitions.",
                        p
                    ),
                    false,
                    highlights,
                    None,
                    None,
                    Some(p),
                    None,
                );
                (step, Some(p))
            }
        }
    }

    fn sorted_set_highlights(&self) -> Vec<ArrayHighlight> {
        (0..self.array.len())
            .map(|k| {
                if self.sorted.contains(&k) {
                    ArrayHighlight::new(k, HighlightColor::Accent).with_label("Sorted")
                } else {
                    ArrayHighlight::new(k, HighlightColor::Neutral)
                }
            })
            .collect()
    }
}

impl Iterator for QuickSort {
    type Item = SortStep;

    fn next(&mut self) -> Option<SortStep> {
        match self.phase {
            Phase::Start => {
                if !self.array.is_empty() {
                    self.stack.push(Frame::Sort {
                        low: 0,
                        high: self.array.len() as i64 - 1,
                    });
                }
                self.phase = Phase::Run;
                let highlights = (0..self.array.len())
                    .map(|i| ArrayHighlight::new(i, HighlightColor::Neutral))
                    .collect();
                Some(self.step(
                    "Starting Quick Sort.".to_string(),
                    false,
                    highlights,
                    None,
                    None,
                    None,
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
                    return Some(SortStep {
                        array: self.array.clone(),
                        message: "Quick Sort complete. Array is sorted.".to_string(),
                        is_final_step: true,
                        highlights,
                        comparing: None,
                        swapping: None,
                        sorted_indices: (0..n).collect(),
                        pivot_index: None,
                        sub_array_bounds: None,
                    });
                };
                match frame {
                    Frame::Sort { low, high } => {
                        if low > high {
                            continue;
                        }
                        if low == high {
                            self.sorted.insert(low as usize);
                            return Some(self.step(
                                format!("Base case: Element at index {} is sorted.", low),
                                false,
                                self.sorted_set_highlights(),
                                None,
                                None,
                                None,
                                None,
                            ));
                        }
                        let (lo, hi) = (low as usize, high as usize);
                        let pivot = self.array[hi];
                        self.stack
                            .push(Frame::Partition(PartState::new(lo, hi, pivot)));
                        let highlights = (0..self.array.len())
                            .map(|k| {
                                if self.sorted.contains(&k) {
                                    ArrayHighlight::new(k, HighlightColor::Accent)
                                        .with_label("Sorted")
                                } else if k >= lo && k <= hi {
                                    ArrayHighlight::new(k, HighlightColor::Primary)
                                } else {
                                    ArrayHighlight::new(k, HighlightColor::Neutral)
                                }
                            })
                            .collect();
                        return Some(self.step(
                            format!(
                                "Recursively sorting subarray from index {} to {}.",
                                lo, hi
                            ),
                            false,
                            highlights,
                            None,
                            None,
                            None,
                            Some((lo, hi)),
                        ));
                    }
                    Frame::Partition(mut st) => {
                        let (step, placed) = self.advance_partition(&mut st);
                        match placed {
                            Some(p) => {
                                // Left sub-range sorts before the right one.
                                self.stack.push(Frame::Sort {
                                    low: p as i64 + 1,
                                    high: st.high as i64,
                                });
                                self.stack.push(Frame::Sort {
                                    low: st.low as i64,
                                    high: p as i64 - 1,
                                });
                            }
                            None => self.stack.push(Frame::Partition(st)),
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
        QuickSort::new(input).collect()
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
        for input in [vec![], vec![4]] {
            let steps = run(input.clone());
            let last = steps.last().unwrap();
            assert!(last.is_final_step);
            assert_eq!(last.array, input);
        }
    }

    #[test]
    fn test_pivot_settles_before_recursion() {
        let steps = run(vec![3, 1, 2]);
        // Pivot 2 lands at index 1 before either partition is revisited.
        let placed = steps
            .iter()
            .find(|s| s.message.contains("sorted position: index"))
            .unwrap();
        assert_eq!(placed.pivot_index, Some(1));
        assert_eq!(placed.array, vec![1, 2, 3]);
    }

    #[test]
    fn test_sorted_indices_accumulate() {
        let steps = run(vec![4, 2, 7, 1]);
        let mut seen = 0;
        for step in &steps {
            assert!(step.sorted_indices.len() >= seen);
            seen = step.sorted_indices.len();
        }
        assert_eq!(seen, 4);
    }

    #[test]
    fn test_duplicates_and_reverse() {
        assert_eq!(
            run(vec![5, 5, 5]).last().unwrap().array,
            vec![5, 5, 5]
        );
        assert_eq!(
            run(vec![9, 7, 5, 3, 1]).last().unwrap().array,
            vec![1, 3, 5, 7, 9]
        );
    }
}
