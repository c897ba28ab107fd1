//! Sort engines: bubble, merge, and quick sort.
//!
//! Each consumes a numeric sequence and yields a lazy, finite sequence of
//! [`crate::step::SortStep`]s whose final step's `array` is the
//! ascending-sorted permutation of the input, with `sorted_indices`
//! covering every index. The recursive algorithms (merge, quick) run on
//! explicit work-stacks of pending sub-ranges so the engine can suspend
//! between any two emissions.

mod bubble;
mod merge;
mod quick;

pub use bubble::BubbleSort;
pub use merge::MergeSort;
pub use quick::QuickSort;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::SortStep;
    use proptest::prelude::*;

    fn assert_sorted_run(input: &[i64], steps: &[SortStep]) {
        let mut expected = input.to_vec();
        expected.sort_unstable();

        let last = steps.last().unwrap();
        assert!(last.is_final_step);
        assert_eq!(last.array, expected);
        let mut covered = last.sorted_indices.clone();
        covered.sort_unstable();
        assert_eq!(covered, (0..input.len()).collect::<Vec<_>>());

        assert_eq!(steps.iter().filter(|s| s.is_final_step).count(), 1);
        for step in steps {
            assert_eq!(step.array.len(), input.len());
        }
    }

    proptest! {
        #[test]
        fn prop_bubble_sorts(input in proptest::collection::vec(-50i64..50, 0..12)) {
            let steps: Vec<_> = BubbleSort::new(input.clone()).collect();
            assert_sorted_run(&input, &steps);
        }

        #[test]
        fn prop_merge_sorts(input in proptest::collection::vec(-50i64..50, 0..12)) {
            let steps: Vec<_> = MergeSort::new(input.clone()).collect();
            assert_sorted_run(&input, &steps);
        }

        #[test]
        fn prop_quick_sorts(input in proptest::collection::vec(-50i64..50, 0..12)) {
            let steps: Vec<_> = QuickSort::new(input.clone()).collect();
            assert_sorted_run(&input, &steps);
        }
    }

    #[test]
    fn test_identical_runs_yield_identical_step_sequences() {
        let input = vec![9, -2, 4, 4, 0, 7];
        let a: Vec<_> = QuickSort::new(input.clone()).collect();
        let b: Vec<_> = QuickSort::new(input).collect();
        assert_eq!(a, b);
    }
}
