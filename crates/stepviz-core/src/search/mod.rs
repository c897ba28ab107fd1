//! Search engines: linear scan and binary bisection.
//!
//! Both consume a numeric sequence and a target value and yield a lazy,
//! finite, non-restartable sequence of [`crate::step::SearchStep`]s
//! terminating in either `target_found_at_index` set (success) or unset
//! (exhaustion). Ties among duplicate target values resolve to whichever
//! index the scan/bisection order encounters first.

mod binary;
mod linear;

pub use binary::BinarySearch;
pub use linear::LinearSearch;
