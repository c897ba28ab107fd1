//! Crate-wide error type.
//!
//! Domain conditions (unknown node references, unreachable targets,
//! negative cycles) are never errors: engines report them through the step
//! channel so callers keep a single rendering path. [`Error`] covers
//! programmatic misuse of the surrounding API.

use thiserror::Error;

/// Errors produced by the Stepviz API surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A random-graph configuration asked for an impossible weight range.
    #[error("invalid weight range: min {min} is greater than max {max}")]
    InvalidWeightRange {
        /// Requested minimum weight.
        min: f64,
        /// Requested maximum weight.
        max: f64,
    },

    /// An algorithm key string did not match any known algorithm.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidWeightRange { min: 5.0, max: 1.0 };
        assert_eq!(
            err.to_string(),
            "invalid weight range: min 5 is greater than max 1"
        );
        assert_eq!(
            Error::UnknownAlgorithm("bogo-sort".into()).to_string(),
            "unknown algorithm: bogo-sort"
        );
    }
}
