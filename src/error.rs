//! Error types for network construction and training.

use thiserror::Error;

/// Errors reported by layers, networks and trainers.
///
/// Every error is detected before the failing operation mutates any state.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("{context}: expected length {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid hyperparameter {name} = {value}, must be positive")]
    InvalidHyperparameter { name: &'static str, value: f64 },

    #[error("training set is empty")]
    EmptyDataset,

    #[error("non-matching training sets: {inputs} inputs, {outputs} outputs")]
    TrainingSetMismatch { inputs: usize, outputs: usize },

    #[error("invalid network topology: {0}")]
    InvalidTopology(String),

    #[error("unknown activator: {0}")]
    UnknownActivator(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns a `ShapeMismatch` error unless `actual == expected`.
pub(crate) fn check_len(
    context: &'static str,
    expected: usize,
    actual: usize,
) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            context,
            expected,
            actual,
        })
    }
}

/// Returns an `InvalidHyperparameter` error unless `value > 0`.
pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidHyperparameter { name, value })
    }
}
