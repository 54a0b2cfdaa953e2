//! Error type shared by every fallible operation in the crate.
//!
//! Configuration errors (threshold, trial length, symbols, encodings, model names) are
//! raised before any simulation work starts. `NonFiniteScore` and `Invariant` are raised
//! mid-run and fail the whole categorization request.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Decision thresholds live in the open interval `(0, 1)`.
    #[error("threshold must be in (0, 1), got {0}")]
    InvalidThreshold(f64),

    /// Trial lengths must be even, positive and small enough to enumerate.
    #[error("trial length must be an even integer in [2, {max}], got {got}")]
    InvalidTrialLength { got: usize, max: usize },

    /// A trial (or trial source) did not have the length the request asked for.
    #[error("trial length mismatch: expected {expected}, got {got}")]
    TrialLengthMismatch { expected: usize, got: usize },

    /// A trial string contained something other than `A` or `B`.
    #[error("invalid symbol {0:?} (expected 'A' or 'B')")]
    InvalidSymbol(char),

    /// A symbol re-encoding must name exactly two distinct, non-empty tokens.
    #[error("invalid symbol encoding: {0}")]
    InvalidEncoding(&'static str),

    /// A model hyperparameter is outside its domain (e.g. a NaN drift rate).
    #[error("invalid parameter for model {model:?}: {reason}")]
    InvalidParameter { model: String, reason: &'static str },

    /// Model names key the result table and must be unique within a request.
    #[error("duplicate model name {0:?}")]
    DuplicateModel(String),

    /// A model name that is not part of the result table.
    #[error("unknown model {0:?}")]
    UnknownModel(String),

    /// Run names become file names and must be plain, non-empty path components.
    #[error("invalid run name {0:?}")]
    InvalidRunName(String),

    /// Runs in one plan share an output directory, so their names must differ.
    #[error("duplicate run name {0:?}")]
    DuplicateRun(String),

    /// The decider was handed NaN or an infinite score.
    #[error("non-finite score at step {step}: A={score_a}, B={score_b}")]
    NonFiniteScore { score_a: f64, score_b: f64, step: usize },

    /// An internal invariant failed. This is a bug, not a configuration problem.
    #[error("invariant violated: {0}")]
    Invariant(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "cli")]
    #[error("invalid run plan: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors that stem from the request rather than from a model run.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidThreshold(_)
                | Error::InvalidTrialLength { .. }
                | Error::TrialLengthMismatch { .. }
                | Error::InvalidSymbol(_)
                | Error::InvalidEncoding(_)
                | Error::InvalidParameter { .. }
                | Error::DuplicateModel(_)
                | Error::UnknownModel(_)
                | Error::InvalidRunName(_)
                | Error::DuplicateRun(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        assert!(Error::InvalidThreshold(1.0).is_configuration());
        assert!(Error::InvalidTrialLength { got: 3, max: 62 }.is_configuration());
        assert!(!Error::Invariant("x").is_configuration());
        assert!(!Error::NonFiniteScore {
            score_a: f64::NAN,
            score_b: 0.0,
            step: 1
        }
        .is_configuration());
    }

    #[test]
    fn messages_name_the_offending_value() {
        let msg = Error::InvalidSymbol('C').to_string();
        assert!(msg.contains("'C'"), "{msg}");
        let msg = Error::InvalidThreshold(0.0).to_string();
        assert!(msg.contains('0'), "{msg}");
    }
}
