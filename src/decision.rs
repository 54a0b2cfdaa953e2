//! The per-(model, trial) decision record.
//!
//! A record is produced once by a model evaluation and never mutated afterwards; the
//! statistics and export layers only read it.

use std::fmt;

use crate::Symbol;

/// Outcome category. `N` (neutral) means no category was committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    A,
    B,
    N,
}

impl Category {
    pub fn is_neutral(self) -> bool {
        self == Category::N
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::A => "A",
            Category::B => "B",
            Category::N => "N",
        }
    }

    /// Swap `A` and `B`; `N` is its own complement.
    #[must_use]
    pub fn complement(self) -> Self {
        match self {
            Category::A => Category::B,
            Category::B => Category::A,
            Category::N => Category::N,
        }
    }
}

impl From<Symbol> for Category {
    fn from(s: Symbol) -> Self {
        match s {
            Symbol::A => Category::A,
            Symbol::B => Category::B,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One model's verdict on one trial.
///
/// `latency` is the 1-based index of the exemplar at which the decision was made. It is
/// `None` exactly when the model never reached a decision; it is never `Some(0)`.
/// A tie at threshold yields `decision = N` *with* scores and latency recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionRecord {
    pub decision: Category,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub chosen_score: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub unchosen_score: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub latency: Option<usize>,
}

impl DecisionRecord {
    /// The "never decided" record: `(N, None, None, None)`.
    pub const NEUTRAL: DecisionRecord = DecisionRecord {
        decision: Category::N,
        chosen_score: None,
        unchosen_score: None,
        latency: None,
    };

    /// A decision reached at exemplar `step` (1-based).
    pub fn decided(decision: Category, chosen: f64, unchosen: f64, step: usize) -> Self {
        debug_assert!(step >= 1, "latency is 1-based");
        Self {
            decision,
            chosen_score: Some(chosen),
            unchosen_score: Some(unchosen),
            latency: Some(step),
        }
    }

    /// True if the model never crossed its threshold.
    pub fn is_undecided(&self) -> bool {
        self.latency.is_none()
    }
}

impl Default for DecisionRecord {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
