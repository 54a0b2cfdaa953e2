//! Threshold policies that turn two running scores into a decision event.
//!
//! Both policies share one tie-break rule: the larger score wins, and an exact tie is
//! recorded as a neutral decision with both scores kept. Nothing is ever picked
//! arbitrarily.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{Category, DecisionRecord, Error, Result};

/// A validated decision threshold in the open interval `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(t: f64) -> Result<Self> {
        // NaN fails both comparisons and is rejected too.
        if t > 0.0 && t < 1.0 {
            Ok(Self(t))
        } else {
            Err(Error::InvalidThreshold(t))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Threshold {
    type Error = Error;

    fn try_from(t: f64) -> Result<Self> {
        Self::new(t)
    }
}

impl From<Threshold> for f64 {
    fn from(t: Threshold) -> Self {
        t.0
    }
}

/// Which stopping rule the score-based models use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeciderPolicy {
    /// Decide once either score reaches the threshold.
    #[default]
    Absolute,
    /// Decide once the scores differ by at least the threshold.
    Difference,
}

impl DeciderPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            DeciderPolicy::Absolute => "abs",
            DeciderPolicy::Difference => "diff",
        }
    }
}

impl fmt::Display for DeciderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeciderPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "abs" | "absolute" => Ok(DeciderPolicy::Absolute),
            "diff" | "difference" => Ok(DeciderPolicy::Difference),
            other => Err(format!("unknown decider policy {other:?} (expected abs|diff)")),
        }
    }
}

/// Apply `policy` to the scores seen at exemplar `step` (1-based).
///
/// Returns `Ok(None)` while the stopping condition is unmet so the caller keeps
/// accumulating. Non-finite scores are a hard error.
pub fn decide(
    policy: DeciderPolicy,
    score_a: f64,
    score_b: f64,
    threshold: Threshold,
    step: usize,
) -> Result<Option<DecisionRecord>> {
    if !score_a.is_finite() || !score_b.is_finite() {
        return Err(Error::NonFiniteScore {
            score_a,
            score_b,
            step,
        });
    }
    let t = threshold.get();
    let met = match policy {
        DeciderPolicy::Absolute => score_a >= t || score_b >= t,
        DeciderPolicy::Difference => (score_a - score_b).abs() >= t,
    };
    if !met {
        return Ok(None);
    }
    resolve(score_a, score_b, step).map(Some)
}

/// Pick the winner of a threshold crossing.
pub fn resolve(score_a: f64, score_b: f64, step: usize) -> Result<DecisionRecord> {
    match score_a.partial_cmp(&score_b) {
        Some(Ordering::Greater) => Ok(DecisionRecord::decided(Category::A, score_a, score_b, step)),
        Some(Ordering::Less) => Ok(DecisionRecord::decided(Category::B, score_b, score_a, step)),
        Some(Ordering::Equal) => Ok(DecisionRecord::decided(Category::N, score_a, score_b, step)),
        None => Err(Error::Invariant("scores are not comparable")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn th(t: f64) -> Threshold {
        Threshold::new(t).unwrap()
    }

    #[test]
    fn threshold_bounds_are_open() {
        assert!(Threshold::new(0.0).is_err());
        assert!(Threshold::new(1.0).is_err());
        assert!(Threshold::new(-0.1).is_err());
        assert!(Threshold::new(f64::NAN).is_err());
        assert!(Threshold::new(f64::INFINITY).is_err());
        assert_eq!(Threshold::new(0.5).unwrap().get(), 0.5);
    }

    #[test]
    fn absolute_picks_larger_score() {
        let r = decide(DeciderPolicy::Absolute, 0.6, 0.2, th(0.5), 3)
            .unwrap()
            .unwrap();
        assert_eq!(r.decision, Category::A);
        assert_eq!(r.chosen_score, Some(0.6));
        assert_eq!(r.unchosen_score, Some(0.2));
        assert_eq!(r.latency, Some(3));

        let r = decide(DeciderPolicy::Absolute, 0.1, 0.5, th(0.5), 1)
            .unwrap()
            .unwrap();
        assert_eq!(r.decision, Category::B);
        assert_eq!(r.chosen_score, Some(0.5));
    }

    #[test]
    fn absolute_below_threshold_is_undecided() {
        assert!(decide(DeciderPolicy::Absolute, 0.4, 0.4, th(0.5), 1)
            .unwrap()
            .is_none());
    }

    #[test]
    fn absolute_tie_at_threshold_is_neutral_with_scores() {
        let r = decide(DeciderPolicy::Absolute, 0.5, 0.5, th(0.5), 2)
            .unwrap()
            .unwrap();
        assert_eq!(r.decision, Category::N);
        assert_eq!(r.chosen_score, Some(0.5));
        assert_eq!(r.unchosen_score, Some(0.5));
        assert_eq!(r.latency, Some(2));
    }

    #[test]
    fn difference_uses_gap() {
        assert!(decide(DeciderPolicy::Difference, 0.9, 0.6, th(0.5), 1)
            .unwrap()
            .is_none());
        let r = decide(DeciderPolicy::Difference, 0.1, 0.7, th(0.5), 4)
            .unwrap()
            .unwrap();
        assert_eq!(r.decision, Category::B);
        assert_eq!(r.latency, Some(4));
    }

    #[test]
    fn non_finite_scores_fail_fast() {
        let err = decide(DeciderPolicy::Absolute, f64::NAN, 0.1, th(0.5), 1).unwrap_err();
        assert!(matches!(err, Error::NonFiniteScore { step: 1, .. }));
        assert!(decide(DeciderPolicy::Difference, 0.1, f64::INFINITY, th(0.5), 1).is_err());
    }

    #[test]
    fn policy_parses_short_and_long_names() {
        assert_eq!("abs".parse::<DeciderPolicy>().unwrap(), DeciderPolicy::Absolute);
        assert_eq!(
            "difference".parse::<DeciderPolicy>().unwrap(),
            DeciderPolicy::Difference
        );
        assert!("relative".parse::<DeciderPolicy>().is_err());
    }
}
