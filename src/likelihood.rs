//! Likelihood-based models: the naive run-length model and a sequential
//! likelihood-ratio test.

use std::cmp::Ordering;

use crate::{
    decide, Category, DeciderPolicy, DecisionRecord, Error, Result, Symbol, Threshold, Trial,
};

/// Confidence from the length of the current run of identical symbols.
///
/// The streak probability `p` starts at `0.5`, halves on every repeat and resets on a
/// change of symbol. On a repeat the streak category's score becomes `1 - p`; the other
/// category keeps whatever score it last had (initially zero). The decider is only
/// consulted on repeats, so the earliest possible decision is at exemplar 2.
pub fn naive_probability(
    trial: &Trial,
    threshold: Threshold,
    policy: DeciderPolicy,
) -> Result<DecisionRecord> {
    let mut streak = trial.first();
    let mut p = 0.5_f64;
    let (mut score_a, mut score_b) = (0.0_f64, 0.0_f64);
    for (ii, s) in trial.iter().enumerate().skip(1) {
        if s != streak {
            streak = s;
            p = 0.5;
            continue;
        }
        p *= 0.5;
        match s {
            Symbol::A => score_a = 1.0 - p,
            Symbol::B => score_b = 1.0 - p,
        }
        if let Some(r) = decide(policy, score_a, score_b, threshold, ii + 1)? {
            return Ok(r);
        }
    }
    Ok(DecisionRecord::NEUTRAL)
}

/// Deciban threshold for a `(0, 1)` threshold: 2 decibans is roughly 99% confidence.
pub fn deciban_threshold(threshold: Threshold) -> f64 {
    threshold.get() * 2.0
}

/// Sequential likelihood-ratio test on the running count ratio (log base 10).
///
/// `log_lr += log10(cA / cB)` once both symbols have been seen; a decision is made when
/// `|log_lr|` reaches [`deciban_threshold`] and its sign picks the winner. Trials made of a
/// single symbol are never decided. This model has its own stopping rule and ignores the
/// decider policy.
///
/// The A and B terms are summed separately and subtracted at each step, so the complement
/// trial sees `-log_lr` bit for bit and crosses the bound at the same exemplar.
pub fn likelihood_ratio(trial: &Trial, threshold: Threshold) -> Result<DecisionRecord> {
    let bound = deciban_threshold(threshold);
    let (mut c_a, mut c_b) = (0u32, 0u32);
    let (mut sum_a, mut sum_b) = (0.0_f64, 0.0_f64);
    for (ii, s) in trial.iter().enumerate() {
        match s {
            Symbol::A => c_a += 1,
            Symbol::B => c_b += 1,
        }
        if c_a == 0 || c_b == 0 {
            continue;
        }
        sum_a += f64::from(c_a).log10();
        sum_b += f64::from(c_b).log10();
        let log_lr = sum_a - sum_b;
        let step = ii + 1;
        if !log_lr.is_finite() {
            return Err(Error::NonFiniteScore {
                score_a: log_lr,
                score_b: 0.0,
                step,
            });
        }
        if log_lr.abs() < bound {
            continue;
        }
        let decision = match log_lr.partial_cmp(&0.0) {
            Some(Ordering::Greater) => Category::A,
            Some(Ordering::Less) => Category::B,
            Some(Ordering::Equal) => Category::N,
            None => return Err(Error::Invariant("log-likelihood ratio is not comparable")),
        };
        return Ok(DecisionRecord::decided(decision, log_lr.abs(), 0.0, step));
    }
    Ok(DecisionRecord::NEUTRAL)
}
