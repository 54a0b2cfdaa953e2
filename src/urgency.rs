//! Urgency gating (after Cisek, Puskas & El-Murr, 2009).
//!
//! The evidence signal is the probability that the trial, completed uniformly at random,
//! ends with a strict majority for a category. An urgency signal that grows with elapsed
//! exemplars multiplies the evidence in excess of chance.

use crate::utils::fair_upper_tail;
use crate::{decide, DeciderPolicy, DecisionRecord, Error, Result, Symbol, Threshold, Trial};

/// Probability that `trial` ends with a strict majority of `target`, given only the
/// exemplars `trial[0..=i]`.
///
/// The `l - (i + 1)` unseen exemplars are treated as fair coin flips. When the majority is
/// already out of reach the result is `0`; when it is already secured the result is `1`.
///
/// ```rust
/// use accumulate::{p_response, Symbol, Trial};
///
/// let t: Trial = "AABB".parse().unwrap();
/// assert_eq!(p_response(&t, 1, Symbol::A).unwrap(), 0.75);
/// assert_eq!(p_response(&t, 3, Symbol::A).unwrap(), 0.0);
/// ```
pub fn p_response(trial: &Trial, i: usize, target: Symbol) -> Result<f64> {
    let l = trial.len();
    if i >= l {
        return Err(Error::Invariant("p_response index past end of trial"));
    }
    let seen = &trial.symbols()[..=i];
    let c_target = seen.iter().filter(|&&s| s == target).count();
    let unseen = l - (i + 1);
    let need = (l / 2 + 1).saturating_sub(c_target);
    // l <= 62, so both fit in u32.
    Ok(fair_upper_tail(unseen as u32, need as u32))
}

pub fn urgency_gating(
    trial: &Trial,
    threshold: Threshold,
    policy: DeciderPolicy,
    gain: f64,
) -> Result<DecisionRecord> {
    for ii in 0..trial.len() {
        let step = ii + 1;
        let urgency = gain * step as f64;
        let p_a = p_response(trial, ii, Symbol::A)?;
        let p_b = p_response(trial, ii, Symbol::B)?;
        let score_a = urgency * (p_a - 0.5).max(0.0);
        let score_b = urgency * (p_b - 0.5).max(0.0);
        if let Some(r) = decide(policy, score_a, score_b, threshold, step)? {
            return Ok(r);
        }
    }
    Ok(DecisionRecord::NEUTRAL)
}
