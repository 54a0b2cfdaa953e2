//! Counting models (after Audley & Pike, 1965).
//!
//! `absolute_count` normalizes each symbol count by the trial length, so a score is the
//! share of the *whole* trial already observed for that category. `relative_count`
//! compares the two counts to each other and only starts deciding once both symbols have
//! been seen.

use crate::{decide, DeciderPolicy, DecisionRecord, Result, Symbol, Threshold, Trial};

pub fn absolute_count(
    trial: &Trial,
    threshold: Threshold,
    policy: DeciderPolicy,
) -> Result<DecisionRecord> {
    let l = trial.len() as f64;
    let (mut c_a, mut c_b) = (0u32, 0u32);
    for (ii, s) in trial.iter().enumerate() {
        match s {
            Symbol::A => c_a += 1,
            Symbol::B => c_b += 1,
        }
        let score_a = f64::from(c_a) / l;
        let score_b = f64::from(c_b) / l;
        if let Some(r) = decide(policy, score_a, score_b, threshold, ii + 1)? {
            return Ok(r);
        }
    }
    Ok(DecisionRecord::NEUTRAL)
}

pub fn relative_count(
    trial: &Trial,
    threshold: Threshold,
    policy: DeciderPolicy,
) -> Result<DecisionRecord> {
    let (mut c_a, mut c_b) = (0u32, 0u32);
    for (ii, s) in trial.iter().enumerate() {
        match s {
            Symbol::A => c_a += 1,
            Symbol::B => c_b += 1,
        }
        if c_a == 0 || c_b == 0 {
            continue;
        }
        let seen = f64::from(c_a + c_b);
        let score_a = f64::from(c_a) / seen;
        let score_b = f64::from(c_b) / seen;
        if let Some(r) = decide(policy, score_a, score_b, threshold, ii + 1)? {
            return Ok(r);
        }
    }
    Ok(DecisionRecord::NEUTRAL)
}
