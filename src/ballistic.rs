//! Ballistic accumulators: an incremental LBA and a ballistic leaky competing
//! accumulator.
//!
//! Both are noise-free and run one update per exemplar (unit time step).

use crate::{decide, DeciderPolicy, DecisionRecord, Result, Symbol, Threshold, Trial};

/// Linear ballistic accumulator (Brown & Heathcote, 2008) with exclusive updates.
///
/// Both accumulators start at `k`. Each exemplar advances only its own category's
/// accumulator by the drift `d`.
pub fn incremental_lba(
    trial: &Trial,
    threshold: Threshold,
    policy: DeciderPolicy,
    k: f64,
    d: f64,
) -> Result<DecisionRecord> {
    let (mut score_a, mut score_b) = (k, k);
    for (ii, s) in trial.iter().enumerate() {
        match s {
            Symbol::A => score_a += d,
            Symbol::B => score_b += d,
        }
        if let Some(r) = decide(policy, score_a, score_b, threshold, ii + 1)? {
            return Ok(r);
        }
    }
    Ok(DecisionRecord::NEUTRAL)
}

/// Ballistic leaky competing accumulator (after Usher & McClelland, 2001).
///
/// Two units with leak `leak` and mutual inhibition `beta`, tied by `x_B = 1 - x_A`, reduce
/// to one scalar `score = x_A` that starts at `0.5`:
///
/// ```text
/// score <- clamp01(score + input / 2 - (leak - beta) * (score - 0.5))
/// ```
///
/// where `input = +wi / l` on an A exemplar and `-wi / l` on a B exemplar. The impulse
/// `1 / l` keeps the largest possible drive equal across trial lengths. With
/// `leak > beta` the score relaxes toward `0.5`; with `beta > leak` inhibition wins and
/// early leads are amplified. Scores are always complementary.
///
/// The state is kept as the offset `score - 0.5` so that a complemented trial runs the
/// negated recurrence exactly.
pub fn blca(
    trial: &Trial,
    threshold: Threshold,
    policy: DeciderPolicy,
    wi: f64,
    leak: f64,
    beta: f64,
) -> Result<DecisionRecord> {
    let impulse = 1.0 / trial.len() as f64;
    let mut offset = 0.0_f64;
    for (ii, s) in trial.iter().enumerate() {
        let input = match s {
            Symbol::A => wi * impulse,
            Symbol::B => -wi * impulse,
        };
        offset = (offset + 0.5 * input - (leak - beta) * offset).clamp(-0.5, 0.5);
        let score_a = 0.5 + offset;
        let score_b = 0.5 - offset;
        if let Some(r) = decide(policy, score_a, score_b, threshold, ii + 1)? {
            return Ok(r);
        }
    }
    Ok(DecisionRecord::NEUTRAL)
}
