//! Aggregate statistics over a [`ModelResultTable`], relative to a reference model.

use std::collections::BTreeMap;

use crate::{DecisionRecord, ModelResultTable, Result, Trial};

/// Agreement of `other` with `reference` on one trial.
///
/// `+1` if both decided the same non-neutral category, `-1` if both are neutral, `0`
/// otherwise. A neutral reference can therefore never score `+1`.
pub fn agreement(reference: &DecisionRecord, other: &DecisionRecord) -> i8 {
    match (reference.decision.is_neutral(), other.decision.is_neutral()) {
        (true, true) => -1,
        (false, false) if reference.decision == other.decision => 1,
        _ => 0,
    }
}

/// Net accuracy of every other model against `reference`.
///
/// Over the trials where both models decided a category, a match counts `+1` and a
/// mismatch `-1`; the sum is divided by the number of trials in the table, so neutral
/// answers pull a model toward zero.
pub fn accuracy(table: &ModelResultTable, reference: &str) -> Result<BTreeMap<String, f64>> {
    let truth = table.column(reference)?;
    let n = table.len().max(1) as f64;
    let mut out = BTreeMap::new();
    for model in table.models().iter().filter(|m| *m != reference) {
        let mut net = 0i64;
        for ((_, want), (_, got)) in truth.iter().zip(table.column(model)?) {
            if want.decision.is_neutral() || got.decision.is_neutral() {
                continue;
            }
            net += if want.decision == got.decision { 1 } else { -1 };
        }
        out.insert(model.clone(), net as f64 / n);
    }
    Ok(out)
}

/// Mean latency of `model` over the trials it decided; `None` if it never decided.
pub fn mean_rt(table: &ModelResultTable, model: &str) -> Result<Option<f64>> {
    let rts: Vec<usize> = table
        .column(model)?
        .into_iter()
        .filter_map(|(_, r)| r.latency)
        .collect();
    if rts.is_empty() {
        return Ok(None);
    }
    Ok(Some(rts.iter().sum::<usize>() as f64 / rts.len() as f64))
}

/// Mean of `rt(model) - rt(reference)` over the trials where both decided.
///
/// Models that never share a decided trial with the reference map to `None`.
pub fn reaction_time_difference(
    table: &ModelResultTable,
    reference: &str,
) -> Result<BTreeMap<String, Option<f64>>> {
    let truth = table.column(reference)?;
    let mut out = BTreeMap::new();
    for model in table.models().iter().filter(|m| *m != reference) {
        let diffs: Vec<f64> = truth
            .iter()
            .zip(table.column(model)?)
            .filter_map(|((_, want), (_, got))| match (want.latency, got.latency) {
                (Some(a), Some(b)) => Some(b as f64 - a as f64),
                _ => None,
            })
            .collect();
        let mean = (!diffs.is_empty()).then(|| diffs.iter().sum::<f64>() / diffs.len() as f64);
        out.insert(model.clone(), mean);
    }
    Ok(out)
}

/// How one model's answer on a trial differs from the other models'.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Divergence {
    /// Models that reached a different decision.
    pub decision: Vec<String>,
    /// Models with the same decision at a different latency.
    pub time: Vec<String>,
    /// Models that differ in both decision and latency.
    pub decision_and_time: Vec<String>,
}

impl Divergence {
    pub fn is_empty(&self) -> bool {
        self.decision.is_empty() && self.time.is_empty()
    }
}

/// Pairwise divergence for every trial and model.
pub fn divergence(table: &ModelResultTable) -> BTreeMap<Trial, BTreeMap<String, Divergence>> {
    let mut out = BTreeMap::new();
    for (trial, row) in table.iter() {
        let mut per_model = BTreeMap::new();
        for (name, r) in row {
            let mut d = Divergence::default();
            for (other, rc) in row.iter().filter(|(o, _)| *o != name) {
                let same_decision = r.decision == rc.decision;
                let same_time = r.latency == rc.latency;
                if !same_decision {
                    d.decision.push(other.clone());
                }
                if same_decision && !same_time {
                    d.time.push(other.clone());
                }
                if !same_decision && !same_time {
                    d.decision_and_time.push(other.clone());
                }
            }
            per_model.insert(name.clone(), d);
        }
        out.insert(trial.clone(), per_model);
    }
    out
}
