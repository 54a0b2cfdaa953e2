//! Exemplar baselines: answer with the first or the last symbol seen.
//!
//! Neither consults the decider, so threshold and policy have no effect.

use crate::{Category, DecisionRecord, Trial};

pub fn first_exemplar(trial: &Trial) -> DecisionRecord {
    DecisionRecord::decided(Category::from(trial.first()), 1.0, 0.0, 1)
}

pub fn last_exemplar(trial: &Trial) -> DecisionRecord {
    DecisionRecord::decided(Category::from(trial.last()), 1.0, 0.0, trial.len())
}
