//! The categorization engine: every model against every trial of a source.
//!
//! The request is validated in full before any model runs. Models are run one at a time,
//! each over a fresh cursor, and the first model error aborts the request without
//! returning a partial table.

use std::collections::{BTreeMap, BTreeSet};

use crate::trial::validate_trial_len;
use crate::{
    standard_specs, DeciderPolicy, DecisionRecord, Error, Model, ModelSpec, Result, Threshold,
    Trial, TrialSource, TrialUniverse,
};

/// What to run: a model set, a shared threshold and policy, and the trial length.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategorizationRequest {
    pub models: Vec<ModelSpec>,
    pub threshold: f64,
    pub trial_length: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub policy: DeciderPolicy,
}

impl Default for CategorizationRequest {
    fn default() -> Self {
        Self {
            models: standard_specs(),
            threshold: 0.5,
            trial_length: 8,
            policy: DeciderPolicy::Absolute,
        }
    }
}

/// Trial -> (model name -> decision), plus the model names in request order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelResultTable {
    trial_len: usize,
    threshold: Threshold,
    policy: DeciderPolicy,
    models: Vec<String>,
    rows: BTreeMap<Trial, BTreeMap<String, DecisionRecord>>,
}

impl ModelResultTable {
    fn new(trial_len: usize, threshold: Threshold, policy: DeciderPolicy) -> Self {
        Self {
            trial_len,
            threshold,
            policy,
            models: Vec::new(),
            rows: BTreeMap::new(),
        }
    }

    pub fn trial_len(&self) -> usize {
        self.trial_len
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn policy(&self) -> DeciderPolicy {
        self.policy
    }

    /// Model names, in request order.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Number of trials in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Trials in enumeration order.
    pub fn trials(&self) -> impl Iterator<Item = &Trial> {
        self.rows.keys()
    }

    pub fn row(&self, trial: &Trial) -> Option<&BTreeMap<String, DecisionRecord>> {
        self.rows.get(trial)
    }

    pub fn get(&self, trial: &Trial, model: &str) -> Option<&DecisionRecord> {
        self.rows.get(trial)?.get(model)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Trial, &BTreeMap<String, DecisionRecord>)> {
        self.rows.iter()
    }

    /// Every trial's record for one model, in trial order.
    pub fn column(&self, model: &str) -> Result<Vec<(&Trial, &DecisionRecord)>> {
        if !self.models.iter().any(|m| m == model) {
            return Err(Error::UnknownModel(model.to_string()));
        }
        self.rows
            .iter()
            .map(|(t, row)| {
                row.get(model)
                    .map(|r| (t, r))
                    .ok_or(Error::Invariant("model missing from a table row"))
            })
            .collect()
    }

    fn insert_column(&mut self, model: &str, records: Vec<(Trial, DecisionRecord)>) {
        self.models.push(model.to_string());
        for (trial, record) in records {
            self.rows
                .entry(trial)
                .or_default()
                .insert(model.to_string(), record);
        }
    }
}

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Validated, nothing run yet.
    Init,
    /// Models `0..next_model` have been run over the whole source.
    Iterating { next_model: usize },
    /// Every model has run; the table is complete.
    Done,
}

/// A validated request bound to a trial source.
#[derive(Debug)]
pub struct Engine<'s, S: TrialSource + ?Sized> {
    source: &'s S,
    models: Vec<Model>,
    state: EngineState,
    table: ModelResultTable,
}

impl<'s, S: TrialSource + ?Sized> Engine<'s, S> {
    /// Validate `request` against `source` and build every model.
    pub fn new(request: &CategorizationRequest, source: &'s S) -> Result<Self> {
        let threshold = Threshold::new(request.threshold)?;
        let l = validate_trial_len(request.trial_length)?;
        if source.trial_len() != l {
            return Err(Error::TrialLengthMismatch {
                expected: l,
                got: source.trial_len(),
            });
        }
        let mut seen = BTreeSet::new();
        for spec in &request.models {
            if !seen.insert(spec.name.as_str()) {
                return Err(Error::DuplicateModel(spec.name.clone()));
            }
        }
        let models = request
            .models
            .iter()
            .map(|s| s.build(threshold, request.policy))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            source,
            models,
            state: EngineState::Init,
            table: ModelResultTable::new(l, threshold, request.policy),
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Run the next model over the whole source. Returns `false` once there is nothing left.
    pub fn step(&mut self) -> Result<bool> {
        let next = match self.state {
            EngineState::Init => 0,
            EngineState::Iterating { next_model } => next_model,
            EngineState::Done => return Ok(false),
        };
        let Some(model) = self.models.get(next) else {
            self.state = EngineState::Done;
            return Ok(false);
        };
        tracing::debug!(
            model = %model.name(),
            trials = self.source.count(),
            "categorizing"
        );
        let records = evaluate_all(model, self.source)?;
        self.table.insert_column(model.name(), records);
        self.state = if next + 1 == self.models.len() {
            EngineState::Done
        } else {
            EngineState::Iterating {
                next_model: next + 1,
            }
        };
        Ok(true)
    }

    /// Run every remaining model and hand back the table.
    pub fn run(mut self) -> Result<ModelResultTable> {
        while self.step()? {}
        self.state = EngineState::Done;
        tracing::info!(
            models = self.table.models().len(),
            trials = self.table.len(),
            trial_len = self.table.trial_len(),
            policy = %self.table.policy(),
            "categorization complete"
        );
        Ok(self.table)
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all<S: TrialSource + ?Sized>(
    model: &Model,
    source: &S,
) -> Result<Vec<(Trial, DecisionRecord)>> {
    source
        .cursor()
        .map(|trial| {
            let record = model.evaluate(&trial)?;
            Ok((trial, record))
        })
        .collect()
}

/// One contiguous shard per rayon worker; shards are concatenated in index order.
#[cfg(feature = "parallel")]
fn evaluate_all<S: TrialSource + ?Sized>(
    model: &Model,
    source: &S,
) -> Result<Vec<(Trial, DecisionRecord)>> {
    use rayon::prelude::*;

    let count = source.count();
    let chunk = count.div_ceil(rayon::current_num_threads().max(1)).max(1);
    let starts: Vec<usize> = (0..count).step_by(chunk).collect();
    let shards = starts
        .into_par_iter()
        .map(|start| {
            source
                .shard(start..start + chunk)
                .map(|trial| {
                    let record = model.evaluate(&trial)?;
                    Ok((trial, record))
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(shards.into_iter().flatten().collect())
}

/// Categorize the exhaustive universe for `request.trial_length`.
///
/// ```rust
/// use accumulate::{categorize, CategorizationRequest, Category, ModelFamily, ModelSpec};
///
/// let request = CategorizationRequest {
///     models: vec![ModelSpec::from(ModelFamily::AbsoluteCount)],
///     threshold: 0.5,
///     trial_length: 4,
///     ..Default::default()
/// };
/// let table = categorize(&request).unwrap();
/// assert_eq!(table.len(), 8);
/// let r = table.get(&"AABB".parse().unwrap(), "abscount").unwrap();
/// assert_eq!(r.decision, Category::A);
/// assert_eq!(r.latency, Some(2));
/// ```
pub fn categorize(request: &CategorizationRequest) -> Result<ModelResultTable> {
    let universe = TrialUniverse::new(request.trial_length)?;
    categorize_source(request, &universe)
}

/// Categorize any trial source whose length matches the request.
pub fn categorize_source<S: TrialSource + ?Sized>(
    request: &CategorizationRequest,
    source: &S,
) -> Result<ModelResultTable> {
    Engine::new(request, source)?.run()
}
