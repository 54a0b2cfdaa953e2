//! Model families, request-side model specs, and the built [`Model`] that the engine runs.
//!
//! Families are a closed enum: adding one means adding a variant, a default name and an
//! `evaluate` arm. Names are data on [`ModelSpec`] and key the result table.

use crate::{
    absolute_count, blca, first_exemplar, incremental_lba, information, last_exemplar,
    likelihood_ratio, naive_probability, relative_count, urgency_gating, DeciderPolicy,
    DecisionRecord, Error, Result, Threshold, Trial,
};

/// One decision-model family and its hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "family", rename_all = "snake_case"))]
pub enum ModelFamily {
    AbsoluteCount,
    RelativeCount,
    NaiveProbability,
    Information,
    LikelihoodRatio,
    /// Start point `k`, drift `d` per matching exemplar.
    IncrementalLba { k: f64, d: f64 },
    /// Input weight `wi`, leak, and mutual inhibition `beta`.
    Blca { wi: f64, leak: f64, beta: f64 },
    UrgencyGating { gain: f64 },
    FirstExemplar,
    LastExemplar,
}

impl ModelFamily {
    /// Canonical result-table name, with hyperparameters spelled out where present.
    pub fn default_name(&self) -> String {
        match *self {
            ModelFamily::AbsoluteCount => "abscount".to_string(),
            ModelFamily::RelativeCount => "relcount".to_string(),
            ModelFamily::NaiveProbability => "naive".to_string(),
            ModelFamily::Information => "information".to_string(),
            ModelFamily::LikelihoodRatio => "likelihood_ratio".to_string(),
            ModelFamily::IncrementalLba { k, d } => format!("lba_k{k}_d{d}"),
            ModelFamily::Blca { wi, leak, beta } => {
                format!("blca_wi{wi}_leak{leak}_beta{beta}")
            }
            ModelFamily::UrgencyGating { gain } => format!("urgency_gating_g{gain}"),
            ModelFamily::FirstExemplar => "first".to_string(),
            ModelFamily::LastExemplar => "last".to_string(),
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        let bad = |reason: &'static str| {
            Err(Error::InvalidParameter {
                model: name.to_string(),
                reason,
            })
        };
        match *self {
            ModelFamily::IncrementalLba { k, d } => {
                if !k.is_finite() || !d.is_finite() {
                    return bad("start point and drift must be finite");
                }
                if d < 0.0 {
                    return bad("drift must be non-negative");
                }
            }
            ModelFamily::Blca { wi, leak, beta } => {
                if !wi.is_finite() || !leak.is_finite() || !beta.is_finite() {
                    return bad("input weight, leak and inhibition must be finite");
                }
                if wi < 0.0 || leak < 0.0 || beta < 0.0 {
                    return bad("input weight, leak and inhibition must be non-negative");
                }
            }
            ModelFamily::UrgencyGating { gain } => {
                if !(gain.is_finite() && gain > 0.0) {
                    return bad("gain must be finite and positive");
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// A named model, as it appears in a categorization request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub family: ModelFamily,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, family: ModelFamily) -> Self {
        Self {
            name: name.into(),
            family,
        }
    }

    /// Bind the spec to a threshold and policy, validating the name and hyperparameters.
    ///
    /// Names are written unquoted into CSV cells, so they may not be empty or contain
    /// commas, double quotes or line breaks.
    pub fn build(&self, threshold: Threshold, policy: DeciderPolicy) -> Result<Model> {
        if self.name.is_empty() || self.name.contains([',', '"', '\n', '\r']) {
            return Err(Error::InvalidParameter {
                model: self.name.clone(),
                reason: "model names must be non-empty and free of commas, quotes and line breaks",
            });
        }
        self.family.validate(&self.name)?;
        Ok(Model {
            name: self.name.clone(),
            family: self.family,
            threshold,
            policy,
        })
    }
}

impl From<ModelFamily> for ModelSpec {
    fn from(family: ModelFamily) -> Self {
        Self::new(family.default_name(), family)
    }
}

/// A ready-to-run model.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    family: ModelFamily,
    threshold: Threshold,
    policy: DeciderPolicy,
}

impl Model {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    pub fn policy(&self) -> DeciderPolicy {
        self.policy
    }

    /// Run the model over one trial.
    ///
    /// Accumulator state lives only for the duration of this call.
    pub fn evaluate(&self, trial: &Trial) -> Result<DecisionRecord> {
        let (th, pol) = (self.threshold, self.policy);
        match self.family {
            ModelFamily::AbsoluteCount => absolute_count(trial, th, pol),
            ModelFamily::RelativeCount => relative_count(trial, th, pol),
            ModelFamily::NaiveProbability => naive_probability(trial, th, pol),
            ModelFamily::Information => information(trial, th, pol),
            ModelFamily::LikelihoodRatio => likelihood_ratio(trial, th),
            ModelFamily::IncrementalLba { k, d } => incremental_lba(trial, th, pol, k, d),
            ModelFamily::Blca { wi, leak, beta } => blca(trial, th, pol, wi, leak, beta),
            ModelFamily::UrgencyGating { gain } => urgency_gating(trial, th, pol, gain),
            ModelFamily::FirstExemplar => Ok(first_exemplar(trial)),
            ModelFamily::LastExemplar => Ok(last_exemplar(trial)),
        }
    }
}

/// The standard batch model set.
///
/// ```rust
/// let specs = accumulate::standard_specs();
/// assert!(specs.iter().any(|s| s.name == "abscount"));
/// assert_eq!(specs.len(), 21);
/// ```
pub fn standard_specs() -> Vec<ModelSpec> {
    let mut families = vec![
        ModelFamily::Information,
        ModelFamily::LikelihoodRatio,
        ModelFamily::AbsoluteCount,
        ModelFamily::RelativeCount,
        ModelFamily::NaiveProbability,
        ModelFamily::UrgencyGating { gain: 0.4 },
    ];
    for d in [0.06, 0.125, 0.25, 0.5] {
        families.push(ModelFamily::IncrementalLba { k: 0.0, d });
    }
    for wi in [0.06, 0.125, 0.25] {
        for (leak, beta) in [(0.2, 0.1), (0.2, 0.0), (0.0, 0.1)] {
            families.push(ModelFamily::Blca { wi, leak, beta });
        }
    }
    families.push(ModelFamily::FirstExemplar);
    families.push(ModelFamily::LastExemplar);
    families.into_iter().map(ModelSpec::from).collect()
}
