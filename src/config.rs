//! Batch run configuration.
//!
//! A [`RunPlan`] is a list of [`RunConfig`]s sharing an output directory. With the `cli`
//! feature a plan can be read from JSON; omitted fields take their `Default` values.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::{standard_specs, CategorizationRequest, DeciderPolicy, Error, ModelSpec, Result};

/// One categorization run and the name its output files are written under.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Output stem: the run writes `<name>.csv` and `<name>_acc.csv`.
    pub name: String,
    pub length: usize,
    pub threshold: f64,
    pub policy: DeciderPolicy,
    /// Model the summary compares every other model against.
    pub reference: String,
    /// Models to run; `None` means [`standard_specs`].
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub models: Option<Vec<ModelSpec>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            name: "l8_051_abs".to_string(),
            length: 8,
            threshold: 0.51,
            policy: DeciderPolicy::Absolute,
            reference: "abscount".to_string(),
            models: None,
        }
    }
}

impl RunConfig {
    /// A run named after its parameters, e.g. `l8_065_abs`.
    pub fn named(length: usize, threshold: f64, policy: DeciderPolicy) -> Self {
        let hundredths = (threshold * 100.0).round() as i64;
        Self {
            name: format!("l{length}_{hundredths:03}_{policy}"),
            length,
            threshold,
            policy,
            ..Self::default()
        }
    }

    /// Run names end up as file names: no separators, no `..`, not empty.
    pub fn validate_name(&self) -> Result<()> {
        let n = self.name.as_str();
        if n.is_empty() || n == "." || n == ".." || n.contains(['/', '\\']) {
            return Err(Error::InvalidRunName(self.name.clone()));
        }
        Ok(())
    }

    pub fn request(&self) -> CategorizationRequest {
        CategorizationRequest {
            models: self.models.clone().unwrap_or_else(standard_specs),
            threshold: self.threshold,
            trial_length: self.length,
            policy: self.policy,
        }
    }
}

/// A batch of runs written into one directory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunPlan {
    pub out_dir: PathBuf,
    /// Use the curated select trials instead of the exhaustive universe.
    pub select: bool,
    pub runs: Vec<RunConfig>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("run1"),
            select: true,
            runs: [0.51, 0.65, 0.90]
                .into_iter()
                .map(|t| RunConfig::named(8, t, DeciderPolicy::Absolute))
                .collect(),
        }
    }
}

impl RunPlan {
    /// Every run name must be usable as a file stem and distinct within the plan, since
    /// runs share `out_dir`.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for run in &self.runs {
            run.validate_name()?;
            if !seen.insert(run.name.as_str()) {
                return Err(Error::DuplicateRun(run.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl RunPlan {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_mirrors_the_batch_grid() {
        let plan = RunPlan::default();
        let names: Vec<&str> = plan.runs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["l8_051_abs", "l8_065_abs", "l8_090_abs"]);
        assert!(plan.select);
    }

    #[test]
    fn run_names_are_checked() {
        let mut r = RunConfig::default();
        assert!(r.validate_name().is_ok());
        for bad in ["", "..", "a/b", "a\\b"] {
            r.name = bad.to_string();
            assert!(matches!(r.validate_name(), Err(Error::InvalidRunName(_))), "{bad}");
        }
    }

    #[test]
    fn plan_rejects_shared_output_stems() {
        assert!(RunPlan::default().validate().is_ok());
        let mut plan = RunPlan::default();
        plan.runs.push(RunConfig::named(8, 0.65, DeciderPolicy::Absolute));
        let err = plan.validate().unwrap_err();
        assert!(matches!(&err, Error::DuplicateRun(n) if n == "l8_065_abs"));
        assert!(err.is_configuration());

        plan.runs.pop();
        plan.runs[1].name = "a/b".to_string();
        assert!(matches!(plan.validate(), Err(Error::InvalidRunName(_))));
    }

    #[test]
    fn request_defaults_to_standard_models() {
        let req = RunConfig::default().request();
        assert_eq!(req.models, standard_specs());
        assert_eq!(req.trial_length, 8);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn plan_parses_from_json_with_defaults() {
        let plan = RunPlan::from_json(
            r#"{
                "out_dir": "out",
                "runs": [
                    {"name": "quick", "length": 4, "threshold": 0.7, "policy": "difference",
                     "models": [{"name": "c", "family": "absolute_count"},
                                {"name": "lba", "family": "incremental_lba", "k": 0.0, "d": 0.25}]}
                ]
            }"#,
        )
        .unwrap();
        assert!(plan.select);
        let run = &plan.runs[0];
        assert_eq!(run.policy, DeciderPolicy::Difference);
        assert_eq!(run.reference, "abscount");
        let models = run.models.as_ref().unwrap();
        assert_eq!(models[1].family, crate::ModelFamily::IncrementalLba { k: 0.0, d: 0.25 });

        assert!(RunPlan::from_json(r#"{"runs": [{"threshold": "high"}]}"#).is_err());
    }
}
