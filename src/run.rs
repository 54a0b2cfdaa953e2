//! Batch execution: run a [`RunConfig`], write its two CSV tables, summarize.
//!
//! Output files are written only after the categorization and both renderings have
//! succeeded, so a failed run leaves nothing behind. Both tables go to `.tmp` siblings
//! first and are renamed into place; a failure while writing removes whatever was staged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::export::write_table;
use crate::stats::{accuracy, mean_rt, reaction_time_difference};
use crate::{
    categorize_source, Error, ModelResultTable, Result, RunConfig, RunPlan, SelectTrials,
    TrialUniverse,
};

/// What one run produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub name: String,
    pub trials: usize,
    pub models: Vec<String>,
    pub reference: String,
    /// Mean latency of the reference model over the trials it decided.
    pub reference_mean_rt: Option<f64>,
    /// Net accuracy of every other model against the reference.
    pub accuracy: BTreeMap<String, f64>,
    /// Mean latency difference (model minus reference) over jointly decided trials.
    pub rt_difference: BTreeMap<String, Option<f64>>,
    pub table_path: PathBuf,
    pub accuracy_path: PathBuf,
}

/// Categorize one run's trials without touching the filesystem.
pub fn run_table(config: &RunConfig, select: bool) -> Result<ModelResultTable> {
    config.validate_name()?;
    let request = config.request();
    if select {
        categorize_source(&request, &SelectTrials::new(config.length)?)
    } else {
        categorize_source(&request, &TrialUniverse::new(config.length)?)
    }
}

/// Run `config` and write `<out_dir>/<name>.csv` and `<out_dir>/<name>_acc.csv`.
pub fn execute_run(config: &RunConfig, out_dir: &Path, select: bool) -> Result<RunSummary> {
    let table = run_table(config, select)?;
    if !table.models().iter().any(|m| *m == config.reference) {
        return Err(Error::UnknownModel(config.reference.clone()));
    }
    let accuracy = accuracy(&table, &config.reference)?;
    let rt_difference = reaction_time_difference(&table, &config.reference)?;
    let reference_mean_rt = mean_rt(&table, &config.reference)?;

    let mut plain = Vec::new();
    write_table(&mut plain, &table, false)?;
    let mut with_acc = Vec::new();
    write_table(&mut with_acc, &table, true)?;

    std::fs::create_dir_all(out_dir)?;
    let table_path = out_dir.join(format!("{}.csv", config.name));
    let accuracy_path = out_dir.join(format!("{}_acc.csv", config.name));
    write_outputs(&[
        (table_path.as_path(), plain.as_slice()),
        (accuracy_path.as_path(), with_acc.as_slice()),
    ])?;

    tracing::info!(
        run = %config.name,
        models = ?table.models(),
        trials = table.len(),
        table = %table_path.display(),
        accuracy = %accuracy_path.display(),
        "run written"
    );

    Ok(RunSummary {
        name: config.name.clone(),
        trials: table.len(),
        models: table.models().to_vec(),
        reference: config.reference.clone(),
        reference_mean_rt,
        accuracy,
        rt_difference,
        table_path,
        accuracy_path,
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

fn remove_quietly(path: &Path) {
    if let Err(err) = std::fs::remove_file(path) {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), %err, "could not remove partial output");
        }
    }
}

/// Stage every file, then rename each into place. All or nothing.
fn write_outputs(files: &[(&Path, &[u8])]) -> Result<()> {
    let staged: Vec<PathBuf> = files.iter().map(|(p, _)| staging_path(p)).collect();
    let cleanup = |renamed: usize| {
        for (path, _) in &files[..renamed] {
            remove_quietly(path);
        }
        for tmp in &staged[renamed..] {
            remove_quietly(tmp);
        }
    };
    for ((_, bytes), tmp) in files.iter().zip(&staged) {
        if let Err(err) = std::fs::write(tmp, bytes) {
            cleanup(0);
            return Err(err.into());
        }
    }
    for (ii, ((path, _), tmp)) in files.iter().zip(&staged).enumerate() {
        if let Err(err) = std::fs::rename(tmp, path) {
            cleanup(ii);
            return Err(err.into());
        }
    }
    Ok(())
}

/// Run every config in `plan`, each on its own scoped thread.
///
/// The plan is validated first: a bad or repeated run name fails the whole plan before any
/// worker starts. After that, results come back in plan order and one run failing does not
/// stop the others.
pub fn execute_plan(plan: &RunPlan) -> Result<Vec<(String, Result<RunSummary>)>> {
    plan.validate()?;
    let out_dir = plan.out_dir.as_path();
    Ok(std::thread::scope(|s| {
        let handles: Vec<_> = plan
            .runs
            .iter()
            .map(|config| {
                let h = s.spawn(move || execute_run(config, out_dir, plan.select));
                (config.name.clone(), h)
            })
            .collect();
        handles
            .into_iter()
            .map(|(name, h)| {
                let result = h
                    .join()
                    .unwrap_or(Err(Error::Invariant("run worker panicked")));
                (name, result)
            })
            .collect()
    }))
}
