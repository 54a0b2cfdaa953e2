//! Flat-file export: trial-level CSV tables and TSV trial lists.

use std::io::Write;

use crate::stats::agreement;
use crate::{ModelResultTable, Result, SymbolEncoding, Trial};

/// Columns of the plain result table.
pub const TABLE_HEADER: &str = "trial,model,decision,score,altscore,rt,distance,countA,countB";

/// Extra columns appended when accuracy rows are requested.
pub const ACCURACY_COLUMNS: &str = "correct_model,acc";

/// Write one CSV row per (trial, model), in trial order then request order.
///
/// With `with_accuracy`, each row's model acts as the reference and the row is repeated
/// once per other model, with that model's name and its [`agreement`] score appended.
/// Absent scores and latencies are empty cells.
pub fn write_table<W: Write>(
    out: &mut W,
    table: &ModelResultTable,
    with_accuracy: bool,
) -> Result<()> {
    if with_accuracy {
        writeln!(out, "{TABLE_HEADER},{ACCURACY_COLUMNS}")?;
    } else {
        writeln!(out, "{TABLE_HEADER}")?;
    }
    for (trial, row) in table.iter() {
        let distance = trial.hamming_to_ambiguous();
        let (c_a, c_b) = trial.counts();
        for model in table.models() {
            let Some(r) = row.get(model) else {
                continue;
            };
            let prefix = format!(
                "{},{},{},{},{},{},{},{},{}",
                trial,
                model,
                r.decision,
                cell(r.chosen_score),
                cell(r.unchosen_score),
                cell(r.latency),
                distance,
                c_a,
                c_b,
            );
            if !with_accuracy {
                writeln!(out, "{prefix}")?;
                continue;
            }
            for other in table.models().iter().filter(|m| *m != model) {
                if let Some(o) = row.get(other) {
                    writeln!(out, "{prefix},{other},{}", agreement(r, o))?;
                }
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Write one tab-separated row per trial, re-encoding symbols when `encoding` is given.
pub fn write_trials<'a, W, I>(out: &mut W, trials: I, encoding: Option<&SymbolEncoding>) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Trial>,
{
    let default = SymbolEncoding::default();
    let enc = encoding.unwrap_or(&default);
    for trial in trials {
        let tokens: Vec<&str> = trial.iter().map(|s| enc.encode(s)).collect();
        writeln!(out, "{}", tokens.join("\t"))?;
    }
    out.flush()?;
    Ok(())
}

fn cell<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}
