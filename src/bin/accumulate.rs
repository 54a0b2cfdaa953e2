#![forbid(unsafe_code)]

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use accumulate::{
    execute_plan, execute_run, write_trials, DeciderPolicy, RunConfig, RunPlan, RunSummary,
    SelectTrials, SymbolEncoding, Trial, TrialUniverse, ACCUMULATE_VERSION,
};

#[derive(Parser)]
#[command(
    name = "accumulate",
    version,
    about = "Sequential A/B categorization model simulations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the standard model set once and write <out>/<name>.csv and <name>_acc.csv
    Run {
        #[arg(long)]
        name: String,
        /// Trial length (even, 2..=62)
        #[arg(long, default_value_t = 8)]
        length: usize,
        /// Decision threshold in (0, 1)
        #[arg(long)]
        threshold: f64,
        /// Decider policy: abs or diff
        #[arg(long, default_value = "abs")]
        policy: DeciderPolicy,
        /// Use the curated select trials instead of the whole universe
        #[arg(long)]
        select: bool,
        #[arg(long, default_value = "run1")]
        out: PathBuf,
        /// Model the summary compares against
        #[arg(long, default_value = "abscount")]
        reference: String,
    },
    /// Run a batch of configurations in parallel workers
    Grid {
        /// JSON run plan; omit for the default l=8 threshold sweep
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write every trial of a length as tab-separated rows
    Trials {
        #[arg(long)]
        length: usize,
        /// Two comma-separated tokens replacing A and B
        #[arg(long, value_delimiter = ',')]
        encoding: Option<Vec<String>>,
        /// Only the curated select trials
        #[arg(long)]
        select: bool,
        #[arg(long)]
        out: PathBuf,
    },
}

fn print_summary(s: &RunSummary) {
    println!(
        "{}: {} trials x {} models -> {}, {}",
        s.name,
        s.trials,
        s.models.len(),
        s.table_path.display(),
        s.accuracy_path.display()
    );
    let ref_rt = s
        .reference_mean_rt
        .map(|rt| format!("{rt:.3}"))
        .unwrap_or_else(|| "-".to_string());
    println!("  reference {} (mean rt {ref_rt})", s.reference);
    for (model, acc) in &s.accuracy {
        let drt = s
            .rt_difference
            .get(model)
            .copied()
            .flatten()
            .map(|d| format!("{d:+.3}"))
            .unwrap_or_else(|| "-".to_string());
        println!("  {model:<32} acc {acc:+.3}  drt {drt}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            name,
            length,
            threshold,
            policy,
            select,
            out,
            reference,
        } => {
            let config = RunConfig {
                name,
                length,
                threshold,
                policy,
                reference,
                models: None,
            };
            let summary = execute_run(&config, &out, select)?;
            print_summary(&summary);
        }
        Commands::Grid { config } => {
            let plan = match config {
                Some(path) => RunPlan::load(&path)?,
                None => RunPlan::default(),
            };
            println!(
                "accumulate {ACCUMULATE_VERSION}: {} runs -> {}",
                plan.runs.len(),
                plan.out_dir.display()
            );
            let mut failed = 0usize;
            for (name, result) in execute_plan(&plan)? {
                match result {
                    Ok(summary) => print_summary(&summary),
                    Err(err) => {
                        failed += 1;
                        eprintln!("{name}: {err}");
                    }
                }
            }
            if failed > 0 {
                return Err(format!("{failed} of {} runs failed", plan.runs.len()).into());
            }
        }
        Commands::Trials {
            length,
            encoding,
            select,
            out,
        } => {
            let encoding = encoding
                .map(|tokens| SymbolEncoding::from_tokens(tokens.as_slice()))
                .transpose()?;
            let trials: Vec<Trial> = if select {
                SelectTrials::new(length)?.trials().to_vec()
            } else {
                TrialUniverse::new(length)?.iter_all().collect()
            };
            let mut file = BufWriter::new(File::create(&out)?);
            write_trials(&mut file, &trials, encoding.as_ref())?;
            println!("wrote {} trials to {}", trials.len(), out.display());
        }
    }
    Ok(())
}
