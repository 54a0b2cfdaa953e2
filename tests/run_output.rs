use accumulate::export::{ACCURACY_COLUMNS, TABLE_HEADER};
use accumulate::{
    execute_plan, execute_run, write_trials, DeciderPolicy, Error, ModelFamily, ModelSpec,
    RunConfig, RunPlan, SymbolEncoding, TrialUniverse,
};

fn config(name: &str) -> RunConfig {
    RunConfig {
        name: name.to_string(),
        length: 4,
        threshold: 0.51,
        policy: DeciderPolicy::Absolute,
        reference: "abscount".to_string(),
        models: Some(vec![
            ModelSpec::from(ModelFamily::AbsoluteCount),
            ModelSpec::from(ModelFamily::FirstExemplar),
            ModelSpec::from(ModelFamily::LastExemplar),
        ]),
    }
}

#[test]
fn run_writes_plain_and_accuracy_tables() {
    let dir = tempfile::tempdir().unwrap();
    let summary = execute_run(&config("l4"), dir.path(), false).unwrap();
    assert_eq!(summary.trials, 8);
    assert_eq!(summary.models, ["abscount", "first", "last"]);
    assert_eq!(summary.accuracy.len(), 2);

    let plain = std::fs::read_to_string(dir.path().join("l4.csv")).unwrap();
    let lines: Vec<&str> = plain.lines().collect();
    assert_eq!(lines[0], TABLE_HEADER);
    assert_eq!(lines.len(), 1 + 8 * 3);
    assert!(lines.iter().skip(1).all(|l| l.split(',').count() == 9));
    assert!(lines.contains(&"AAAA,first,A,1,0,1,2,4,0"));

    let acc = std::fs::read_to_string(dir.path().join("l4_acc.csv")).unwrap();
    let lines: Vec<&str> = acc.lines().collect();
    assert_eq!(lines[0], format!("{TABLE_HEADER},{ACCURACY_COLUMNS}"));
    assert_eq!(lines.len(), 1 + 8 * 3 * 2);
    assert!(lines.iter().skip(1).all(|l| l.split(',').count() == 11));
}

#[test]
fn summary_compares_against_the_reference() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config("ref_first");
    cfg.reference = "first".to_string();
    let s = execute_run(&cfg, dir.path(), false).unwrap();
    assert_eq!(s.reference_mean_rt, Some(1.0));
    assert_eq!(s.rt_difference["last"], Some(3.0));
    assert!(!s.accuracy.contains_key("first"));
}

#[test]
fn failed_runs_leave_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config("bad");
    cfg.threshold = 1.0;
    let err = execute_run(&cfg, dir.path(), false).unwrap_err();
    assert!(matches!(err, Error::InvalidThreshold(_)));
    assert!(!dir.path().join("bad.csv").exists());
    assert!(!dir.path().join("bad_acc.csv").exists());

    let mut cfg = config("../escape");
    cfg.threshold = 0.5;
    assert!(matches!(
        execute_run(&cfg, dir.path(), false),
        Err(Error::InvalidRunName(_))
    ));
}

#[test]
fn plan_keeps_going_past_a_failed_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut bad = config("bad");
    bad.length = 5;
    let plan = RunPlan {
        out_dir: dir.path().join("grid"),
        select: true,
        runs: vec![config("good"), bad],
    };
    let results = execute_plan(&plan).unwrap();
    assert!(results[0].1.is_ok());
    assert!(matches!(
        results[1].1,
        Err(Error::InvalidTrialLength { got: 5, .. })
    ));
    assert!(dir.path().join("grid").join("good.csv").exists());
}

#[test]
fn plan_with_a_repeated_run_name_starts_no_workers() {
    let dir = tempfile::tempdir().unwrap();
    let plan = RunPlan {
        out_dir: dir.path().join("grid"),
        select: true,
        runs: vec![config("twice"), config("twice")],
    };
    let err = execute_plan(&plan).unwrap_err();
    assert!(matches!(&err, Error::DuplicateRun(n) if n == "twice"));
    assert!(err.is_configuration());
    assert!(!dir.path().join("grid").exists());
}

#[test]
fn trial_list_export_reencodes_the_whole_universe() {
    let u = TrialUniverse::new(2).unwrap();
    let trials: Vec<_> = u.iter_all().collect();
    let enc = SymbolEncoding::from_tokens(&["x", "y"]).unwrap();
    let mut buf = Vec::new();
    write_trials(&mut buf, &trials, Some(&enc)).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "x\tx\nx\ty\ny\tx\ny\ty\n");

    assert!(SymbolEncoding::from_tokens(&["x"]).is_err());
    assert!(SymbolEncoding::from_tokens(&["x", "x"]).is_err());
    assert!(SymbolEncoding::from_tokens(&["x", "y", "z"]).is_err());
}
