//! E2E: configuration files on disk drive a full step, and malformed
//! experiments are rejected before anything is aggregated.

use evo_evaluation::{
    AnswerCodeTable, CombinationRecord, Direction, EvaluationError, EvoStep, RecordingRenderer,
};
use evo_factor::{integer, ratio, ExperimentConfig, FactorError};
use std::path::Path;

const TOML: &str = r#"
[parameters.range]
conv = ["1/3", 1]
eps = [0.5, 1.5]
neu = [0, 1]

[parameters.level]
conv = 3
eps = 2
neu = 2
prop = 1

[indexed]
conv = 3
"#;

const YAML: &str = "
parameters:
  range:
    conv: ['1/3', 1]
    eps: [0.5, 1.5]
  level:
    conv: 3
    eps: 2
    prop: 1
indexed:
  conv: 3
";

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn records_for(step: &EvoStep) -> Vec<CombinationRecord> {
    let conv = step.factors().get("conv").unwrap();
    let eps = step.factors().get("eps").unwrap();
    let mut records = Vec::new();
    for c in conv.levels() {
        for e in eps.levels() {
            records.push(
                CombinationRecord::new(0)
                    .assign("conv", c.clone())
                    .assign("eps", e.clone())
                    .with_result("nnenum", "sat")
                    .with_result("eran", "memout"),
            );
        }
    }
    records
}

#[test]
fn toml_and_yaml_build_the_same_step() {
    let dir = tempfile::tempdir().unwrap();
    let from_toml = ExperimentConfig::load(write(dir.path(), "evo.toml", TOML)).unwrap();
    let from_yaml = ExperimentConfig::load(write(dir.path(), "evo.yml", YAML)).unwrap();

    let a = EvoStep::new(&from_toml, &["conv", "eps"], Direction::Down, 2).unwrap();
    let b = EvoStep::new(&from_yaml, &["conv", "eps"], Direction::Down, 2).unwrap();
    assert_eq!(a.factors(), b.factors());
    assert_eq!(a.factors().shape(), vec![3, 2]);
    assert_eq!(
        a.factors().get("conv").unwrap().levels(),
        &[ratio(1, 3).unwrap(), ratio(2, 3).unwrap(), integer(1)]
    );
    assert_eq!(
        a.factors().get("eps").unwrap().levels(),
        &[ratio(1, 2).unwrap(), ratio(3, 2).unwrap()]
    );
}

#[test]
fn step_from_file_plots_first_source() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExperimentConfig::load(write(dir.path(), "evo.toml", TOML)).unwrap();
    let mut step = EvoStep::new(&config, &["conv", "eps"], Direction::Down, 2).unwrap();

    let renderer = RecordingRenderer::new();
    assert!(matches!(
        step.plot(&renderer, dir.path()),
        Err(EvaluationError::NotEvaluated)
    ));

    let records = records_for(&step);
    let eval = step.evaluate(&records, &AnswerCodeTable::standard()).unwrap();
    assert_eq!(eval.total_solved("nnenum"), Some(6));
    assert_eq!(eval.total_solved("eran"), Some(0));

    let path = step.plot(&renderer, dir.path()).unwrap();
    assert_eq!(path, dir.path().join("figures").join("2_down.png"));

    let plots = renderer.plots();
    assert_eq!(plots.len(), 1);
    // Sources are ordered by name, so "eran" comes first.
    assert_eq!(plots[0].source, "eran");
    assert_eq!(plots[0].x_label, "conv");
    assert_eq!(plots[0].x_ticks, vec!["0.3333", "0.6667", "1.0000"]);
    assert_eq!(plots[0].y_ticks, vec!["0.5000", "1.5000"]);
}

#[test]
fn three_factors_cannot_be_plotted() {
    let config = ExperimentConfig::from_toml_str(TOML).unwrap();
    let mut step = EvoStep::new(&config, &["conv", "eps", "neu"], Direction::Both, 0).unwrap();

    let mut records = Vec::new();
    for r in records_for(&step) {
        for n in [0, 1] {
            records.push(r.clone().assign("neu", integer(n)));
        }
    }
    step.evaluate(&records, &AnswerCodeTable::standard()).unwrap();

    let err = step.plot(&RecordingRenderer::new(), Path::new("bench")).unwrap_err();
    assert!(matches!(
        err,
        EvaluationError::UnsupportedDimensionality { expected: 2, actual: 3 }
    ));
}

#[test]
fn malformed_experiments_are_rejected() {
    let zero_levels = TOML.replace("eps = 2", "eps = 0");
    let config = ExperimentConfig::from_toml_str(&zero_levels).unwrap();
    let err = EvoStep::new(&config, &["eps"], Direction::Both, 0).unwrap_err();
    assert!(matches!(
        err,
        EvaluationError::Factor(FactorError::InvalidConfiguration(_))
    ));

    let config = ExperimentConfig::from_toml_str(TOML).unwrap();
    assert!(matches!(
        EvoStep::new(&config, &["missing"], Direction::Both, 0),
        Err(EvaluationError::Factor(FactorError::InvalidConfiguration(_)))
    ));

    let no_prop = TOML.replace("prop = 1", "");
    let config = ExperimentConfig::from_toml_str(&no_prop).unwrap();
    assert!(EvoStep::new(&config, &["eps"], Direction::Both, 0).is_err());

    let json = r#"{"parameters": {"range": {"eps": [0, "1/4"]}, "level": {"eps": 2, "prop": 1}}}"#;
    let dir = tempfile::tempdir().unwrap();
    let config = ExperimentConfig::load(write(dir.path(), "evo.json", json)).unwrap();
    let step = EvoStep::new(&config, &["eps"], Direction::Both, 0).unwrap();
    assert_eq!(step.factors().get("eps").unwrap().step(), &ratio(1, 4).unwrap());
}
