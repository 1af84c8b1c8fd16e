//! Property tests: every outcome source gets tensors shaped by the factor
//! levels, and the tensors agree with a direct count over the records.

use evo_evaluation::{AnswerCodeTable, CombinationRecord, EvaluationAggregator, OutcomeStatus};
use evo_factor::{integer, ratio, ExperimentConfig, FactorSet};
use ndarray::Dimension;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const STATUSES: [&str; 5] = ["sat", "unsat", "unknown", "timeout", "error"];
const SOURCES: [&str; 3] = ["eran", "neurify", "nnenum"];

/// Full-factorial experiment with random outcomes per cell.
#[derive(Debug, Clone)]
struct Case {
    levels: Vec<usize>,
    properties: usize,
    /// Per cell: status index, source bitmask (non-zero), property id.
    outcomes: Vec<(usize, u8, usize)>,
}

fn arb_case() -> impl Strategy<Value = Case> {
    (prop::collection::vec(1usize..4, 1..4), 1usize..4).prop_flat_map(|(levels, properties)| {
        let cells: usize = levels.iter().product();
        let outcome = (0..STATUSES.len(), 1u8..8, 0..properties);
        (
            Just(levels),
            Just(properties),
            prop::collection::vec(outcome, cells),
        )
            .prop_map(|(levels, properties, outcomes)| Case {
                levels,
                properties,
                outcomes,
            })
    })
}

/// Mixed-radix coordinates of cell `n`.
fn coordinates(mut n: usize, levels: &[usize]) -> Vec<usize> {
    let mut coords = vec![0; levels.len()];
    for (axis, &len) in levels.iter().enumerate().rev() {
        coords[axis] = n % len;
        n /= len;
    }
    coords
}

fn build(case: &Case) -> (FactorSet, Vec<CombinationRecord>, Vec<Vec<usize>>) {
    let names: Vec<String> = (0..case.levels.len()).map(|i| format!("p{}", i)).collect();
    let mut config = ExperimentConfig::new().with_property_count(case.properties);
    for (name, &levels) in names.iter().zip(&case.levels) {
        config = config.with_parameter(name.clone(), integer(0), integer(levels as i64 - 1), levels);
    }
    let factors = FactorSet::build(&names, &config).unwrap();

    let mut records = Vec::new();
    let mut cells = Vec::new();
    for (n, &(status, mask, prop)) in case.outcomes.iter().enumerate() {
        let coords = coordinates(n, &case.levels);
        let mut record = CombinationRecord::new(prop);
        for (name, &c) in names.iter().zip(&coords) {
            record = record.assign(name.clone(), integer(c as i64));
        }
        for (bit, source) in SOURCES.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                record = record.with_result(*source, STATUSES[status]);
            }
        }
        records.push(record);
        cells.push(coords);
    }
    (factors, records, cells)
}

proptest! {
    #[test]
    fn every_source_has_level_shaped_tensors(case in arb_case()) {
        let (factors, records, _) = build(&case);
        let codes = AnswerCodeTable::standard();
        let eval = EvaluationAggregator::new(&factors, case.properties, &codes)
            .aggregate(&records)
            .unwrap();

        let seen: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.results.keys().map(String::as_str))
            .collect();
        prop_assert_eq!(eval.sources().collect::<BTreeSet<_>>(), seen);

        let mut answer_shape = case.levels.clone();
        answer_shape.push(case.properties);
        for source in eval.sources() {
            prop_assert_eq!(eval.solved(source).unwrap().shape(), case.levels.as_slice());
            prop_assert_eq!(eval.answers(source).unwrap().shape(), answer_shape.as_slice());
        }
    }

    #[test]
    fn tensors_match_direct_count(case in arb_case()) {
        let (factors, records, cells) = build(&case);
        let codes = AnswerCodeTable::standard();
        let eval = EvaluationAggregator::new(&factors, case.properties, &codes)
            .aggregate(&records)
            .unwrap();

        let mut expected_solved: BTreeMap<(&str, Vec<usize>), u32> = BTreeMap::new();
        for (record, coords) in records.iter().zip(&cells) {
            for (source, outcome) in &record.results {
                if outcome.status.is_decided() {
                    *expected_solved.entry((source.as_str(), coords.clone())).or_default() += 1;
                }

                let mut answer_cell = coords.clone();
                answer_cell.push(record.property_id);
                let code = codes.code(&outcome.status).unwrap();
                // Full factorial: each cell is written exactly once per source.
                prop_assert_eq!(
                    eval.answers(source).unwrap()[answer_cell.as_slice()],
                    Some(code)
                );
            }
        }

        for source in eval.sources() {
            let solved = eval.solved(source).unwrap();
            for (index, &count) in solved.indexed_iter() {
                let key = (source, index.slice().to_vec());
                prop_assert_eq!(count, expected_solved.get(&key).copied().unwrap_or(0));
            }
        }
    }

    /// Dropping every record on one level of `p0` leaves that slab empty
    /// and every other cell where it was.
    #[test]
    fn partial_coverage_keeps_grid_positions(case in arb_case()) {
        prop_assume!(case.levels[0] > 1);
        let (factors, records, cells) = build(&case);
        let codes = AnswerCodeTable::standard();
        let full = EvaluationAggregator::new(&factors, case.properties, &codes)
            .aggregate(&records)
            .unwrap();

        let filtered: Vec<CombinationRecord> = records
            .into_iter()
            .zip(&cells)
            .filter(|(_, coords)| coords[0] != 0)
            .map(|(r, _)| r)
            .collect();
        let partial = EvaluationAggregator::new(&factors, case.properties, &codes)
            .aggregate(&filtered)
            .unwrap();

        for source in partial.sources() {
            let answers = partial.answers(source).unwrap();
            let reference = full.answers(source).unwrap();
            for (index, &code) in answers.indexed_iter() {
                if index[0] == 0 {
                    prop_assert_eq!(code, None);
                } else {
                    prop_assert_eq!(code, reference[index.slice()]);
                }
            }
        }
    }

    /// A value strictly between two levels of `p0` is rejected.
    #[test]
    fn off_grid_value_is_rejected(case in arb_case()) {
        prop_assume!(case.levels[0] > 1);
        let (factors, mut records, _) = build(&case);
        records[0] = records[0].clone().assign("p0", ratio(1, 2).unwrap());
        let codes = AnswerCodeTable::standard();
        prop_assert!(EvaluationAggregator::new(&factors, case.properties, &codes)
            .aggregate(&records)
            .is_err());
    }
}

#[test]
fn decided_statuses_are_sat_and_unsat() {
    let decided: Vec<&str> = STATUSES
        .iter()
        .copied()
        .filter(|s| OutcomeStatus::from(*s).is_decided())
        .collect();
    assert_eq!(decided, vec!["sat", "unsat"]);
}
