//! Maps sparse per-combination outcomes onto dense tensors indexed by factor levels.

use crate::error::{EvaluationError, EvaluationResult};
use crate::records::{AnswerCodeTable, CombinationRecord};
use evo_factor::{FactorSet, RationalValue};
use ndarray::{ArrayD, IxDyn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Solved counts per cell, one tensor per outcome source.
pub type SolvedTensor = ArrayD<u32>;

/// Answer code per cell and property; `None` where nothing was reported.
pub type AnswerTensor = ArrayD<Option<i32>>;

/// Per-parameter mapping from raw value to level index.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelIndex {
    columns: Vec<(String, Vec<RationalValue>)>,
}

impl LevelIndex {
    /// Index every active parameter by its grid levels.
    ///
    /// Records may cover only part of the grid; [`locate`](Self::locate)
    /// rejects any value that is not exactly one of the levels.
    pub fn new(factors: &FactorSet) -> Self {
        Self {
            columns: factors
                .iter()
                .map(|grid| {
                    let levels = grid.levels().iter().cloned().map(RationalValue::from).collect();
                    (grid.kind().to_string(), levels)
                })
                .collect(),
        }
    }

    /// Level coordinates of `record`, one per active parameter.
    pub fn locate(&self, record: &CombinationRecord) -> EvaluationResult<Vec<usize>> {
        self.columns
            .iter()
            .map(|(name, levels)| {
                let value = record.assignment.get(name).ok_or_else(|| {
                    EvaluationError::InternalConsistency(format!("no value for '{}'", name))
                })?;
                // Levels ascend strictly, so exact search is a grid membership test.
                levels.binary_search(value).map_err(|_| {
                    EvaluationError::InternalConsistency(format!(
                        "value {} of '{}' is not one of its {} levels",
                        value,
                        name,
                        levels.len()
                    ))
                })
            })
            .collect()
    }

    /// Levels of `parameter`, in index order.
    pub fn values(&self, parameter: &str) -> Option<&[RationalValue]> {
        self.columns
            .iter()
            .find(|(name, _)| name == parameter)
            .map(|(_, values)| values.as_slice())
    }
}

/// Per-source totals for reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source: String,
    /// Decided (sat/unsat) problems.
    pub solved: u32,
    /// Cells holding any answer code.
    pub answered: usize,
    /// Cells in the answer tensor.
    pub cells: usize,
}

/// Result tensors of one evaluation pass.
#[derive(Clone, Debug)]
pub struct Evaluation {
    index: LevelIndex,
    solved: BTreeMap<String, SolvedTensor>,
    answers: BTreeMap<String, AnswerTensor>,
}

impl Evaluation {
    /// Outcome sources, in lexicographic order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.solved.keys().map(String::as_str)
    }

    pub fn first_source(&self) -> Option<&str> {
        self.sources().next()
    }

    pub fn solved(&self, source: &str) -> Option<&SolvedTensor> {
        self.solved.get(source)
    }

    pub fn answers(&self, source: &str) -> Option<&AnswerTensor> {
        self.answers.get(source)
    }

    pub fn total_solved(&self, source: &str) -> Option<u32> {
        self.solved.get(source).map(|t| t.sum())
    }

    /// Grid levels of `parameter`; the tensor index along its axis.
    pub fn level_values(&self, parameter: &str) -> Option<&[RationalValue]> {
        self.index.values(parameter)
    }

    pub fn summaries(&self) -> Vec<SourceSummary> {
        self.solved
            .iter()
            .map(|(source, solved)| {
                let answers = &self.answers[source];
                SourceSummary {
                    source: source.clone(),
                    solved: solved.sum(),
                    answered: answers.iter().filter(|c| c.is_some()).count(),
                    cells: answers.len(),
                }
            })
            .collect()
    }
}

/// Builds solved-count and answer-code tensors from combination records.
pub struct EvaluationAggregator<'a> {
    factors: &'a FactorSet,
    property_count: usize,
    codes: &'a AnswerCodeTable,
}

impl<'a> EvaluationAggregator<'a> {
    pub fn new(factors: &'a FactorSet, property_count: usize, codes: &'a AnswerCodeTable) -> Self {
        Self {
            factors,
            property_count,
            codes,
        }
    }

    /// Tensor shape of solved counts: one axis per active parameter.
    pub fn solved_shape(&self) -> Vec<usize> {
        self.factors.shape()
    }

    /// Solved shape plus a trailing property axis.
    pub fn answer_shape(&self) -> Vec<usize> {
        let mut shape = self.factors.shape();
        shape.push(self.property_count);
        shape
    }

    /// One pass over `records`. Fails without returning partial tensors.
    pub fn aggregate(&self, records: &[CombinationRecord]) -> EvaluationResult<Evaluation> {
        if self.property_count == 0 {
            return Err(EvaluationError::InvalidConfiguration(
                "property count must be at least 1".into(),
            ));
        }

        let index = LevelIndex::new(self.factors);
        if records.is_empty() {
            debug!("no combinations to aggregate");
        }

        // All sources are known before any tensor is allocated.
        let sources: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.results.keys().map(String::as_str))
            .collect();

        let solved_shape = self.solved_shape();
        let answer_shape = self.answer_shape();
        let mut solved: BTreeMap<String, SolvedTensor> = sources
            .iter()
            .map(|s| (s.to_string(), ArrayD::zeros(IxDyn(&solved_shape))))
            .collect();
        let mut answers: BTreeMap<String, AnswerTensor> = sources
            .iter()
            .map(|s| (s.to_string(), ArrayD::from_elem(IxDyn(&answer_shape), None)))
            .collect();

        for (position, record) in records.iter().enumerate() {
            let cell = index.locate(record).map_err(|e| match e {
                EvaluationError::InternalConsistency(msg) => {
                    EvaluationError::InternalConsistency(format!("combination #{}: {}", position, msg))
                }
                other => other,
            })?;
            if record.property_id >= self.property_count {
                return Err(EvaluationError::InternalConsistency(format!(
                    "combination #{} has property id {} but only {} properties exist",
                    position, record.property_id, self.property_count
                )));
            }
            let mut answer_cell = cell.clone();
            answer_cell.push(record.property_id);

            for (source, outcome) in &record.results {
                let code = self.codes.code(&outcome.status)?;

                if outcome.status.is_decided() {
                    let count = solved
                        .get_mut(source)
                        .and_then(|t| t.get_mut(cell.as_slice()))
                        .ok_or_else(|| out_of_bounds(source, &cell, &solved_shape))?;
                    *count += 1;
                }

                let slot = answers
                    .get_mut(source)
                    .and_then(|t| t.get_mut(answer_cell.as_slice()))
                    .ok_or_else(|| out_of_bounds(source, &answer_cell, &answer_shape))?;
                *slot = Some(code);
            }
        }

        info!(
            combinations = records.len(),
            sources = sources.len(),
            shape = ?solved_shape,
            "aggregated verification outcomes"
        );

        Ok(Evaluation {
            index,
            solved,
            answers,
        })
    }
}

fn out_of_bounds(source: &str, cell: &[usize], shape: &[usize]) -> EvaluationError {
    EvaluationError::InternalConsistency(format!(
        "cell {:?} for source '{}' is outside tensor shape {:?}",
        cell, source, shape
    ))
}
