//! Outcome records produced by the benchmark and the status → code table.

use crate::error::{EvaluationError, EvaluationResult};
use evo_factor::{BigRational, RationalValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Statuses that count as a decided verification problem.
pub const DECIDED_STATUSES: [&str; 2] = ["sat", "unsat"];

/// Raw status string reported by an outcome source.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeStatus(String);

impl OutcomeStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `sat` or `unsat`.
    pub fn is_decided(&self) -> bool {
        DECIDED_STATUSES.contains(&self.0.as_str())
    }
}

impl From<&str> for OutcomeStatus {
    fn from(status: &str) -> Self {
        Self::new(status)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What one outcome source reported for one combination and property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub status: OutcomeStatus,
    /// Wall-clock time, when the source reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<f64>,
}

impl VerificationOutcome {
    pub fn new(status: impl Into<OutcomeStatus>) -> Self {
        Self {
            status: status.into(),
            seconds: None,
        }
    }

    pub fn with_seconds(mut self, seconds: f64) -> Self {
        self.seconds = Some(seconds);
        self
    }
}

/// One generated benchmark instance: a parameter assignment, the property it
/// checks and the status each outcome source reported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombinationRecord {
    /// Raw assigned value per parameter.
    pub assignment: BTreeMap<String, RationalValue>,
    pub property_id: usize,
    #[serde(default)]
    pub results: BTreeMap<String, VerificationOutcome>,
}

impl CombinationRecord {
    pub fn new(property_id: usize) -> Self {
        Self {
            assignment: BTreeMap::new(),
            property_id,
            results: BTreeMap::new(),
        }
    }

    pub fn assign(mut self, parameter: impl Into<String>, value: BigRational) -> Self {
        self.assignment.insert(parameter.into(), value.into());
        self
    }

    pub fn with_result(
        mut self,
        source: impl Into<String>,
        status: impl Into<OutcomeStatus>,
    ) -> Self {
        self.results
            .insert(source.into(), VerificationOutcome::new(status));
        self
    }

    pub fn with_outcome(mut self, source: impl Into<String>, outcome: VerificationOutcome) -> Self {
        self.results.insert(source.into(), outcome);
        self
    }
}

/// Maps raw statuses to the small integers stored in answer tensors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerCodeTable(BTreeMap<String, i32>);

impl AnswerCodeTable {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Codes used by the verification benchmark: decided answers first,
    /// then resource limits, failures and problems that never ran.
    pub fn standard() -> Self {
        Self::empty()
            .with("unsat", 1)
            .with("sat", 2)
            .with("unknown", 3)
            .with("timeout", 4)
            .with("memout", 4)
            .with("error", 5)
            .with("exception", 6)
            .with("unrun", 7)
            .with("untrain", 8)
    }

    pub fn with(mut self, status: impl Into<String>, code: i32) -> Self {
        self.0.insert(status.into(), code);
        self
    }

    pub fn from_json_str(contents: &str) -> EvaluationResult<Self> {
        serde_json::from_str(contents)
            .map_err(|e| EvaluationError::InvalidConfiguration(format!("answer codes: {}", e)))
    }

    /// Code for `status`; statuses outside the table are a configuration error.
    pub fn code(&self, status: &OutcomeStatus) -> EvaluationResult<i32> {
        self.0.get(status.as_str()).copied().ok_or_else(|| {
            EvaluationError::InvalidConfiguration(format!(
                "no answer code for status '{}'",
                status
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AnswerCodeTable {
    fn default() -> Self {
        Self::standard()
    }
}
