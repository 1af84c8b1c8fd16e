//! One refinement iteration: build the factors, aggregate outcomes, hand the
//! result to a plot renderer.

use crate::aggregator::{Evaluation, EvaluationAggregator};
use crate::error::{EvaluationError, EvaluationResult};
use crate::plot::{self, PlotRenderer};
use crate::records::{AnswerCodeTable, CombinationRecord};
use evo_factor::{to_fixed, ExperimentConfig, FactorSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Which side of the current region a refinement iteration explores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Both,
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Both => write!(f, "both"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "both" => Ok(Direction::Both),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(EvaluationError::InvalidConfiguration(format!(
                "unknown direction '{}'",
                other
            ))),
        }
    }
}

/// One iteration of the evolutionary refinement: factors, then evaluation.
#[derive(Clone, Debug)]
pub struct EvoStep {
    iteration: u32,
    direction: Direction,
    property_count: usize,
    factors: FactorSet,
    evaluation: Option<Evaluation>,
}

impl EvoStep {
    pub fn new<S: AsRef<str>>(
        config: &ExperimentConfig,
        params: &[S],
        direction: Direction,
        iteration: u32,
    ) -> EvaluationResult<Self> {
        let factors = FactorSet::build(params, config)?;
        let property_count = config.property_count()?;
        Ok(Self::from_factors(factors, property_count, direction, iteration))
    }

    pub fn from_factors(
        factors: FactorSet,
        property_count: usize,
        direction: Direction,
        iteration: u32,
    ) -> Self {
        Self {
            iteration,
            direction,
            property_count,
            factors,
            evaluation: None,
        }
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn property_count(&self) -> usize {
        self.property_count
    }

    pub fn factors(&self) -> &FactorSet {
        &self.factors
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    /// Aggregate verification outcomes. A failed pass keeps any earlier result.
    pub fn evaluate(
        &mut self,
        records: &[CombinationRecord],
        codes: &AnswerCodeTable,
    ) -> EvaluationResult<&Evaluation> {
        let evaluation =
            EvaluationAggregator::new(&self.factors, self.property_count, codes).aggregate(records)?;
        info!(
            iteration = self.iteration,
            direction = %self.direction,
            sources = evaluation.sources().count(),
            "step evaluated"
        );
        Ok(&*self.evaluation.insert(evaluation))
    }

    /// Render the first source's answers under `root/figures/`.
    pub fn plot(&self, renderer: &dyn PlotRenderer, root: &Path) -> EvaluationResult<PathBuf> {
        let evaluation = self.evaluation.as_ref().ok_or(EvaluationError::NotEvaluated)?;
        let output = plot::plot_path(root, self.iteration, self.direction);
        plot::render(&self.factors, evaluation, renderer, output)
    }
}

impl fmt::Display for EvoStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "iteration {} ({})", self.iteration, self.direction)?;
        for grid in &self.factors {
            let levels: Vec<String> = grid.levels().iter().map(|l| to_fixed(l, 3)).collect();
            writeln!(f, "{}:\t[{}]", grid.kind(), levels.join(", "))?;
        }
        Ok(())
    }
}
