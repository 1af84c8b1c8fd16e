use crate::config::ExperimentConfig;
use crate::error::{FactorError, FactorResult};
use crate::grid::RationalGrid;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// The grids of one refinement iteration, in active-parameter order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactorSet {
    grids: Vec<RationalGrid>,
}

impl FactorSet {
    /// Build one grid per active parameter from `config`.
    pub fn build<S: AsRef<str>>(params: &[S], config: &ExperimentConfig) -> FactorResult<Self> {
        let mut grids = Vec::with_capacity(params.len());
        for param in params {
            let name = param.as_ref();
            let (start, end) = config.range(name)?;
            let levels = config.level(name)?;
            let grid = RationalGrid::new(name, start, end, levels, &config.indexed)?;
            debug!(parameter = name, levels = grid.level_count(), step = %grid.step(), "built factor");
            grids.push(grid);
        }

        let set = Self::from_grids(grids)?;
        info!(parameters = ?set.names(), shape = ?set.shape(), "factor set ready");
        Ok(set)
    }

    /// Wrap already-built grids, e.g. ones mutated for the next iteration.
    pub fn from_grids(grids: Vec<RationalGrid>) -> FactorResult<Self> {
        if grids.is_empty() {
            return Err(FactorError::InvalidConfiguration(
                "no active parameters".into(),
            ));
        }
        let mut seen = BTreeSet::new();
        for grid in &grids {
            if !seen.insert(grid.kind()) {
                return Err(FactorError::InvalidConfiguration(format!(
                    "parameter '{}' is listed twice",
                    grid.kind()
                )));
            }
        }
        Ok(Self { grids })
    }

    pub fn names(&self) -> Vec<&str> {
        self.grids.iter().map(|g| g.kind()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RationalGrid> {
        self.grids.iter().find(|g| g.kind() == name)
    }

    pub fn grids(&self) -> &[RationalGrid] {
        &self.grids
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RationalGrid> {
        self.grids.iter()
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// Level count of every grid, in order.
    pub fn shape(&self) -> Vec<usize> {
        self.grids.iter().map(|g| g.level_count()).collect()
    }

    pub fn into_grids(self) -> Vec<RationalGrid> {
        self.grids
    }
}

impl<'a> IntoIterator for &'a FactorSet {
    type Item = &'a RationalGrid;
    type IntoIter = std::slice::Iter<'a, RationalGrid>;

    fn into_iter(self) -> Self::IntoIter {
        self.grids.iter()
    }
}
