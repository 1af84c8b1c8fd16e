//! Experiment configuration: parameter ranges, level counts and id-set sizes.

use crate::error::{FactorError, FactorResult};
use crate::grid::RationalGrid;
use crate::rational::RationalValue;
use num_rational::BigRational;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Level-table key holding the number of properties per combination.
pub const PROPERTY_KEY: &str = "prop";

/// Cardinalities of the external id sets behind indexed parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdSetSizes(BTreeMap<String, usize>);

impl IdSetSizes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: impl Into<String>, size: usize) -> Self {
        self.0.insert(kind.into(), size);
        self
    }

    pub fn get(&self, kind: &str) -> Option<usize> {
        self.0.get(kind).copied()
    }
}

/// The `range` and `level` tables of an experiment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterTable {
    /// Inclusive `[start, end]` per parameter.
    #[serde(default)]
    pub range: BTreeMap<String, (RationalValue, RationalValue)>,
    /// Level count per parameter, plus the property count under `prop`.
    #[serde(default)]
    pub level: BTreeMap<String, usize>,
}

/// Configuration consumed when building the factors of one refinement iteration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub parameters: ParameterTable,
    #[serde(default)]
    pub indexed: IdSetSizes,
}

impl ExperimentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file, choosing the decoder by extension.
    pub fn load(path: impl AsRef<Path>) -> FactorResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            other => Err(FactorError::ConfigParse(format!(
                "unsupported config extension {:?} for {}",
                other,
                path.display()
            ))),
        }
    }

    pub fn from_toml_str(contents: &str) -> FactorResult<Self> {
        toml::from_str(contents).map_err(|e| FactorError::ConfigParse(e.to_string()))
    }

    pub fn from_yaml_str(contents: &str) -> FactorResult<Self> {
        serde_yaml::from_str(contents).map_err(|e| FactorError::ConfigParse(e.to_string()))
    }

    pub fn from_json_str(contents: &str) -> FactorResult<Self> {
        serde_json::from_str(contents).map_err(|e| FactorError::ConfigParse(e.to_string()))
    }

    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        start: BigRational,
        end: BigRational,
        levels: usize,
    ) -> Self {
        let name = name.into();
        self.parameters
            .range
            .insert(name.clone(), (start.into(), end.into()));
        self.parameters.level.insert(name, levels);
        self
    }

    pub fn with_property_count(mut self, count: usize) -> Self {
        self.parameters.level.insert(PROPERTY_KEY.into(), count);
        self
    }

    pub fn with_id_set_size(mut self, kind: impl Into<String>, size: usize) -> Self {
        self.indexed = self.indexed.with(kind, size);
        self
    }

    /// Inclusive range configured for `name`.
    pub fn range(&self, name: &str) -> FactorResult<(BigRational, BigRational)> {
        self.parameters
            .range
            .get(name)
            .map(|(start, end)| (start.as_rational().clone(), end.as_rational().clone()))
            .ok_or_else(|| {
                FactorError::InvalidConfiguration(format!("no range configured for '{}'", name))
            })
    }

    /// Level count configured for `name`.
    pub fn level(&self, name: &str) -> FactorResult<usize> {
        self.parameters.level.get(name).copied().ok_or_else(|| {
            FactorError::InvalidConfiguration(format!("no level count configured for '{}'", name))
        })
    }

    /// Number of properties verified per combination.
    pub fn property_count(&self) -> FactorResult<usize> {
        self.level(PROPERTY_KEY)
    }

    /// Store a grid's current definition so the next iteration starts from it.
    pub fn record_grid(&mut self, grid: &RationalGrid) {
        let (start, end, levels) = grid.get();
        self.parameters
            .range
            .insert(grid.kind().to_string(), (start.into(), end.into()));
        self.parameters.level.insert(grid.kind().to_string(), levels);
    }
}
