#![deny(unsafe_code)]
//! # evo-factor
//!
//! Factor engine for evolutionary benchmark refinement: turns a parameter
//! range and a level count into an exact, constraint-respecting grid of
//! sample levels.
//!
//! All arithmetic is exact ([`num_rational::BigRational`]) so that repeated
//! rescaling and subdivision across iterations never drifts.

pub mod config;
pub mod error;
pub mod grid;
pub mod rational;
pub mod set;

pub use config::{ExperimentConfig, IdSetSizes, ParameterTable, PROPERTY_KEY};
pub use error::{FactorError, FactorResult};
pub use grid::{is_indexed, GridSnapshot, RationalGrid, INDEXED_KINDS};
pub use num_rational::BigRational;
pub use rational::{integer, parse_rational, ratio, rational_from_f64, to_fixed, RationalValue};
pub use set::FactorSet;
