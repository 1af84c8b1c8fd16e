//! `RationalGrid`: the discretised sampling range of one parameter.
//!
//! A grid is defined by `start`, `end` and a level count. From these it
//! derives a step and the explicit level sequence. Indexed parameters carry
//! a minimum step of `1 / |id set|`; when the requested spacing is finer
//! than that, the step (and possibly the start) is raised and the level
//! count follows the resulting progression.
//!
//! Levels are enumerated with a half-open upper bound: every point
//! `start + i * step` that is strictly below `end + step`. Without
//! clamping this is exactly `level_count` points ending at `end`.

use crate::config::IdSetSizes;
use crate::error::{FactorError, FactorResult};
use crate::rational::{to_fixed, RationalValue};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Parameter kinds whose values index into an external id set.
pub const INDEXED_KINDS: [&str; 2] = ["fc", "conv"];

/// Whether `kind` draws a minimum step from an external id set.
pub fn is_indexed(kind: &str) -> bool {
    INDEXED_KINDS.contains(&kind)
}

/// Exact level grid for one parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RationalGrid {
    kind: String,
    start: BigRational,
    end: BigRational,
    level_count: usize,
    minimum_step: Option<BigRational>,
    step: BigRational,
    levels: Vec<BigRational>,
}

impl RationalGrid {
    /// Build a grid, deriving the minimum step from `id_sets` for indexed kinds.
    pub fn new(
        kind: impl Into<String>,
        start: BigRational,
        end: BigRational,
        level_count: usize,
        id_sets: &IdSetSizes,
    ) -> FactorResult<Self> {
        let kind = kind.into();
        let minimum_step = if is_indexed(&kind) {
            let size = id_sets.get(&kind).ok_or_else(|| {
                FactorError::InvalidConfiguration(format!(
                    "indexed parameter '{}' has no id set size",
                    kind
                ))
            })?;
            if size == 0 {
                return Err(FactorError::InvalidConfiguration(format!(
                    "indexed parameter '{}' has an empty id set",
                    kind
                )));
            }
            Some(BigRational::new(BigInt::one(), BigInt::from(size)))
        } else {
            None
        };
        Self::with_minimum_step(kind, start, end, level_count, minimum_step)
    }

    /// Build a grid with an explicit (or no) minimum step.
    pub fn with_minimum_step(
        kind: impl Into<String>,
        start: BigRational,
        end: BigRational,
        level_count: usize,
        minimum_step: Option<BigRational>,
    ) -> FactorResult<Self> {
        let kind = kind.into();
        if let Some(min) = &minimum_step {
            if !min.is_positive() {
                return Err(FactorError::InvalidConfiguration(format!(
                    "minimum step for '{}' must be positive, got {}",
                    kind, min
                )));
            }
        }

        Self {
            kind,
            start,
            end,
            level_count,
            minimum_step,
            step: BigRational::zero(),
            levels: Vec::new(),
        }
        .rebuilt()
    }

    // ── Mutations ───────────────────────────────────────────────────────
    //
    // Each mutation rebuilds a candidate and only replaces `self` once the
    // candidate is consistent, so a failed call leaves the grid untouched.

    /// Multiply both bounds by `coefficient`.
    pub fn scale(&mut self, coefficient: &BigRational) -> FactorResult<()> {
        let candidate = Self {
            start: &self.start * coefficient,
            end: &self.end * coefficient,
            ..self.clone()
        };
        self.commit(candidate)
    }

    pub fn set_start(&mut self, start: BigRational) -> FactorResult<()> {
        let candidate = Self {
            start,
            ..self.clone()
        };
        self.commit(candidate)
    }

    pub fn set_end(&mut self, end: BigRational) -> FactorResult<()> {
        let candidate = Self {
            end,
            ..self.clone()
        };
        self.commit(candidate)
    }

    pub fn set_start_end(&mut self, start: BigRational, end: BigRational) -> FactorResult<()> {
        let candidate = Self {
            start,
            end,
            ..self.clone()
        };
        self.commit(candidate)
    }

    /// Multiply the level count by `arity`, truncating to an integer.
    pub fn subdivide(&mut self, arity: &BigRational) -> FactorResult<()> {
        if !arity.is_positive() {
            return Err(FactorError::InvalidConfiguration(format!(
                "subdivision arity must be positive, got {}",
                arity
            )));
        }
        let scaled = (BigRational::from_integer(BigInt::from(self.level_count)) * arity)
            .floor()
            .to_integer();
        let level_count = scaled.to_usize().ok_or_else(|| {
            FactorError::InvalidConfiguration(format!(
                "subdividing '{}' by {} overflows the level count",
                self.kind, arity
            ))
        })?;
        let candidate = Self {
            level_count,
            ..self.clone()
        };
        self.commit(candidate)
    }

    fn commit(&mut self, candidate: Self) -> FactorResult<()> {
        *self = candidate.rebuilt()?;
        Ok(())
    }

    /// Recompute step and levels from the definition.
    fn rebuilt(mut self) -> FactorResult<Self> {
        if self.level_count < 1 {
            return Err(FactorError::InvalidConfiguration(format!(
                "'{}' needs at least one level, got {}",
                self.kind, self.level_count
            )));
        }
        if self.start > self.end {
            return Err(FactorError::InvalidConfiguration(format!(
                "'{}' range is inverted: start {} > end {}",
                self.kind, self.start, self.end
            )));
        }

        self.step = if self.level_count == 1 {
            BigRational::zero()
        } else {
            (&self.end - &self.start) / BigRational::from_integer(BigInt::from(self.level_count - 1))
        };

        let mut adjusted = false;
        if let Some(min) = &self.minimum_step {
            if self.start < *min {
                self.start = min.clone();
                adjusted = true;
            }
            if self.step < *min {
                self.step = min.clone();
                adjusted = true;
            }
        }

        if self.step.is_zero() && self.level_count > 1 {
            return Err(FactorError::InvalidConfiguration(format!(
                "'{}' range [{}, {}] has zero width but {} levels were requested",
                self.kind, self.start, self.end, self.level_count
            )));
        }

        self.levels = enumerate_levels(&self.start, &self.end, &self.step)?;
        if self.levels.is_empty() {
            return Err(FactorError::InternalConsistency(format!(
                "'{}' has no levels between {} and {}",
                self.kind, self.start, self.end
            )));
        }

        if adjusted && self.level_count != self.levels.len() {
            warn!(
                kind = %self.kind,
                requested = self.level_count,
                actual = self.levels.len(),
                step = %self.step,
                "minimum step changed grid resolution"
            );
            self.level_count = self.levels.len();
        }

        if self.level_count != self.levels.len() {
            return Err(FactorError::InternalConsistency(format!(
                "'{}' expects {} levels but enumerated {}",
                self.kind,
                self.level_count,
                self.levels.len()
            )));
        }

        Ok(self)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// `(start, end, level_count)`.
    pub fn get(&self) -> (BigRational, BigRational, usize) {
        (self.start.clone(), self.end.clone(), self.level_count)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn start(&self) -> &BigRational {
        &self.start
    }

    pub fn end(&self) -> &BigRational {
        &self.end
    }

    pub fn level_count(&self) -> usize {
        self.level_count
    }

    pub fn step(&self) -> &BigRational {
        &self.step
    }

    pub fn minimum_step(&self) -> Option<&BigRational> {
        self.minimum_step.as_ref()
    }

    pub fn levels(&self) -> &[BigRational] {
        &self.levels
    }

    /// Levels formatted with `precision` fractional digits.
    pub fn tick_labels(&self, precision: usize) -> Vec<String> {
        self.levels.iter().map(|l| to_fixed(l, precision)).collect()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            kind: self.kind.clone(),
            start: self.start.clone().into(),
            end: self.end.clone().into(),
            level_count: self.level_count,
            step: self.step.clone().into(),
            minimum_step: self.minimum_step.clone().map(Into::into),
            levels: self.levels.iter().cloned().map(Into::into).collect(),
        }
    }
}

/// Points `start + i * step` strictly below `end + step`.
fn enumerate_levels(
    start: &BigRational,
    end: &BigRational,
    step: &BigRational,
) -> FactorResult<Vec<BigRational>> {
    if step.is_zero() {
        return Ok(vec![start.clone()]);
    }

    let count = ((end + step - start) / step).ceil().to_integer();
    if !count.is_positive() {
        return Ok(Vec::new());
    }
    let count = count.to_usize().ok_or_else(|| {
        FactorError::InternalConsistency(format!(
            "level count {} does not fit in memory",
            count
        ))
    })?;

    Ok((0..count)
        .map(|i| start + step * BigRational::from_integer(BigInt::from(i)))
        .collect())
}

impl fmt::Display for RationalGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : [", self.kind)?;
        for (i, level) in self.levels.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", level)?;
        }
        write!(f, "]")
    }
}

/// Serialisable view of a grid for reports.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridSnapshot {
    pub kind: String,
    pub start: RationalValue,
    pub end: RationalValue,
    pub level_count: usize,
    pub step: RationalValue,
    pub minimum_step: Option<RationalValue>,
    pub levels: Vec<RationalValue>,
}
