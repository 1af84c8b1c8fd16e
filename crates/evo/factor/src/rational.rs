//! Exact rational values: parsing, fixed-precision formatting and serde.
//!
//! Grid arithmetic never touches floating point. Floats only appear at the
//! edges: configuration files may spell a bound as `0.1`, which is read as
//! the decimal fraction `1/10`, and tick labels are rendered as decimals.

use crate::error::{FactorError, FactorResult};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Build a rational from an integer numerator and denominator.
pub fn ratio(numer: i64, denom: i64) -> FactorResult<BigRational> {
    if denom == 0 {
        return Err(FactorError::InvalidRational(format!("{}/{}", numer, denom)));
    }
    Ok(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
}

/// Build an integral rational.
pub fn integer(value: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(value))
}

/// Parse `p`, `p/q` or a plain decimal such as `-0.125` into an exact rational.
pub fn parse_rational(text: &str) -> FactorResult<BigRational> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FactorError::InvalidRational(text.to_string()));
    }

    if let Some((numer, denom)) = trimmed.split_once('/') {
        let invalid = || FactorError::InvalidRational(text.to_string());
        let numer: BigInt = numer.trim().parse().map_err(|_| invalid())?;
        let denom: BigInt = denom.trim().parse().map_err(|_| invalid())?;
        if denom.is_zero() {
            return Err(invalid());
        }
        return Ok(BigRational::new(numer, denom));
    }

    parse_decimal(trimmed).ok_or_else(|| FactorError::InvalidRational(text.to_string()))
}

fn parse_decimal(text: &str) -> Option<BigRational> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return None;
    }

    let numer: BigInt = format!("{}{}", whole, fraction).parse().ok()?;
    let denom = num_traits::pow(BigInt::from(10u32), fraction.len());
    let value = BigRational::new(numer, denom);
    Some(if negative { -value } else { value })
}

/// Convert a float through its shortest decimal spelling (`0.1` becomes `1/10`).
pub fn rational_from_f64(value: f64) -> FactorResult<BigRational> {
    if !value.is_finite() {
        return Err(FactorError::InvalidRational(value.to_string()));
    }
    let text = value.to_string();
    parse_decimal(&text).ok_or(FactorError::InvalidRational(text))
}

/// Render `value` with exactly `precision` fractional digits, rounding half away from zero.
pub fn to_fixed(value: &BigRational, precision: usize) -> String {
    let scale = BigRational::from_integer(num_traits::pow(BigInt::from(10u32), precision));
    let scaled = (value * scale).round().to_integer();
    let sign = if scaled.is_negative() { "-" } else { "" };
    let digits = scaled.abs().to_string();
    if precision == 0 {
        return format!("{}{}", sign, digits);
    }

    let padded = format!("{:0>width$}", digits, width = precision + 1);
    let (whole, fraction) = padded.split_at(padded.len() - precision);
    format!("{}{}.{}", sign, whole, fraction)
}

/// An exact rational carried through configuration files and records.
///
/// Serialises as its `p/q` text; deserialises from integers, floats (via
/// [`rational_from_f64`]) or any string [`parse_rational`] accepts.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RationalValue(BigRational);

impl RationalValue {
    pub fn as_rational(&self) -> &BigRational {
        &self.0
    }
}

impl From<BigRational> for RationalValue {
    fn from(value: BigRational) -> Self {
        Self(value)
    }
}

impl From<i64> for RationalValue {
    fn from(value: i64) -> Self {
        Self(integer(value))
    }
}

impl std::str::FromStr for RationalValue {
    type Err = FactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rational(s).map(Self)
    }
}

impl fmt::Display for RationalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for RationalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for RationalValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        let value = match Raw::deserialize(deserializer)? {
            Raw::Int(v) => integer(v),
            Raw::Float(v) => rational_from_f64(v).map_err(serde::de::Error::custom)?,
            Raw::Text(s) => parse_rational(&s).map_err(serde::de::Error::custom)?,
        };
        Ok(Self(value))
    }
}
