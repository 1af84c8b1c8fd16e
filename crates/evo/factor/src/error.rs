//! Error types for the factor engine.

use thiserror::Error;

/// Errors raised while building or mutating factor grids.
#[derive(Debug, Error)]
pub enum FactorError {
    /// A level count, range or parameter entry is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A rebuilt grid disagrees with its own level sequence.
    #[error("internal consistency violated: {0}")]
    InternalConsistency(String),

    /// Text that does not denote an exact rational number.
    #[error("invalid rational '{0}'")]
    InvalidRational(String),

    /// A configuration document could not be decoded.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for factor operations.
pub type FactorResult<T> = Result<T, FactorError>;
