use evo_factor::FactorError;

/// Errors from evaluation, plotting and refinement steps.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("internal consistency violated: {0}")]
    InternalConsistency(String),
    #[error("unsupported dimensionality: expected {expected} active parameters, got {actual}")]
    UnsupportedDimensionality { expected: usize, actual: usize },
    #[error("step has not been evaluated")]
    NotEvaluated,
    #[error("render failed: {0}")]
    Render(String),
    #[error(transparent)]
    Factor(#[from] FactorError),
}

pub type EvaluationResult<T> = Result<T, EvaluationError>;
