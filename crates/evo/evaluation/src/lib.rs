#![deny(unsafe_code)]
//! # evo-evaluation
//!
//! Turns sparse verification outcomes into dense tensors indexed by factor
//! levels, and drives one refinement iteration ([`EvoStep`]) from factor
//! construction through evaluation to the plotting hand-off.

pub mod aggregator;
pub mod error;
pub mod plot;
pub mod records;
pub mod step;

pub use aggregator::{
    AnswerTensor, Evaluation, EvaluationAggregator, LevelIndex, SolvedTensor, SourceSummary,
};
pub use error::{EvaluationError, EvaluationResult};
pub use plot::{
    plot_path, plot_request, FailingRenderer, PlotRenderer, PlotRequest, RecordingRenderer,
    RenderedPlot, TICK_PRECISION,
};
pub use records::{
    AnswerCodeTable, CombinationRecord, OutcomeStatus, VerificationOutcome, DECIDED_STATUSES,
};
pub use step::{Direction, EvoStep};
