//! Two-parameter visualisation adapter.
//!
//! Rendering itself belongs to an external collaborator behind
//! [`PlotRenderer`]; this module only shapes the request.

use crate::aggregator::Evaluation;
use crate::error::{EvaluationError, EvaluationResult};
use crate::step::Direction;
use evo_factor::FactorSet;
use ndarray::ArrayViewD;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Fractional digits of tick labels.
pub const TICK_PRECISION: usize = 4;

/// Everything a renderer needs to draw one pie-scatter figure.
#[derive(Debug)]
pub struct PlotRequest<'a> {
    pub source: &'a str,
    /// Answer codes, shape `[x levels, y levels, properties]`.
    pub answers: ArrayViewD<'a, Option<i32>>,
    pub x_ticks: Vec<String>,
    pub y_ticks: Vec<String>,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub output: PathBuf,
}

/// External collaborator that persists a figure.
pub trait PlotRenderer: Send + Sync {
    fn render(&self, request: &PlotRequest<'_>) -> EvaluationResult<()>;
}

/// Image path for an iteration: `<root>/figures/<iteration>_<direction>.png`.
pub fn plot_path(root: &Path, iteration: u32, direction: Direction) -> PathBuf {
    root.join("figures")
        .join(format!("{}_{}.png", iteration, direction))
}

/// Shape the request for the first outcome source.
pub fn plot_request<'a>(
    factors: &'a FactorSet,
    evaluation: &'a Evaluation,
    output: PathBuf,
) -> EvaluationResult<PlotRequest<'a>> {
    let [x, y] = factors.grids() else {
        return Err(EvaluationError::UnsupportedDimensionality {
            expected: 2,
            actual: factors.len(),
        });
    };

    // Only one source fits in a figure.
    let source = evaluation
        .first_source()
        .ok_or_else(|| EvaluationError::Render("evaluation has no outcome sources".into()))?;
    let answers = evaluation
        .answers(source)
        .ok_or_else(|| EvaluationError::Render(format!("no answers for '{}'", source)))?;

    Ok(PlotRequest {
        source,
        answers: answers.view(),
        x_ticks: x.tick_labels(TICK_PRECISION),
        y_ticks: y.tick_labels(TICK_PRECISION),
        x_label: x.kind(),
        y_label: y.kind(),
        output,
    })
}

/// Build the request and hand it to `renderer`; returns the image path.
pub fn render(
    factors: &FactorSet,
    evaluation: &Evaluation,
    renderer: &dyn PlotRenderer,
    output: PathBuf,
) -> EvaluationResult<PathBuf> {
    let request = plot_request(factors, evaluation, output)?;
    renderer.render(&request)?;
    tracing::info!(source = request.source, output = %request.output.display(), "plot rendered");
    Ok(request.output)
}

/// What [`RecordingRenderer`] saw.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedPlot {
    pub source: String,
    pub shape: Vec<usize>,
    pub x_ticks: Vec<String>,
    pub y_ticks: Vec<String>,
    pub x_label: String,
    pub y_label: String,
    pub output: PathBuf,
}

/// Renderer that keeps requests in memory instead of drawing them.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    plots: Mutex<Vec<RenderedPlot>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plots(&self) -> Vec<RenderedPlot> {
        self.plots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl PlotRenderer for RecordingRenderer {
    fn render(&self, request: &PlotRequest<'_>) -> EvaluationResult<()> {
        let plot = RenderedPlot {
            source: request.source.to_string(),
            shape: request.answers.shape().to_vec(),
            x_ticks: request.x_ticks.clone(),
            y_ticks: request.y_ticks.clone(),
            x_label: request.x_label.to_string(),
            y_label: request.y_label.to_string(),
            output: request.output.clone(),
        };
        self.plots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(plot);
        Ok(())
    }
}

/// Renderer that always fails, for error paths.
pub struct FailingRenderer;

impl PlotRenderer for FailingRenderer {
    fn render(&self, request: &PlotRequest<'_>) -> EvaluationResult<()> {
        Err(EvaluationError::Render(format!(
            "cannot write {}",
            request.output.display()
        )))
    }
}
