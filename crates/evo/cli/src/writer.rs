//! Plot requests persisted as JSON next to where the image would go.

use evo_evaluation::{EvaluationError, EvaluationResult, PlotRenderer, PlotRequest};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct PlotDocument<'a> {
    source: &'a str,
    x_label: &'a str,
    y_label: &'a str,
    x_ticks: &'a [String],
    y_ticks: &'a [String],
    shape: &'a [usize],
    /// Row-major answer codes; `null` where no outcome was reported.
    answers: Vec<Option<i32>>,
}

/// Writes each request to `<image path>.json` for an external plotting tool.
#[derive(Debug, Default)]
pub struct JsonPlotWriter;

impl JsonPlotWriter {
    pub fn document_path(request: &PlotRequest<'_>) -> PathBuf {
        request.output.with_extension("json")
    }
}

impl PlotRenderer for JsonPlotWriter {
    fn render(&self, request: &PlotRequest<'_>) -> EvaluationResult<()> {
        let path = Self::document_path(request);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EvaluationError::Render(format!("{}: {}", parent.display(), e)))?;
        }

        let document = PlotDocument {
            source: request.source,
            x_label: request.x_label,
            y_label: request.y_label,
            x_ticks: &request.x_ticks,
            y_ticks: &request.y_ticks,
            shape: request.answers.shape(),
            answers: request.answers.iter().copied().collect(),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| EvaluationError::Render(e.to_string()))?;
        std::fs::write(&path, json)
            .map_err(|e| EvaluationError::Render(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "plot request written");
        Ok(())
    }
}
