use crate::output::{structured, table, OutputFormat};
use crate::writer::JsonPlotWriter;
use anyhow::Context;
use clap::Args;
use evo_evaluation::{AnswerCodeTable, CombinationRecord, Direction, EvoStep, SourceSummary};
use evo_factor::{ExperimentConfig, FactorSet, GridSnapshot, RationalGrid};
use std::path::{Path, PathBuf};
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct FactorsArgs {
    /// Experiment configuration (.toml, .yaml or .json)
    #[arg(short, long, env = "EVOGRID_CONFIG")]
    pub config: PathBuf,

    /// Active parameters, comma separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub params: Vec<String>,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Experiment configuration (.toml, .yaml or .json)
    #[arg(short, long, env = "EVOGRID_CONFIG")]
    pub config: PathBuf,

    /// Active parameters, comma separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub params: Vec<String>,

    /// JSON array of combination records
    #[arg(short, long)]
    pub records: PathBuf,

    /// JSON object mapping status to answer code
    #[arg(long)]
    pub codes: Option<PathBuf>,

    /// Refinement iteration number
    #[arg(long, default_value_t = 0)]
    pub iteration: u32,

    /// Refinement direction (both, up, down)
    #[arg(long, default_value = "both")]
    pub direction: Direction,

    /// Benchmark root; figures go under <root>/figures
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Write the plot request for a two-parameter step
    #[arg(long)]
    pub plot: bool,
}

/// Table row for grid display
#[derive(Debug, Tabled)]
struct GridRow {
    parameter: String,
    start: String,
    end: String,
    levels: usize,
    step: String,
    #[tabled(rename = "min step")]
    min_step: String,
}

impl From<&RationalGrid> for GridRow {
    fn from(grid: &RationalGrid) -> Self {
        Self {
            parameter: grid.kind().to_string(),
            start: grid.start().to_string(),
            end: grid.end().to_string(),
            levels: grid.level_count(),
            step: grid.step().to_string(),
            min_step: grid
                .minimum_step()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".into()),
        }
    }
}

/// Table row for per-source totals
#[derive(Debug, Tabled)]
struct SourceRow {
    source: String,
    solved: u32,
    /// Answered cells over all cells
    answered: String,
    coverage: String,
}

impl From<&SourceSummary> for SourceRow {
    fn from(s: &SourceSummary) -> Self {
        let ratio = if s.cells == 0 {
            0.0
        } else {
            s.answered as f64 / s.cells as f64
        };
        Self {
            source: s.source.clone(),
            solved: s.solved,
            answered: format!("{}/{}", s.answered, s.cells),
            coverage: format!("{:.1}%", ratio * 100.0),
        }
    }
}

pub fn factors(args: FactorsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let set = FactorSet::build(&args.params, &config)?;

    match format {
        OutputFormat::Table => {
            println!("{}", table(set.iter().map(GridRow::from).collect()));
            for grid in &set {
                println!("{}", grid);
            }
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let snapshots: Vec<GridSnapshot> = set.iter().map(|g| g.snapshot()).collect();
            println!("{}", structured(&snapshots, format)?);
        }
    }
    Ok(())
}

pub fn evaluate(args: EvaluateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let records = load_records(&args.records)?;
    let codes = match &args.codes {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading answer codes {}", path.display()))?;
            AnswerCodeTable::from_json_str(&contents)?
        }
        None => AnswerCodeTable::standard(),
    };

    let mut step = EvoStep::new(&config, &args.params, args.direction, args.iteration)?;
    let summaries = step
        .evaluate(&records, &codes)
        .context("aggregating verification outcomes")?
        .summaries();

    let figure = if args.plot {
        Some(step.plot(&JsonPlotWriter, &args.root)?)
    } else {
        None
    };

    match format {
        OutputFormat::Table => {
            print!("{}", step);
            println!("{}", table(summaries.iter().map(SourceRow::from).collect()));
        }
        OutputFormat::Json | OutputFormat::Yaml => println!("{}", structured(&summaries, format)?),
    }

    if let Some(image) = figure {
        eprintln!("plot request written to {}", image.with_extension("json").display());
    }
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<ExperimentConfig> {
    ExperimentConfig::load(path).with_context(|| format!("loading config {}", path.display()))
}

fn load_records(path: &Path) -> anyhow::Result<Vec<CombinationRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading records {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing records {}", path.display()))
}
