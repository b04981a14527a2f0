//! End-to-end orchestration
//!
//! Sequences load -> split -> train -> evaluate -> plot, assembles the
//! single JSON report, and converts any failure along the way into an
//! error-flagged JSON document instead of crashing.

use crate::data::{ColumnRange, Dataset};
use crate::error::Result;
use crate::evaluation::evaluate;
use crate::plots::generate_graphs;
use crate::training::{ResidualNet, Trainer, TrainingConfig};
use ndarray::s;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Pipeline configuration: which columns to read and how to train.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Input feature columns (Excel letters), default H:O
    pub input_cols: ColumnRange,
    /// Output column (zero-based index), default Q
    pub output_col: usize,
    /// Fraction of rows in the contiguous training split
    pub train_fraction: f64,
    pub training: TrainingConfig,
    /// Seed for the synthetic demonstration charts
    pub plot_seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            // H through O; parse of a literal range cannot fail
            input_cols: ColumnRange::new(7, 14).unwrap_or_else(|_| unreachable!()),
            output_col: 16, // column Q
            train_fraction: 0.8,
            training: TrainingConfig::default(),
            plot_seed: 42,
        }
    }
}

/// Train/test prediction arrays, in original output scale.
#[derive(Debug, Clone, Serialize)]
pub struct Predictions {
    pub train: Vec<f64>,
    pub test: Vec<f64>,
}

/// Scalar metrics. The two test-split keys keep their historical
/// mislabels for output compatibility with existing consumers.
#[derive(Debug, Clone, Serialize)]
pub struct MetricSet {
    pub train_rmse: f64,
    #[serde(rename = "EA(Max)")]
    pub test_rmse: f64,
    pub train_r2: f64,
    #[serde(rename = "EA(Min)")]
    pub test_r2: f64,
    pub accuracy: f64,
}

/// The sole externally visible artifact of one run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub predictions: Predictions,
    pub metrics: MetricSet,
    pub graphs: BTreeMap<String, String>,
}

/// Run the full pipeline against one input file.
pub fn run(path: &Path, config: &PipelineConfig) -> Result<AnalysisReport> {
    info!(path = %path.display(), "loading dataset");
    let dataset = Dataset::load(path, &config.input_cols, config.output_col)?;
    info!(
        rows = dataset.n_rows(),
        features = dataset.n_features(),
        "dataset ready"
    );

    let split = dataset.contiguous_split(config.train_fraction);
    let b = split.boundary;

    let x_train = dataset.inputs_norm.slice(s![..b, ..]).to_owned();
    let y_train = dataset.outputs_norm.slice(s![..b, 0]).to_owned();
    let x_test = dataset.inputs_norm.slice(s![b.., ..]).to_owned();
    let y_test = dataset.outputs_norm.slice(s![b.., 0]).to_owned();

    let mut net = ResidualNet::new(dataset.n_features(), config.training.random_state);
    let summary = Trainer::new(config.training.clone()).fit(
        &mut net, &x_train, &y_train, &x_test, &y_test,
    )?;
    info!(
        epochs = summary.epochs_run,
        best_val_loss = summary.best_val_loss,
        "training complete"
    );

    let eval = evaluate(&net, &dataset, &split)?;
    let graphs = generate_graphs(config.plot_seed)?;

    Ok(AnalysisReport {
        predictions: Predictions {
            train: eval.train_predictions,
            test: eval.test_predictions,
        },
        metrics: MetricSet {
            train_rmse: eval.train.rmse,
            test_rmse: eval.test.rmse,
            train_r2: eval.train.r2,
            test_r2: eval.test.r2,
            accuracy: eval.accuracy,
        },
        graphs,
    })
}

/// Run the pipeline and serialize the outcome. The single catch-all
/// boundary: any error anywhere becomes `{"error": "..."}`.
pub fn run_to_json(path: &Path, config: &PipelineConfig) -> String {
    let outcome = run(path, config)
        .and_then(|report| serde_json::to_string(&report).map_err(Into::into));

    match outcome {
        Ok(json) => json,
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}
