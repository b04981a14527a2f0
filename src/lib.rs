//! Pressdrop - Pressure-drop regression for well-test spreadsheets
//!
//! A single-shot analysis pipeline: load tabular well-test data from a
//! spreadsheet, fit a residual feed-forward network to predict pipeline
//! pressure drop, compute regression metrics, render illustrative trend
//! charts, and emit one JSON report on stdout.
//!
//! # Modules
//!
//! - [`data`] - Spreadsheet loading, column selection, row filtering
//! - [`preprocessing`] - Min-max feature scaling
//! - [`training`] - Residual network definition and training
//! - [`evaluation`] - Regression metrics and tolerance accuracy
//! - [`plots`] - Synthetic trend charts as base64 PNGs
//! - [`pipeline`] - End-to-end orchestration and the JSON report

// Core error handling
pub mod error;

// Pipeline stages
pub mod data;
pub mod preprocessing;
pub mod training;
pub mod evaluation;
pub mod plots;
pub mod pipeline;

pub use error::{PressdropError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::data::{column_index, ColumnRange, Dataset, Split};
    pub use crate::error::{PressdropError, Result};
    pub use crate::evaluation::{evaluate, Evaluation, SplitMetrics};
    pub use crate::pipeline::{run, run_to_json, AnalysisReport, PipelineConfig};
    pub use crate::plots::generate_graphs;
    pub use crate::preprocessing::MinMaxScaler;
    pub use crate::training::{ResidualNet, Trainer, TrainingConfig};
}
