//! Pressdrop - Main Entry Point
//!
//! One-shot pressure-drop analysis: train on a spreadsheet, print one
//! JSON report to stdout. Errors are reported inside the JSON document
//! rather than through the exit code; logs go to stderr.

use clap::Parser;
use pressdrop::data::{column_index, ColumnRange};
use pressdrop::pipeline::{run_to_json, PipelineConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pressdrop")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Residual-network pressure-drop regression for well-test spreadsheets")]
struct Cli {
    /// Input spreadsheet (XLSX, XLS, CSV, or TSV)
    input: Option<PathBuf>,

    /// Input feature columns as an Excel letter range
    #[arg(long, default_value = "H:O")]
    input_cols: String,

    /// Output column as an Excel letter
    #[arg(long, default_value = "Q")]
    output_col: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pressdrop=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(input) = cli.input.as_deref() else {
        println!("{}", serde_json::json!({ "error": "input file path required" }));
        return;
    };

    let output = match build_config(&cli) {
        Ok(config) => run_to_json(input, &config),
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    };
    println!("{output}");
}

fn build_config(cli: &Cli) -> pressdrop::Result<PipelineConfig> {
    Ok(PipelineConfig {
        input_cols: ColumnRange::parse(&cli.input_cols)?,
        output_col: column_index(&cli.output_col)?,
        ..Default::default()
    })
}
