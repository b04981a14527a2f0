//! Integration test: full pipeline (load -> train -> evaluate -> report)

use pressdrop::pipeline::{run_to_json, PipelineConfig};
use pressdrop::training::TrainingConfig;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write a headerless 17-column CSV shaped like the production input:
/// features in H..O (indices 7..=14), output in Q (index 16).
fn write_well_test_csv(n_rows: usize, output: impl Fn(usize, &[f64]) -> f64) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();

    for i in 0..n_rows {
        let features: Vec<f64> = (0..8)
            .map(|j| (i as f64 + 1.0) * (j as f64 + 1.0) * 0.5 + (i as f64 * 0.37 + j as f64).sin())
            .collect();
        let q = output(i, &features);

        let mut cells: Vec<String> = (0..17).map(|c| (c as f64).to_string()).collect();
        for (j, f) in features.iter().enumerate() {
            cells[7 + j] = f.to_string();
        }
        cells[16] = q.to_string();

        writeln!(file, "{}", cells.join(",")).unwrap();
    }

    file
}

fn fast_config() -> PipelineConfig {
    PipelineConfig {
        training: TrainingConfig {
            max_epochs: 120,
            random_state: Some(42),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn run_json(path: &Path, config: &PipelineConfig) -> Value {
    serde_json::from_str(&run_to_json(path, config)).expect("output is valid JSON")
}

#[test]
fn test_well_formed_input_produces_full_report() {
    let file = write_well_test_csv(50, |_, f| 40.0 + 2.0 * f[0] + 0.8 * f[3] - 0.5 * f[7]);
    let report = run_json(file.path(), &fast_config());

    let obj = report.as_object().unwrap();
    assert!(!obj.contains_key("error"), "unexpected error: {report}");
    assert!(obj.contains_key("predictions"));
    assert!(obj.contains_key("metrics"));
    assert!(obj.contains_key("graphs"));
}

#[test]
fn test_prediction_lengths_match_split_sizes() {
    let file = write_well_test_csv(50, |_, f| 40.0 + 2.0 * f[0] + 0.8 * f[3]);
    let report = run_json(file.path(), &fast_config());

    // 50 rows -> 40 train, 10 test
    let train = report["predictions"]["train"].as_array().unwrap();
    let test = report["predictions"]["test"].as_array().unwrap();
    assert_eq!(train.len(), 40);
    assert_eq!(test.len(), 10);
}

#[test]
fn test_metric_keys_and_accuracy_bounds() {
    let file = write_well_test_csv(50, |_, f| 40.0 + 2.0 * f[0] + 0.8 * f[3]);
    let report = run_json(file.path(), &fast_config());

    let metrics = report["metrics"].as_object().unwrap();
    for key in ["train_rmse", "EA(Max)", "train_r2", "EA(Min)", "accuracy"] {
        assert!(metrics.contains_key(key), "missing metric {key}");
    }

    let accuracy = metrics["accuracy"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&accuracy), "accuracy {accuracy} out of range");
}

#[test]
fn test_graphs_contain_five_base64_pngs() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let file = write_well_test_csv(50, |_, f| 40.0 + 2.0 * f[0]);
    let report = run_json(file.path(), &fast_config());

    let graphs = report["graphs"].as_object().unwrap();
    assert_eq!(graphs.len(), 5);
    for key in ["gas_flow", "water_flow", "oil_flow", "length", "diameter"] {
        let encoded = graphs[key].as_str().unwrap();
        let bytes = STANDARD.decode(encoded).expect("valid base64");
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}

#[test]
fn test_nonexistent_file_yields_only_error_key() {
    let report = run_json(Path::new("/does/not/exist.xlsx"), &fast_config());

    let obj = report.as_object().unwrap();
    assert_eq!(obj.len(), 1, "error output must carry no other keys");
    assert!(obj["error"].as_str().unwrap().len() > 0);
}

#[test]
fn test_all_zero_output_column_does_not_crash() {
    let file = write_well_test_csv(50, |_, _| 0.0);
    let report = run_json(file.path(), &fast_config());

    let obj = report.as_object().unwrap();
    assert!(!obj.contains_key("error"), "unexpected error: {report}");

    let accuracy = report["metrics"]["accuracy"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&accuracy));
}

#[test]
fn test_too_few_columns_is_reported_as_error() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "1,2,3").unwrap();
    writeln!(file, "4,5,6").unwrap();

    let report = run_json(file.path(), &fast_config());
    let obj = report.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert!(obj["error"].as_str().unwrap().contains("out of range"));
}
