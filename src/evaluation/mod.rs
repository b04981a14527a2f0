//! Model evaluation
//!
//! Inverse-transforms predictions back to the original scale and
//! computes RMSE, R², and a tolerance-based accuracy over the test
//! split.

use crate::data::{Dataset, Split};
use crate::error::{PressdropError, Result};
use crate::training::ResidualNet;
use ndarray::{s, Array1, Axis};
use serde::Serialize;

/// RMSE and R² for one split
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SplitMetrics {
    pub rmse: f64,
    pub r2: f64,
}

impl SplitMetrics {
    /// Compute both metrics against un-normalized ground truth.
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let n = y_true.len() as f64;
        if n == 0.0 {
            return Self { rmse: 0.0, r2: 0.0 };
        }

        let mse: f64 = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| (t - p).powi(2))
            .sum::<f64>()
            / n;

        let y_mean: f64 = y_true.iter().sum::<f64>() / n;
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| (t - p).powi(2))
            .sum();

        Self {
            rmse: mse.sqrt(),
            r2: if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 },
        }
    }
}

/// Percentage of predictions within `tolerance` relative error of the
/// true value. A zero-truth row cannot produce a relative error, so it
/// counts as within tolerance only when the prediction is also zero.
pub fn tolerance_accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>, tolerance: f64) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }

    let within = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| {
            if **t == 0.0 {
                **p == 0.0
            } else {
                ((*p - *t) / *t).abs() <= tolerance
            }
        })
        .count();

    within as f64 / y_true.len() as f64 * 100.0
}

/// Everything the evaluator produces for the final report.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub train_predictions: Vec<f64>,
    pub test_predictions: Vec<f64>,
    pub train: SplitMetrics,
    pub test: SplitMetrics,
    pub accuracy: f64,
}

/// Apply the trained model to both splits, map predictions back to the
/// original scale, and compute all metrics.
pub fn evaluate(net: &ResidualNet, dataset: &Dataset, split: &Split) -> Result<Evaluation> {
    if split.test_rows() == 0 {
        return Err(PressdropError::EvaluationError(
            "test split is empty; not enough rows for an 80/20 split".to_string(),
        ));
    }

    let b = split.boundary;
    let train_pred = predict_original_scale(net, dataset, 0, b)?;
    let test_pred = predict_original_scale(net, dataset, b, split.total)?;

    let train_truth = dataset.outputs_raw.slice(s![..b, 0]).to_owned();
    let test_truth = dataset.outputs_raw.slice(s![b.., 0]).to_owned();

    let train = SplitMetrics::compute(&train_truth, &train_pred);
    let test = SplitMetrics::compute(&test_truth, &test_pred);
    let accuracy = tolerance_accuracy(&test_truth, &test_pred, 0.1);

    Ok(Evaluation {
        train_predictions: train_pred.to_vec(),
        test_predictions: test_pred.to_vec(),
        train,
        test,
        accuracy,
    })
}

fn predict_original_scale(
    net: &ResidualNet,
    dataset: &Dataset,
    from: usize,
    to: usize,
) -> Result<Array1<f64>> {
    let x = dataset.inputs_norm.slice(s![from..to, ..]).to_owned();
    let pred_norm = net.predict(&x).insert_axis(Axis(1));
    let pred = dataset.scaler_out.inverse_transform(&pred_norm)?;
    Ok(pred.column(0).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_split_metrics_perfect_fit() {
        let y = array![1.0, 2.0, 3.0, 4.0];
        let m = SplitMetrics::compute(&y, &y);
        assert!(m.rmse.abs() < 1e-12);
        assert!((m.r2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_split_metrics_known_values() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![2.0, 2.0, 2.0];
        let m = SplitMetrics::compute(&y_true, &y_pred);

        // MSE = (1 + 0 + 1) / 3; ss_tot = 2 -> r2 = 0
        assert!((m.rmse - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!(m.r2.abs() < 1e-12);
    }

    #[test]
    fn test_constant_truth_r2_is_zero() {
        let y_true = array![5.0, 5.0, 5.0];
        let y_pred = array![4.0, 5.0, 6.0];
        let m = SplitMetrics::compute(&y_true, &y_pred);
        assert_eq!(m.r2, 0.0);
    }

    #[test]
    fn test_tolerance_accuracy_bounds() {
        let y_true = array![100.0, 200.0, 300.0, 400.0];
        let y_pred = array![105.0, 230.0, 295.0, 500.0];
        // 5% in, 15% out, ~1.7% in, 25% out -> 50%
        let acc = tolerance_accuracy(&y_true, &y_pred, 0.1);
        assert_eq!(acc, 50.0);
    }

    #[test]
    fn test_tolerance_accuracy_zero_truth_does_not_crash() {
        let y_true = array![0.0, 0.0, 10.0];
        let y_pred = array![0.5, 0.0, 10.5];
        let acc = tolerance_accuracy(&y_true, &y_pred, 0.1);
        assert!(acc.is_finite());
        assert!((0.0..=100.0).contains(&acc));
        // Only the exact zero and the 5%-off row count
        assert!((acc - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_tolerance_accuracy_empty() {
        let empty = Array1::zeros(0);
        assert_eq!(tolerance_accuracy(&empty, &empty, 0.1), 0.0);
    }
}
