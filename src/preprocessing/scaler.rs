//! Min-max feature scaling

use crate::error::{PressdropError, Result};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Parameters for one fitted column
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ColumnParams {
    min: f64,
    range: f64,
}

/// Min-max scaler: rescales each column to [0, 1] using its observed
/// minimum and maximum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinMaxScaler {
    params: Vec<ColumnParams>,
    is_fitted: bool,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit per-column min/max to the data.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(PressdropError::PreprocessingError(
                "cannot fit scaler on empty data".to_string(),
            ));
        }

        self.params = x
            .axis_iter(Axis(1))
            .map(|column| {
                let min = column.iter().copied().fold(f64::INFINITY, f64::min);
                let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let range = max - min;
                ColumnParams {
                    min,
                    // Constant columns scale by 1.0 so transform is a pure shift
                    range: if range == 0.0 { 1.0 } else { range },
                }
            })
            .collect();

        self.is_fitted = true;
        Ok(self)
    }

    /// Rescale each column to [0, 1] using the fitted parameters.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x)?;

        let mut out = x.clone();
        for (mut column, params) in out.axis_iter_mut(Axis(1)).zip(&self.params) {
            column.mapv_inplace(|v| (v - params.min) / params.range);
        }
        Ok(out)
    }

    /// Fit and transform in one step.
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Map normalized values back to the original scale.
    pub fn inverse_transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x)?;

        let mut out = x.clone();
        for (mut column, params) in out.axis_iter_mut(Axis(1)).zip(&self.params) {
            column.mapv_inplace(|v| v * params.range + params.min);
        }
        Ok(out)
    }

    pub fn n_features(&self) -> usize {
        self.params.len()
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<()> {
        if !self.is_fitted {
            return Err(PressdropError::ScalerNotFitted);
        }
        if x.ncols() != self.params.len() {
            return Err(PressdropError::ShapeError {
                expected: format!("{} columns", self.params.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }
        Ok(())
    }
}
