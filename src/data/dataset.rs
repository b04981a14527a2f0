//! Dataset assembly and splitting

use crate::data::columns::ColumnRange;
use crate::data::loader::{numeric_slice, read_table};
use crate::error::{PressdropError, Result};
use crate::preprocessing::MinMaxScaler;
use ndarray::Array2;
use std::path::Path;
use tracing::debug;

/// A loaded dataset: raw and normalized input/output slices plus the
/// scalers that produced the normalized versions.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub inputs_raw: Array2<f64>,
    pub outputs_raw: Array2<f64>,
    pub inputs_norm: Array2<f64>,
    pub outputs_norm: Array2<f64>,
    pub scaler_in: MinMaxScaler,
    pub scaler_out: MinMaxScaler,
}

impl Dataset {
    /// Load and preprocess a spreadsheet: read the file, extract the two
    /// column slices, coerce to numeric, drop invalid rows, and fit a
    /// min-max scaler per slice.
    pub fn load(path: &Path, input_cols: &ColumnRange, output_col: usize) -> Result<Self> {
        let df = read_table(path)?;
        Self::from_frame(&df, input_cols, output_col)
    }

    /// Assemble a dataset from an already-loaded frame.
    ///
    /// Rows with missing values are dropped independently in each slice;
    /// a row-count mismatch after filtering means the slices no longer
    /// line up and is rejected rather than silently misaligned.
    pub fn from_frame(
        df: &polars::prelude::DataFrame,
        input_cols: &ColumnRange,
        output_col: usize,
    ) -> Result<Self> {
        let inputs_raw = numeric_slice(df, &input_cols.indices())?;
        let outputs_raw = numeric_slice(df, &[output_col])?;

        if inputs_raw.nrows() != outputs_raw.nrows() {
            return Err(PressdropError::DataError(format!(
                "input slice kept {} rows but output slice kept {}; \
                 missing values do not line up across the two column ranges",
                inputs_raw.nrows(),
                outputs_raw.nrows()
            )));
        }

        debug!(
            rows = inputs_raw.nrows(),
            features = inputs_raw.ncols(),
            "dataset slices extracted"
        );

        let mut scaler_in = MinMaxScaler::new();
        let mut scaler_out = MinMaxScaler::new();
        let inputs_norm = scaler_in.fit_transform(&inputs_raw)?;
        let outputs_norm = scaler_out.fit_transform(&outputs_raw)?;

        Ok(Self {
            inputs_raw,
            outputs_raw,
            inputs_norm,
            outputs_norm,
            scaler_in,
            scaler_out,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.inputs_raw.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.inputs_raw.ncols()
    }

    /// Contiguous train/test split with no shuffling: the first
    /// `train_fraction` of rows train, the rest test.
    pub fn contiguous_split(&self, train_fraction: f64) -> Split {
        let total = self.n_rows();
        let boundary = (total as f64 * train_fraction) as usize;
        Split { boundary, total }
    }
}

/// A contiguous 80/20-style split boundary over dataset rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub boundary: usize,
    pub total: usize,
}

impl Split {
    pub fn train_rows(&self) -> usize {
        self.boundary
    }

    pub fn test_rows(&self) -> usize {
        self.total - self.boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn frame(rows: &[&str]) -> DataFrame {
        // Build a frame the way the CSV reader would: headerless columns.
        let n_cols = rows[0].split(',').count();
        let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); n_cols];
        for row in rows {
            for (c, cell) in row.split(',').enumerate() {
                cells[c].push(cell.trim().parse().ok());
            }
        }
        let columns: Vec<Column> = cells
            .into_iter()
            .enumerate()
            .map(|(i, values)| Series::new(format!("column_{}", i + 1).into(), values).into())
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_from_frame_normalizes() {
        let df = frame(&["1,10,100", "2,20,200", "3,30,300", "4,40,400"]);
        let range = ColumnRange::new(0, 1).unwrap();
        let ds = Dataset::from_frame(&df, &range, 2).unwrap();

        assert_eq!(ds.n_rows(), 4);
        assert_eq!(ds.n_features(), 2);
        for v in ds.inputs_norm.iter().chain(ds.outputs_norm.iter()) {
            assert!((0.0..=1.0).contains(v), "normalized value {v} out of [0, 1]");
        }
    }

    #[test]
    fn test_from_frame_joint_missing_row_dropped() {
        // Row 2 is bad in both slices, so both drop it and stay aligned.
        let df = frame(&["1,10,100", "x,y,z", "3,30,300"]);
        let range = ColumnRange::new(0, 1).unwrap();
        let ds = Dataset::from_frame(&df, &range, 2).unwrap();
        assert_eq!(ds.n_rows(), 2);
    }

    #[test]
    fn test_from_frame_misaligned_slices_rejected() {
        // Row 2 is bad only in the input slice, leaving the two slices
        // with different row counts after filtering.
        let df = frame(&["1,10,100", "x,20,200", "3,30,300"]);
        let range = ColumnRange::new(0, 1).unwrap();
        let err = Dataset::from_frame(&df, &range, 2).unwrap_err();
        assert!(err.to_string().contains("do not line up"));
    }

    #[test]
    fn test_contiguous_split() {
        let df = frame(&["1,1", "2,2", "3,3", "4,4", "5,5", "6,6", "7,7", "8,8", "9,9", "10,10"]);
        let range = ColumnRange::new(0, 0).unwrap();
        let ds = Dataset::from_frame(&df, &range, 1).unwrap();

        let split = ds.contiguous_split(0.8);
        assert_eq!(split.train_rows(), 8);
        assert_eq!(split.test_rows(), 2);
    }
}
