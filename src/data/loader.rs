//! Spreadsheet readers and numeric slice extraction

use crate::error::{PressdropError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use ndarray::Array2;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Read a tabular file into a headerless DataFrame, dispatching on the
/// file extension. Unknown extensions fall back to CSV.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "tsv" => read_delimited(path, b'\t'),
        _ => read_delimited(path, b','),
    }
}

/// Load a delimited text file. Columns are named `column_1`, `column_2`, ...
/// since the input carries no header row. Unparsable cells become nulls.
fn read_delimited(path: &Path, separator: u8) -> Result<DataFrame> {
    let file = File::open(path)
        .map_err(|e| PressdropError::DataError(format!("cannot read {}: {e}", path.display())))?;

    let parse_opts = CsvParseOptions::default().with_separator(separator);

    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_ignore_errors(true)
        .with_infer_schema_length(Some(100))
        .with_parse_options(parse_opts)
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| PressdropError::DataError(e.to_string()))?;

    Ok(df)
}

/// Load the first sheet of a workbook.
fn read_workbook(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| PressdropError::DataError(format!("cannot read {}: {e}", path.display())))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PressdropError::DataError("workbook has no sheets".to_string()))?
        .map_err(|e| PressdropError::DataError(e.to_string()))?;

    range_to_frame(&range)
}

/// Convert a sheet range into a headerless DataFrame. Column naming
/// matches the CSV path so downstream errors read the same for either
/// format; cells that do not coerce to a number become nulls.
fn range_to_frame(range: &Range<Data>) -> Result<DataFrame> {
    let height = range.height();
    let width = range.width();

    let mut cells: Vec<Vec<Option<f64>>> = (0..width)
        .map(|_| Vec::with_capacity(height))
        .collect();

    for row in range.rows() {
        for (c, column) in cells.iter_mut().enumerate() {
            column.push(row.get(c).and_then(cell_to_f64));
        }
    }

    let columns: Vec<Column> = cells
        .into_iter()
        .enumerate()
        .map(|(i, values)| Series::new(format!("column_{}", i + 1).into(), values).into())
        .collect();

    DataFrame::new(columns).map_err(|e| PressdropError::DataError(e.to_string()))
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(v) => Some(*v),
        Data::Int(v) => Some(*v as f64),
        Data::String(s) => s.trim().parse().ok(),
        Data::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => Some(dt.as_f64()),
        _ => None,
    }
}

/// Extract the given columns as a numeric matrix. Cells are coerced to
/// f64 (non-numeric becomes missing) and any row containing a missing
/// value is dropped. Errors when a column index is out of range or no
/// valid rows remain.
pub fn numeric_slice(df: &DataFrame, indices: &[usize]) -> Result<Array2<f64>> {
    let mut columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(indices.len());

    for &idx in indices {
        let column = df.select_at_idx(idx).ok_or_else(|| {
            PressdropError::InvalidColumn(format!(
                "column {} out of range (file has {} columns)",
                idx + 1,
                df.width()
            ))
        })?;

        let casted = column
            .cast(&DataType::Float64)
            .map_err(|e| PressdropError::DataError(e.to_string()))?;
        let values: Vec<Option<f64>> = casted
            .as_materialized_series()
            .f64()
            .map_err(|e| PressdropError::DataError(e.to_string()))?
            .into_iter()
            .collect();

        columns.push(values);
    }

    let mut kept: Vec<f64> = Vec::new();
    let mut n_rows = 0;
    'rows: for r in 0..df.height() {
        let mut row = Vec::with_capacity(indices.len());
        for column in &columns {
            match column[r] {
                Some(v) if v.is_finite() => row.push(v),
                _ => continue 'rows,
            }
        }
        kept.extend(row);
        n_rows += 1;
    }

    if n_rows == 0 {
        return Err(PressdropError::DataError(
            "no valid numeric rows in selected columns".to_string(),
        ));
    }

    Ok(Array2::from_shape_vec((n_rows, indices.len()), kept)?)
}
