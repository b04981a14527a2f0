//! Data loading and dataset assembly
//!
//! Reads a spreadsheet (XLSX/XLS via calamine, CSV/TSV via polars),
//! extracts input and output column slices addressed by Excel letters,
//! coerces cells to numeric, drops rows with missing values, and
//! produces raw plus min-max-normalized matrices.

mod columns;
mod dataset;
mod loader;

pub use columns::{column_index, ColumnRange};
pub use dataset::{Dataset, Split};
pub use loader::{numeric_slice, read_table};
