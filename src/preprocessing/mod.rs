//! Data preprocessing
//!
//! Min-max scaling fitted independently per column slice. The fitted
//! parameters stay with the [`MinMaxScaler`] so predictions can be
//! mapped back to the original scale.

mod scaler;

pub use scaler::MinMaxScaler;
