//! Model definition and training
//!
//! A fixed-topology residual feed-forward network trained with Adam and
//! mean-squared-error loss, with early stopping on a validation split.

mod adam;
mod network;
mod trainer;

pub use network::{ResidualNet, HIDDEN_WIDTH};
pub use trainer::{Trainer, TrainingConfig, TrainingSummary};
