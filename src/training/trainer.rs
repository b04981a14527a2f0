//! Training loop with early stopping

use crate::error::{PressdropError, Result};
use crate::training::adam::Adam;
use crate::training::network::ResidualNet;
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Adam learning rate
    pub learning_rate: f64,
    /// Maximum number of epochs
    pub max_epochs: usize,
    /// Minibatch size
    pub batch_size: usize,
    /// Early stopping patience, in epochs without validation improvement
    pub patience: usize,
    /// Random seed for weight init and minibatch shuffling
    pub random_state: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            max_epochs: 1000,
            batch_size: 32,
            patience: 50,
            random_state: None,
        }
    }
}

/// What the fit loop actually did
#[derive(Debug, Clone, Copy)]
pub struct TrainingSummary {
    pub epochs_run: usize,
    pub best_val_loss: Option<f64>,
}

/// Fits a [`ResidualNet`] with Adam + MSE, monitoring validation loss
/// and restoring the best-seen weights. Synchronous and blocking for
/// the duration of the run.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train on `(x_train, y_train)`, validating on `(x_val, y_val)`.
    /// With an empty validation split, runs all epochs without early
    /// stopping.
    pub fn fit(
        &self,
        net: &mut ResidualNet,
        x_train: &Array2<f64>,
        y_train: &Array1<f64>,
        x_val: &Array2<f64>,
        y_val: &Array1<f64>,
    ) -> Result<TrainingSummary> {
        let n_train = x_train.nrows();
        if n_train == 0 {
            return Err(PressdropError::TrainingError(
                "empty training split".to_string(),
            ));
        }
        if n_train != y_train.len() {
            return Err(PressdropError::ShapeError {
                expected: format!("{n_train} targets"),
                actual: format!("{} targets", y_train.len()),
            });
        }
        if x_train.ncols() != net.n_features() {
            return Err(PressdropError::ShapeError {
                expected: format!("{} features", net.n_features()),
                actual: format!("{} features", x_train.ncols()),
            });
        }

        let mut rng = match self.config.random_state {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        let mut adam = Adam::new(self.config.learning_rate, net);
        let mut best: Option<(ResidualNet, f64)> = None;
        let mut patience_counter = 0;
        let mut epochs_run = 0;

        for epoch in 0..self.config.max_epochs {
            epochs_run = epoch + 1;

            let mut indices: Vec<usize> = (0..n_train).collect();
            indices.shuffle(&mut rng);

            for batch_start in (0..n_train).step_by(self.config.batch_size) {
                let batch_end = (batch_start + self.config.batch_size).min(n_train);
                let batch = &indices[batch_start..batch_end];

                let x_batch = gather_rows(x_train, batch);
                let y_batch: Array1<f64> = batch.iter().map(|&i| y_train[i]).collect();

                let cache = net.forward(&x_batch);
                let grads = net.backward(&x_batch, &y_batch, &cache);
                adam.step(net.layers_mut(), &grads);
            }

            if !y_val.is_empty() {
                let val_loss = mean_squared_error(y_val, &net.predict(x_val));
                if epoch % 100 == 0 {
                    debug!(epoch, val_loss, "training progress");
                }

                let improved = best.as_ref().map_or(true, |(_, b)| val_loss < *b);
                if improved {
                    best = Some((net.clone(), val_loss));
                    patience_counter = 0;
                } else {
                    patience_counter += 1;
                    if patience_counter >= self.config.patience {
                        debug!(epoch, "early stopping");
                        break;
                    }
                }
            }
        }

        // Restore the best-seen weights
        match best {
            Some((state, loss)) => {
                *net = state;
                Ok(TrainingSummary {
                    epochs_run,
                    best_val_loss: Some(loss),
                })
            }
            None => Ok(TrainingSummary {
                epochs_run,
                best_val_loss: None,
            }),
        }
    }
}

fn gather_rows(x: &Array2<f64>, indices: &[usize]) -> Array2<f64> {
    let n_cols = x.ncols();
    let mut rows = Vec::with_capacity(indices.len() * n_cols);
    for &i in indices {
        rows.extend(x.row(i).iter().copied());
    }
    // Shape follows directly from the index count
    Array2::from_shape_vec((indices.len(), n_cols), rows).unwrap()
}

fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / y_true.len() as f64
}
