//! Residual feed-forward network
//!
//! Fixed topology: dense(k -> 200) + ReLU, two residual blocks (each
//! dense(200 -> 200) -> ReLU -> dense(200 -> 200) -> add skip -> ReLU),
//! and a linear dense(200 -> 1) output. Widths are hard-coded; only the
//! input width follows the feature count.

use ndarray::{Array1, Array2, Axis};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Hidden width of every dense layer in the network
pub const HIDDEN_WIDTH: usize = 200;

/// One dense layer: weight matrix (n_in x n_out) plus bias row.
#[derive(Debug, Clone)]
pub(crate) struct DenseLayer {
    pub weight: Array2<f64>,
    pub bias: Array1<f64>,
}

impl DenseLayer {
    fn glorot(n_in: usize, n_out: usize, rng: &mut Xoshiro256PlusPlus) -> Self {
        // Xavier/Glorot uniform initialization
        let scale = (2.0 / (n_in + n_out) as f64).sqrt();
        let weights: Vec<f64> = (0..n_in * n_out)
            .map(|_| rng.gen::<f64>() * 2.0 * scale - scale)
            .collect();

        Self {
            // Shape is (n_in, n_out) by construction
            weight: Array2::from_shape_vec((n_in, n_out), weights).unwrap(),
            bias: Array1::zeros(n_out),
        }
    }

    fn forward(&self, x: &Array2<f64>) -> Array2<f64> {
        x.dot(&self.weight) + &self.bias
    }
}

/// One residual block: f(x) = ReLU(x + second(ReLU(first(x))))
#[derive(Debug, Clone)]
pub(crate) struct ResidualBlock {
    pub first: DenseLayer,
    pub second: DenseLayer,
}

pub(crate) struct BlockCache {
    z_first: Array2<f64>,
    h: Array2<f64>,
    sum: Array2<f64>,
    pub out: Array2<f64>,
}

/// Full forward pass with the intermediates backpropagation needs.
pub(crate) struct ForwardCache {
    input_z: Array2<f64>,
    input_a: Array2<f64>,
    blocks: [BlockCache; 2],
    pub output: Array2<f64>,
}

/// Per-layer gradients in the canonical parameter order.
pub(crate) struct LayerGrad {
    pub weight: Array2<f64>,
    pub bias: Array1<f64>,
}

/// Gradients for all six dense layers, ordered: input, block-1 first,
/// block-1 second, block-2 first, block-2 second, output.
pub(crate) struct NetGradients {
    pub layers: [LayerGrad; 6],
}

/// The residual regression network.
#[derive(Debug, Clone)]
pub struct ResidualNet {
    input: DenseLayer,
    blocks: [ResidualBlock; 2],
    output: DenseLayer,
    n_features: usize,
}

impl ResidualNet {
    /// Build a freshly initialized network for `n_features` inputs.
    pub fn new(n_features: usize, random_state: Option<u64>) -> Self {
        let mut rng = match random_state {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        let block = |rng: &mut Xoshiro256PlusPlus| ResidualBlock {
            first: DenseLayer::glorot(HIDDEN_WIDTH, HIDDEN_WIDTH, rng),
            second: DenseLayer::glorot(HIDDEN_WIDTH, HIDDEN_WIDTH, rng),
        };

        Self {
            input: DenseLayer::glorot(n_features, HIDDEN_WIDTH, &mut rng),
            blocks: [block(&mut rng), block(&mut rng)],
            output: DenseLayer::glorot(HIDDEN_WIDTH, 1, &mut rng),
            n_features,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Predict one output per input row.
    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        self.forward(x).output.column(0).to_owned()
    }

    pub(crate) fn forward(&self, x: &Array2<f64>) -> ForwardCache {
        let input_z = self.input.forward(x);
        let input_a = relu(&input_z);

        let mut prev = input_a.clone();
        let mut caches = Vec::with_capacity(2);
        for block in &self.blocks {
            let z_first = block.first.forward(&prev);
            let h = relu(&z_first);
            let sum = block.second.forward(&h) + &prev;
            let out = relu(&sum);
            prev = out.clone();
            caches.push(BlockCache { z_first, h, sum, out });
        }

        let output = self.output.forward(&prev);

        let b1 = caches.remove(0);
        let b2 = caches.remove(0);
        ForwardCache {
            input_z,
            input_a,
            blocks: [b1, b2],
            output,
        }
    }

    /// Backpropagate the MSE gradient through the network.
    pub(crate) fn backward(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        cache: &ForwardCache,
    ) -> NetGradients {
        let n = y.len() as f64;
        let y_col = y.view().insert_axis(Axis(1));

        // Output layer: d(MSE)/d(yhat)
        let delta = (&cache.output - &y_col) / n;
        let g_out = LayerGrad {
            weight: cache.blocks[1].out.t().dot(&delta),
            bias: delta.sum_axis(Axis(0)),
        };
        let mut d = delta.dot(&self.output.weight.t());

        // Residual blocks, in reverse
        let mut block_grads = Vec::with_capacity(4);
        for i in (0..2).rev() {
            let block = &self.blocks[i];
            let bc = &cache.blocks[i];
            let a_prev = if i == 0 {
                &cache.input_a
            } else {
                &cache.blocks[i - 1].out
            };

            let d_sum = &d * &relu_mask(&bc.sum);
            let g_second = LayerGrad {
                weight: bc.h.t().dot(&d_sum),
                bias: d_sum.sum_axis(Axis(0)),
            };

            let d_h = d_sum.dot(&block.second.weight.t());
            let d_first = &d_h * &relu_mask(&bc.z_first);
            let g_first = LayerGrad {
                weight: a_prev.t().dot(&d_first),
                bias: d_first.sum_axis(Axis(0)),
            };

            // Main path plus the identity skip
            d = d_first.dot(&block.first.weight.t()) + &d_sum;
            block_grads.push((g_first, g_second));
        }

        // Input layer
        let d_in = &d * &relu_mask(&cache.input_z);
        let g_in = LayerGrad {
            weight: x.t().dot(&d_in),
            bias: d_in.sum_axis(Axis(0)),
        };

        // block_grads holds [block2, block1]; restore canonical order
        let (g_b2_first, g_b2_second) = block_grads.remove(0);
        let (g_b1_first, g_b1_second) = block_grads.remove(0);
        NetGradients {
            layers: [g_in, g_b1_first, g_b1_second, g_b2_first, g_b2_second, g_out],
        }
    }

    /// Layers in the canonical parameter order.
    pub(crate) fn layers(&self) -> [&DenseLayer; 6] {
        let [b1, b2] = &self.blocks;
        [
            &self.input,
            &b1.first,
            &b1.second,
            &b2.first,
            &b2.second,
            &self.output,
        ]
    }

    pub(crate) fn layers_mut(&mut self) -> [&mut DenseLayer; 6] {
        let [b1, b2] = &mut self.blocks;
        [
            &mut self.input,
            &mut b1.first,
            &mut b1.second,
            &mut b2.first,
            &mut b2.second,
            &mut self.output,
        ]
    }
}

fn relu(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(|v| v.max(0.0))
}

fn relu_mask(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 })
}
