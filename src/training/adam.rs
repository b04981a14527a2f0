//! Adam optimizer
//!
//! Adaptive moment estimation over the network's six dense layers:
//!
//! ```text
//! m = beta1 * m + (1 - beta1) * g
//! v = beta2 * v + (1 - beta2) * g^2
//! w -= lr * (m / (1 - beta1^t)) / (sqrt(v / (1 - beta2^t)) + eps)
//! ```

use crate::training::network::{DenseLayer, NetGradients, ResidualNet};
use ndarray::{Array1, Array2};

pub(crate) struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    t: u64,
    m_w: Vec<Array2<f64>>,
    v_w: Vec<Array2<f64>>,
    m_b: Vec<Array1<f64>>,
    v_b: Vec<Array1<f64>>,
}

impl Adam {
    /// Zero-initialized moment state shaped after the network's layers.
    pub fn new(learning_rate: f64, net: &ResidualNet) -> Self {
        let layers = net.layers();
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            t: 0,
            m_w: layers.iter().map(|l| Array2::zeros(l.weight.raw_dim())).collect(),
            v_w: layers.iter().map(|l| Array2::zeros(l.weight.raw_dim())).collect(),
            m_b: layers.iter().map(|l| Array1::zeros(l.bias.len())).collect(),
            v_b: layers.iter().map(|l| Array1::zeros(l.bias.len())).collect(),
        }
    }

    /// Apply one bias-corrected update to every layer.
    pub fn step(&mut self, layers: [&mut DenseLayer; 6], grads: &NetGradients) {
        self.t += 1;
        let bc1 = 1.0 - self.beta1.powi(self.t as i32);
        let bc2 = 1.0 - self.beta2.powi(self.t as i32);

        for (i, layer) in layers.into_iter().enumerate() {
            let g = &grads.layers[i];

            self.m_w[i] = &self.m_w[i] * self.beta1 + &g.weight * (1.0 - self.beta1);
            self.v_w[i] = &self.v_w[i] * self.beta2 + &(&g.weight * &g.weight) * (1.0 - self.beta2);
            let m_hat = &self.m_w[i] / bc1;
            let v_hat = &self.v_w[i] / bc2;
            layer.weight -= &((m_hat * self.learning_rate) / (v_hat.mapv(f64::sqrt) + self.epsilon));

            self.m_b[i] = &self.m_b[i] * self.beta1 + &g.bias * (1.0 - self.beta1);
            self.v_b[i] = &self.v_b[i] * self.beta2 + &(&g.bias * &g.bias) * (1.0 - self.beta2);
            let m_hat = &self.m_b[i] / bc1;
            let v_hat = &self.v_b[i] / bc2;
            layer.bias -= &((m_hat * self.learning_rate) / (v_hat.mapv(f64::sqrt) + self.epsilon));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_step_moves_toward_gradient_descent() {
        let mut net = ResidualNet::new(2, Some(11));
        let mut adam = Adam::new(0.01, &net);

        let x = array![[0.4, 0.6], [0.1, 0.9]];
        let y = array![0.5, 0.2];

        let before: f64 = {
            let pred = net.predict(&x);
            pred.iter().zip(y.iter()).map(|(p, t)| (p - t).powi(2)).sum()
        };

        for _ in 0..50 {
            let cache = net.forward(&x);
            let grads = net.backward(&x, &y, &cache);
            adam.step(net.layers_mut(), &grads);
        }

        let after: f64 = {
            let pred = net.predict(&x);
            pred.iter().zip(y.iter()).map(|(p, t)| (p - t).powi(2)).sum()
        };

        assert!(after < before, "loss should fall: before {before}, after {after}");
    }
}
