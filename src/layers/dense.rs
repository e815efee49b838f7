use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// One weighted layer: `a = f(W·x + b)`.
///
/// `weights` has shape `(size, input_size)`; `biases` has length `size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Vec<f64>,
    pub activator: ActivationFunction,
}

impl Layer {
    /// Draws weights, then biases, from `U[-init_range, init_range)`.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        init_range: f64,
        rng: &mut R,
    ) -> Layer {
        let weights = Matrix::uniform(size, input_size, init_range, rng);
        let biases = (0..size).map(|_| rng.gen_range(-init_range..init_range)).collect();

        Layer {
            weights,
            biases,
            activator: activation,
        }
    }

    pub fn size(&self) -> usize {
        self.weights.rows
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    /// Writes `z = W·input + b` and `a = f(z)` into the given buffers.
    /// Shapes are checked by the caller.
    pub fn feed_from(&self, input: &[f64], z: &mut [f64], a: &mut [f64]) {
        for (i, (zi, ai)) in z.iter_mut().zip(a.iter_mut()).enumerate() {
            let weighted: f64 = self.weights.row(i).iter()
                .zip(input)
                .map(|(w, x)| w * x)
                .sum();
            *zi = self.biases[i] + weighted;
            *ai = self.activator.function(*zi);
        }
    }

    /// Sends this layer's error signal back through its weights:
    /// `out[j] = Σ_k W[k][j] · delta[k]`, the error in the previous layer's
    /// activation space.
    pub fn propagate_back(&self, delta: &[f64], out: &mut Vec<f64>) {
        out.clear();
        out.resize(self.input_size(), 0.0);
        for (k, &d) in delta.iter().enumerate() {
            for (o, w) in out.iter_mut().zip(self.weights.row(k)) {
                *o += w * d;
            }
        }
    }

    /// Applies pre-averaged gradients scaled by `lr`.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &[f64], lr: f64) {
        self.weights.sub_scaled(weights_grad, lr);
        for (b, g) in self.biases.iter_mut().zip(biases_grad) {
            *b -= lr * g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_layer() -> Layer {
        Layer {
            weights: Matrix::from_vec(2, 3, vec![1.0, -1.0, 0.5, 0.0, 2.0, -2.0]).unwrap(),
            biases: vec![0.5, -1.0],
            activator: ActivationFunction::ReLU,
        }
    }

    #[test]
    fn feed_from_writes_pre_activation_and_activation() {
        let layer = fixed_layer();
        let mut z = vec![0.0; 2];
        let mut a = vec![0.0; 2];
        layer.feed_from(&[1.0, 2.0, 2.0], &mut z, &mut a);
        assert_eq!(z, vec![0.5, -1.0]);
        assert_eq!(a, vec![0.5, 0.0]);
    }

    #[test]
    fn propagate_back_uses_transposed_weights() {
        let layer = fixed_layer();
        let mut out = Vec::new();
        layer.propagate_back(&[1.0, 2.0], &mut out);
        assert_eq!(out, vec![1.0, 3.0, -3.5]);
    }

    #[test]
    fn apply_gradients_moves_against_gradient() {
        let mut layer = fixed_layer();
        let mut grad = Matrix::zeros(2, 3);
        grad.set(0, 0, 1.0);
        layer.apply_gradients(&grad, &[2.0, 0.0], 0.5);
        assert_eq!(layer.weights.get(0, 0), 0.5);
        assert_eq!(layer.biases, vec![-0.5, -1.0]);
    }
}
