use crate::error::{NetworkError, Result};
use crate::network::network::Network;
use crate::train::gradients::Gradients;

/// Full-batch gradient descent: one step per epoch with the gradient
/// averaged over every sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescent {
    pub learning_rate: f64,
}

impl GradientDescent {
    pub fn new(learning_rate: f64) -> GradientDescent {
        GradientDescent { learning_rate }
    }

    /// `W -= lr · dW / batch_size` and `b -= lr · db / batch_size` for every
    /// layer. `grads` must hold the sums over exactly `batch_size` samples.
    pub fn apply(&self, network: &mut Network, grads: &Gradients, batch_size: usize) -> Result<()> {
        if batch_size == 0 {
            return Err(NetworkError::EmptyDataset);
        }
        if !grads.fits(network.topology()) {
            return Err(NetworkError::ShapeMismatch {
                context: "optimizer gradient layers",
                expected: network.topology().depth(),
                actual: grads.layers().len(),
            });
        }

        let step = self.learning_rate / batch_size as f64;
        for (layer, grad) in network.layers_mut().iter_mut().zip(grads.layers()) {
            layer.apply_gradients(&grad.weights, &grad.biases, step);
        }
        Ok(())
    }
}
