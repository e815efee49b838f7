use crate::error::{check_len, NetworkError, Result};
use crate::loss::mse::MseLoss;
use crate::network::cache::ForwardCache;
use crate::network::network::Network;
use crate::train::gradients::Gradients;

/// Backward pass for the sample whose forward state is in `cache`.
///
/// Adds this sample's contribution to `grads`; nothing is overwritten, so
/// calling it once per sample sums the gradient over the batch.
///
/// The output error signal is `(a - y) · f'(a)` with the derivative taken
/// through the activation value; hidden layers use `f'(z)` from the cached
/// pre-activations. The network must be the one that filled `cache`.
pub fn backward(
    network: &Network,
    cache: &ForwardCache,
    target: &[f64],
    grads: &mut Gradients,
) -> Result<()> {
    let topology = network.topology();
    check_len("backward target", topology.output_width(), target.len())?;
    if !cache.fits(topology) {
        return Err(NetworkError::ShapeMismatch {
            context: "backward cache layers",
            expected: topology.sizes().len(),
            actual: cache.activations.len(),
        });
    }
    if !grads.fits(topology) {
        return Err(NetworkError::ShapeMismatch {
            context: "gradient accumulator layers",
            expected: topology.depth(),
            actual: grads.layers.len(),
        });
    }

    let layers = network.layers();
    let output = cache.output();
    let output_activation = layers[layers.len() - 1].activator;

    let mut delta: Vec<f64> = MseLoss::derivative(output, target)
        .into_iter()
        .zip(output)
        .map(|(err, &a)| err * output_activation.derivative_from_output(a))
        .collect();
    let mut propagated = Vec::new();

    for l in (0..layers.len()).rev() {
        // activations[l] is the input this layer saw
        grads.layers[l].accumulate(&delta, &cache.activations[l]);

        if l > 0 {
            layers[l].propagate_back(&delta, &mut propagated);
            let hidden_activation = layers[l - 1].activator;
            delta.clear();
            delta.extend(
                propagated.iter()
                    .zip(&cache.pre_activations[l - 1])
                    .map(|(err, &z)| err * hidden_activation.derivative(z)),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::config::NetworkConfig;

    #[test]
    fn single_layer_gradient_is_closed_form() {
        let mut net = Network::from_sizes(&[2, 1], 0.1).unwrap();
        net.map_parameters(|_| 0.0);
        let mut cache = net.new_cache();
        net.forward_with(&[2.0, -1.0], &mut cache).unwrap();

        let mut grads = Gradients::zeros(net.topology());
        backward(&net, &cache, &[1.0], &mut grads).unwrap();

        // a = 0.5, delta = (0.5 - 1) * 0.25
        let delta = -0.125;
        assert_eq!(grads.layers()[0].biases, vec![delta]);
        assert_eq!(grads.layers()[0].weights.as_slice(), &[2.0 * delta, -delta]);
    }

    #[test]
    fn repeated_calls_accumulate() {
        let net = Network::new(NetworkConfig::new(vec![3, 4, 2], 0.1).with_seed(3)).unwrap();
        let mut cache = net.new_cache();
        net.forward_with(&[0.1, 0.2, 0.3], &mut cache).unwrap();

        let mut once = Gradients::zeros(net.topology());
        backward(&net, &cache, &[1.0, 0.0], &mut once).unwrap();
        let mut twice = Gradients::zeros(net.topology());
        backward(&net, &cache, &[1.0, 0.0], &mut twice).unwrap();
        backward(&net, &cache, &[1.0, 0.0], &mut twice).unwrap();

        for (a, b) in once.layers().iter().zip(twice.layers()) {
            for (x, y) in a.weights.as_slice().iter().zip(b.weights.as_slice()) {
                assert_eq!(2.0 * x, *y);
            }
        }
    }

    #[test]
    fn wrong_target_length_leaves_accumulators_alone() {
        let net = Network::from_sizes(&[2, 3, 1], 0.1).unwrap();
        let mut cache = net.new_cache();
        net.forward_with(&[1.0, 1.0], &mut cache).unwrap();
        let mut grads = Gradients::zeros(net.topology());
        let err = backward(&net, &cache, &[1.0, 0.0], &mut grads).unwrap_err();
        assert!(matches!(err, NetworkError::ShapeMismatch { expected: 1, actual: 2, .. }));
        assert_eq!(grads, Gradients::zeros(net.topology()));
    }

    #[test]
    fn dead_relu_blocks_the_hidden_gradient() {
        let mut net = Network::from_sizes(&[1, 1, 1], 0.1).unwrap();
        net.set_weight(1, 0, 0, 1.0);
        net.set_bias(1, 0, -5.0);
        let mut cache = net.new_cache();
        net.forward_with(&[1.0], &mut cache).unwrap();
        let mut grads = Gradients::zeros(net.topology());
        backward(&net, &cache, &[1.0], &mut grads).unwrap();
        assert_eq!(grads.layers()[0].weights.as_slice(), &[0.0]);
        assert_eq!(grads.layers()[0].biases, vec![0.0]);
    }
}
