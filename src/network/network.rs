use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::{check_len, NetworkError, Result};
use crate::layers::dense::Layer;
use crate::loss::mse::MseLoss;
use crate::network::cache::ForwardCache;
use crate::network::config::{validate_activation, validate_learning_rate, NetworkConfig};
use crate::network::topology::Topology;
use crate::optim::gd::GradientDescent;
use crate::train::loop_fn::{train_loop, validate_dataset};
use crate::train::train_config::TrainConfig;

/// Feed-forward network with one `Layer` per entry of `topology` after the
/// input width.
///
/// Parameters change only through `GradientDescent::apply` (directly or via
/// `train`). Forward and backward state lives in a caller-owned
/// `ForwardCache`, so every read-only operation takes `&self`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkState")]
pub struct Network {
    topology: Topology,
    learning_rate: f64,
    layers: Vec<Layer>,
}

/// Unchecked on-disk form; converted into a `Network` only after the
/// parameter shapes are checked against the topology.
#[derive(Deserialize)]
struct NetworkState {
    topology: Topology,
    learning_rate: f64,
    layers: Vec<Layer>,
}

impl TryFrom<NetworkState> for Network {
    type Error = NetworkError;

    fn try_from(state: NetworkState) -> Result<Network> {
        validate_learning_rate(state.learning_rate)?;
        if state.layers.len() != state.topology.depth() {
            return Err(NetworkError::Configuration(format!(
                "topology has {} weighted layers but {} were stored",
                state.topology.depth(),
                state.layers.len()
            )));
        }
        for (l, (layer, (size, input_size))) in
            state.layers.iter().zip(state.topology.layer_shapes()).enumerate()
        {
            let w = &layer.weights;
            if w.rows != size || w.cols != input_size || layer.biases.len() != size {
                return Err(NetworkError::Configuration(format!(
                    "layer {} parameters do not match shape {size}x{input_size}",
                    l + 1
                )));
            }
            validate_activation(l + 1, &layer.activator)?;
        }
        Ok(Network {
            topology: state.topology,
            learning_rate: state.learning_rate,
            layers: state.layers,
        })
    }
}

impl Network {
    /// Builds a network with parameters drawn from a generator seeded with
    /// `config.seed`.
    pub fn new(config: NetworkConfig) -> Result<Network> {
        let (topology, activations) = config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let layers = topology.layer_shapes()
            .zip(activations)
            .map(|((size, input_size), activation)| {
                Layer::new(size, input_size, activation, config.init_range, &mut rng)
            })
            .collect();

        debug!(
            sizes = ?topology.sizes(),
            learning_rate = config.learning_rate,
            seed = config.seed,
            "network initialized"
        );

        Ok(Network {
            topology,
            learning_rate: config.learning_rate,
            layers,
        })
    }

    /// Shorthand for `Network::new(NetworkConfig::new(sizes, learning_rate))`.
    pub fn from_sizes(sizes: &[usize], learning_rate: f64) -> Result<Network> {
        Network::new(NetworkConfig::new(sizes.to_vec(), learning_rate))
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Weight from neuron `col` of layer `layer - 1` into neuron `row` of
    /// weighted layer `layer` (1-based, matching `topology().sizes()`).
    ///
    /// # Panics
    /// Panics if any index is out of range, including `layer == 0`.
    pub fn weight(&self, layer: usize, row: usize, col: usize) -> f64 {
        self.layers[layer - 1].weights.get(row, col)
    }

    /// # Panics
    /// Panics if any index is out of range, including `layer == 0`.
    pub fn set_weight(&mut self, layer: usize, row: usize, col: usize, value: f64) {
        self.layers[layer - 1].weights.set(row, col, value);
    }

    /// Bias of neuron `row` in weighted layer `layer` (1-based).
    ///
    /// # Panics
    /// Panics if any index is out of range, including `layer == 0`.
    pub fn bias(&self, layer: usize, row: usize) -> f64 {
        self.layers[layer - 1].biases[row]
    }

    /// # Panics
    /// Panics if any index is out of range, including `layer == 0`.
    pub fn set_bias(&mut self, layer: usize, row: usize, value: f64) {
        self.layers[layer - 1].biases[row] = value;
    }

    /// Rewrites every weight and bias through `f`.
    pub fn map_parameters<F: FnMut(f64) -> f64>(&mut self, mut f: F) {
        for layer in &mut self.layers {
            for row in 0..layer.weights.rows {
                layer.weights.row_mut(row).iter_mut().for_each(|w| *w = f(*w));
            }
            layer.biases.iter_mut().for_each(|b| *b = f(*b));
        }
    }

    /// A scratch cache shaped for this network.
    pub fn new_cache(&self) -> ForwardCache {
        ForwardCache::new(&self.topology)
    }

    /// Forward pass that records every `z` and `a` into `cache` for a later
    /// `backward` call, and returns the output activations.
    ///
    /// Shapes are checked before anything is written, so a failing call
    /// leaves `cache` untouched.
    pub fn forward_with<'c>(&self, input: &[f64], cache: &'c mut ForwardCache) -> Result<&'c [f64]> {
        check_len("forward input", self.topology.input_width(), input.len())?;
        if !cache.fits(&self.topology) {
            return Err(NetworkError::ShapeMismatch {
                context: "forward cache layers",
                expected: self.topology.sizes().len(),
                actual: cache.activations.len(),
            });
        }

        cache.activations[0].copy_from_slice(input);
        for (l, layer) in self.layers.iter().enumerate() {
            let (before, after) = cache.activations.split_at_mut(l + 1);
            layer.feed_from(&before[l], &mut cache.pre_activations[l], &mut after[0]);
        }
        Ok(cache.output())
    }

    /// Forward pass with a throwaway cache.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut cache = self.new_cache();
        Ok(self.forward_with(input, &mut cache)?.to_vec())
    }

    /// Output-layer activations for `input`.
    pub fn predict_proba(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input)
    }

    /// `1` when the single output is at least 0.5, else `0`.
    ///
    /// Fails with `UnsupportedOutputWidth` on multi-output networks.
    pub fn predict_label(&self, input: &[f64]) -> Result<u8> {
        let width = self.topology.output_width();
        if width != 1 {
            return Err(NetworkError::UnsupportedOutputWidth(width));
        }
        let proba = self.predict_proba(input)?;
        Ok(if proba[0] >= 0.5 { 1 } else { 0 })
    }

    /// Mean over samples of `0.5 · Σ (a_L - y)²`, computed without touching
    /// parameters.
    pub fn mean_loss(&self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
        validate_dataset(&self.topology, inputs, targets)?;
        let mut cache = self.new_cache();
        let mut total = 0.0;
        for (input, target) in inputs.iter().zip(targets) {
            let output = self.forward_with(input, &mut cache)?;
            total += MseLoss::loss(output, target);
        }
        Ok(total / inputs.len() as f64)
    }

    /// Full-batch gradient descent for exactly `epochs` epochs at this
    /// network's learning rate. The mean loss is logged every 500 epochs.
    pub fn train(&mut self, inputs: &[Vec<f64>], targets: &[Vec<f64>], epochs: usize) -> Result<()> {
        let optimizer = GradientDescent::new(self.learning_rate);
        train_loop(self, inputs, targets, &optimizer, &TrainConfig::new(epochs))?;
        Ok(())
    }

    /// Serializes topology, learning rate and parameters to a pretty-printed
    /// JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network written by `save_json`. Parameter shapes are
    /// re-checked against the stored topology.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
