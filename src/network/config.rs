use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetworkError, Result};
use crate::network::topology::Topology;

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 12345;

/// Half-width of the uniform interval initial parameters are drawn from.
pub const DEFAULT_INIT_RANGE: f64 = 0.5;

/// Everything needed to build a fresh `Network`.
///
/// Two networks built from equal configs start with bit-identical
/// parameters. The config can be stored as JSON before any training happens.
///
/// ```json
/// { "sizes": [2, 32, 8, 1], "learning_rate": 0.1, "seed": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Layer widths, input first.
    pub sizes: Vec<usize>,
    pub learning_rate: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_init_range")]
    pub init_range: f64,
    /// One entry per weighted layer. `None` means ReLU for every hidden
    /// layer and Sigmoid for the output layer.
    #[serde(default)]
    pub activations: Option<Vec<ActivationFunction>>,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_init_range() -> f64 {
    DEFAULT_INIT_RANGE
}

impl NetworkConfig {
    pub fn new(sizes: Vec<usize>, learning_rate: f64) -> NetworkConfig {
        NetworkConfig {
            sizes,
            learning_rate,
            seed: DEFAULT_SEED,
            init_range: DEFAULT_INIT_RANGE,
            activations: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_init_range(mut self, init_range: f64) -> Self {
        self.init_range = init_range;
        self
    }

    pub fn with_activations(mut self, activations: Vec<ActivationFunction>) -> Self {
        self.activations = Some(activations);
        self
    }

    /// Checks every constraint and returns the validated topology together
    /// with the resolved per-layer activations.
    pub fn validate(&self) -> Result<(Topology, Vec<ActivationFunction>)> {
        let topology = Topology::new(self.sizes.clone())?;
        validate_learning_rate(self.learning_rate)?;
        if !(self.init_range.is_finite() && self.init_range > 0.0) {
            return Err(NetworkError::Configuration(format!(
                "init_range must be positive and finite, got {}",
                self.init_range
            )));
        }
        let activations = match &self.activations {
            Some(list) if list.len() != topology.depth() => {
                return Err(NetworkError::Configuration(format!(
                    "expected {} activations (one per weighted layer), got {}",
                    topology.depth(),
                    list.len()
                )));
            }
            Some(list) => list.clone(),
            None => default_activations(topology.depth()),
        };
        for (l, activation) in activations.iter().enumerate() {
            validate_activation(l + 1, activation)?;
        }
        Ok((topology, activations))
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file. The result is not validated
    /// until it is passed to `Network::new`.
    pub fn load_json(path: &str) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

pub(crate) fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if learning_rate.is_finite() && learning_rate > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::Configuration(format!(
            "learning rate must be positive and finite, got {learning_rate}"
        )))
    }
}

/// Rejects activation parameters outside the domain the backward pass
/// assumes: a `LeakyReLU` slope must be positive and finite.
pub(crate) fn validate_activation(layer: usize, activation: &ActivationFunction) -> Result<()> {
    match activation {
        ActivationFunction::LeakyReLU { alpha } if !(alpha.is_finite() && *alpha > 0.0) => {
            Err(NetworkError::Configuration(format!(
                "layer {layer}: LeakyReLU alpha must be positive and finite, got {alpha}"
            )))
        }
        _ => Ok(()),
    }
}

/// ReLU on every hidden layer, Sigmoid on the output layer.
pub fn default_activations(depth: usize) -> Vec<ActivationFunction> {
    let mut activations = vec![ActivationFunction::ReLU; depth.saturating_sub(1)];
    activations.push(ActivationFunction::Sigmoid);
    activations
}
