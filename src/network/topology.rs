use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};

/// Ordered layer widths `sizes[0..=L]`: input width first, output width last.
///
/// Immutable once built; every other shape in the network derives from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology {
    sizes: Vec<usize>,
}

impl Topology {
    /// Fails with `Configuration` for fewer than two widths or a zero width.
    pub fn new(sizes: Vec<usize>) -> Result<Topology> {
        if sizes.len() < 2 {
            return Err(NetworkError::Configuration(format!(
                "topology needs at least an input and an output width, got {} width(s)",
                sizes.len()
            )));
        }
        if let Some(pos) = sizes.iter().position(|&s| s == 0) {
            return Err(NetworkError::Configuration(format!(
                "layer width at position {pos} must be positive"
            )));
        }
        Ok(Topology { sizes })
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of weighted layers, `L`.
    pub fn depth(&self) -> usize {
        self.sizes.len() - 1
    }

    pub fn input_width(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_width(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// `(size, input_size)` for every weighted layer, input side first.
    pub fn layer_shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sizes.windows(2).map(|w| (w[1], w[0]))
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = NetworkError;

    fn try_from(sizes: Vec<usize>) -> Result<Self> {
        Topology::new(sizes)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(t: Topology) -> Self {
        t.sizes
    }
}
