use crate::math::matrix::Matrix;
use crate::network::topology::Topology;

/// Running gradient sums for one weighted layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub biases: Vec<f64>,
}

impl LayerGradients {
    /// `dW += delta ⊗ input`, `db += delta`.
    pub fn accumulate(&mut self, delta: &[f64], input: &[f64]) {
        self.weights.add_outer(delta, input);
        for (b, d) in self.biases.iter_mut().zip(delta) {
            *b += d;
        }
    }
}

/// Per-epoch gradient accumulators mirroring the parameter shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub(crate) layers: Vec<LayerGradients>,
}

impl Gradients {
    pub fn zeros(topology: &Topology) -> Gradients {
        let layers = topology.layer_shapes()
            .map(|(size, input_size)| LayerGradients {
                weights: Matrix::zeros(size, input_size),
                biases: vec![0.0; size],
            })
            .collect();
        Gradients { layers }
    }

    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.weights.fill(0.0);
            layer.biases.iter_mut().for_each(|b| *b = 0.0);
        }
    }

    /// Accumulators for weighted layer `l`, 0-based from the input side.
    pub fn layers(&self) -> &[LayerGradients] {
        &self.layers
    }

    pub fn fits(&self, topology: &Topology) -> bool {
        self.layers.len() == topology.depth()
            && self.layers.iter().zip(topology.layer_shapes()).all(|(g, (size, input_size))| {
                g.weights.rows == size && g.weights.cols == input_size && g.biases.len() == size
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_zeroes_everything() {
        let t = Topology::new(vec![2, 2]).unwrap();
        let mut g = Gradients::zeros(&t);
        g.layers[0].accumulate(&[1.0, -1.0], &[0.5, 2.0]);
        assert_eq!(g.layers()[0].weights.as_slice(), &[0.5, 2.0, -0.5, -2.0]);
        assert_eq!(g.layers()[0].biases, vec![1.0, -1.0]);
        g.reset();
        assert_eq!(g, Gradients::zeros(&t));
    }

    #[test]
    fn fits_checks_every_layer() {
        let g = Gradients::zeros(&Topology::new(vec![3, 2, 1]).unwrap());
        assert!(g.fits(&Topology::new(vec![3, 2, 1]).unwrap()));
        assert!(!g.fits(&Topology::new(vec![3, 2, 2]).unwrap()));
        assert!(!g.fits(&Topology::new(vec![3, 1]).unwrap()));
    }
}
