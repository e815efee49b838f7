use crate::network::topology::Topology;

/// Scratch state written by a forward pass and read by the matching
/// backward pass.
///
/// `activations[0]` is the last input and `activations[l]` the output of
/// weighted layer `l`; `pre_activations[l - 1]` holds that layer's `z`.
/// The network never owns one of these, so any number of caches can be
/// driven against the same `&Network` concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardCache {
    pub(crate) activations: Vec<Vec<f64>>,
    pub(crate) pre_activations: Vec<Vec<f64>>,
}

impl ForwardCache {
    pub fn new(topology: &Topology) -> ForwardCache {
        let activations = topology.sizes().iter().map(|&n| vec![0.0; n]).collect();
        let pre_activations = topology.sizes()[1..].iter().map(|&n| vec![0.0; n]).collect();
        ForwardCache { activations, pre_activations }
    }

    pub fn activations(&self) -> &[Vec<f64>] {
        &self.activations
    }

    pub fn pre_activations(&self) -> &[Vec<f64>] {
        &self.pre_activations
    }

    /// Output of the final layer from the most recent forward pass.
    pub fn output(&self) -> &[f64] {
        self.activations.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when every buffer has the width `topology` prescribes.
    pub fn fits(&self, topology: &Topology) -> bool {
        let sizes = topology.sizes();
        self.activations.len() == sizes.len()
            && self.pre_activations.len() == sizes.len() - 1
            && self.activations.iter().zip(sizes).all(|(a, &n)| a.len() == n)
            && self.pre_activations.iter().zip(&sizes[1..]).all(|(z, &n)| z.len() == n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_follow_topology() {
        let t = Topology::new(vec![3, 4, 2]).unwrap();
        let cache = ForwardCache::new(&t);
        assert_eq!(cache.activations().len(), 3);
        assert_eq!(cache.pre_activations().len(), 2);
        assert_eq!(cache.output().len(), 2);
        assert!(cache.fits(&t));
        assert!(!cache.fits(&Topology::new(vec![3, 5, 2]).unwrap()));
    }
}
