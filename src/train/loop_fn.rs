use std::time::Instant;

use tracing::{debug, info};

use crate::error::{check_len, NetworkError, Result};
use crate::loss::mse::MseLoss;
use crate::network::network::Network;
use crate::network::topology::Topology;
use crate::optim::gd::GradientDescent;
use crate::train::backprop::backward;
use crate::train::epoch_stats::EpochStats;
use crate::train::gradients::Gradients;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for exactly `config.epochs` epochs of full-batch
/// gradient descent and returns the statistics of the last epoch (`None`
/// when `config.epochs == 0`).
///
/// Each epoch zeroes the accumulators, runs forward + backward over every
/// sample, then calls `optimizer.apply` once with the sample count.
///
/// # Errors
/// The whole dataset is checked before the first epoch: `EmptyDataset`,
/// `SampleCountMismatch` or `ShapeMismatch` are returned with the
/// parameters untouched. An update is only ever applied after a complete
/// sample pass.
pub fn train_loop(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    optimizer: &GradientDescent,
    config: &TrainConfig,
) -> Result<Option<EpochStats>> {
    validate_dataset(network.topology(), inputs, targets)?;

    let n = inputs.len();
    let mut cache = network.new_cache();
    let mut grads = Gradients::zeros(network.topology());
    let mut last = None;

    debug!(samples = n, epochs = config.epochs, learning_rate = optimizer.learning_rate, "training started");

    for epoch in 0..config.epochs {
        let t_start = Instant::now();

        grads.reset();
        let mut total_loss = 0.0;
        for (input, target) in inputs.iter().zip(targets) {
            let output = network.forward_with(input, &mut cache)?;
            total_loss += MseLoss::loss(output, target);
            backward(network, &cache, target, &mut grads)?;
        }
        optimizer.apply(network, &grads, n)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss: total_loss / n as f64,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if config.log_every > 0 && epoch % config.log_every == 0 {
            info!(epoch, loss = stats.train_loss, "epoch complete");
        }

        if let Some(ref tx) = config.progress_tx {
            // Progress is observability only; a closed receiver does not stop training.
            let _ = tx.send(stats.clone());
        }

        last = Some(stats);
    }

    Ok(last)
}

/// Checks a dataset against `topology` without running anything.
pub fn validate_dataset(topology: &Topology, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
    if inputs.len() != targets.len() {
        return Err(NetworkError::SampleCountMismatch {
            inputs: inputs.len(),
            targets: targets.len(),
        });
    }
    if inputs.is_empty() {
        return Err(NetworkError::EmptyDataset);
    }
    for (input, target) in inputs.iter().zip(targets) {
        check_len("training input", topology.input_width(), input.len())?;
        check_len("training target", topology.output_width(), target.len())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn and_gate() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let inputs = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]];
        let targets = vec![vec![0.0], vec![0.0], vec![0.0], vec![1.0]];
        (inputs, targets)
    }

    #[test]
    fn runs_exactly_the_requested_epochs() {
        let (inputs, targets) = and_gate();
        let mut net = Network::from_sizes(&[2, 4, 1], 0.5).unwrap();
        let (tx, rx) = mpsc::channel();
        let config = TrainConfig::new(25).with_log_every(0).with_progress(tx);

        let last = train_loop(&mut net, &inputs, &targets, &GradientDescent::new(0.5), &config)
            .unwrap()
            .unwrap();
        drop(config);

        let epochs: Vec<usize> = rx.iter().map(|s| s.epoch).collect();
        assert_eq!(epochs, (0..25).collect::<Vec<_>>());
        assert_eq!(last.epoch, 24);
        assert_eq!(last.total_epochs, 25);
    }

    #[test]
    fn zero_epochs_is_a_no_op() {
        let (inputs, targets) = and_gate();
        let mut net = Network::from_sizes(&[2, 4, 1], 0.5).unwrap();
        let before = net.clone();
        let last = train_loop(&mut net, &inputs, &targets, &GradientDescent::new(0.5), &TrainConfig::new(0))
            .unwrap();
        assert!(last.is_none());
        assert_eq!(net, before);
    }

    #[test]
    fn dropped_receiver_does_not_stop_training() {
        let (inputs, targets) = and_gate();
        let mut net = Network::from_sizes(&[2, 4, 1], 0.5).unwrap();
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let config = TrainConfig::new(10).with_progress(tx);
        let last = train_loop(&mut net, &inputs, &targets, &GradientDescent::new(0.5), &config).unwrap();
        assert_eq!(last.map(|s| s.epoch), Some(9));
    }

    #[test]
    fn epoch_loss_is_measured_before_the_update() {
        let (inputs, targets) = and_gate();
        let mut net = Network::from_sizes(&[2, 3, 1], 0.5).unwrap();
        let expected = net.mean_loss(&inputs, &targets).unwrap();
        let last = train_loop(&mut net, &inputs, &targets, &GradientDescent::new(0.5), &TrainConfig::new(1))
            .unwrap()
            .unwrap();
        assert!((last.train_loss - expected).abs() < 1e-12);
    }

    #[test]
    fn validate_dataset_reports_each_problem() {
        let t = Topology::new(vec![2, 1]).unwrap();
        assert!(matches!(validate_dataset(&t, &[], &[]), Err(NetworkError::EmptyDataset)));
        assert!(matches!(
            validate_dataset(&t, &[vec![0.0, 0.0]], &[]),
            Err(NetworkError::SampleCountMismatch { inputs: 1, targets: 0 })
        ));
        assert!(matches!(
            validate_dataset(&t, &[vec![0.0, 0.0], vec![0.0]], &[vec![1.0], vec![1.0]]),
            Err(NetworkError::ShapeMismatch { context: "training input", .. })
        ));
        assert!(matches!(
            validate_dataset(&t, &[vec![0.0, 0.0]], &[vec![1.0, 0.0]]),
            Err(NetworkError::ShapeMismatch { context: "training target", .. })
        ));
    }
}
