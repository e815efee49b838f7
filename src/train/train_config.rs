use std::sync::mpsc;
use crate::train::epoch_stats::EpochStats;

/// Epoch cadence of the `(epoch, mean_loss)` log line when none is given.
pub const DEFAULT_LOG_EVERY: usize = 500;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`      — exact number of full-batch epochs; `0` trains nothing
/// - `log_every`   — emit an `info` event every `log_every` epochs, starting
///                   at epoch 0; `0` disables the log line
/// - `progress_tx` — optional channel sender; one `EpochStats` is sent per
///                   completed epoch. A dropped receiver is ignored and
///                   training runs to the end.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub log_every: usize,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with the default log cadence and no progress channel.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            log_every: DEFAULT_LOG_EVERY,
            progress_tx: None,
        }
    }

    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }
}
