pub mod backprop;
pub mod epoch_stats;
pub mod gradients;
pub mod loop_fn;
pub mod train_config;

pub use backprop::backward;
pub use epoch_stats::EpochStats;
pub use gradients::{Gradients, LayerGradients};
pub use loop_fn::{train_loop, validate_dataset};
pub use train_config::TrainConfig;
