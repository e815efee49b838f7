pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{ForwardCache, Network, NetworkConfig, Topology};
pub use loss::mse::MseLoss;
pub use optim::gd::GradientDescent;
pub use train::{backward, train_loop, EpochStats, Gradients, TrainConfig};
