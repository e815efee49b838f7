pub mod cache;
pub mod config;
pub mod network;
pub mod topology;

pub use cache::ForwardCache;
pub use config::NetworkConfig;
pub use network::Network;
pub use topology::Topology;
