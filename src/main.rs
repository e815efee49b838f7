// XOR demo for the library. Set RUST_LOG=debug for construction details.
use ferrite_mlp::{Network, NetworkConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ferrite_mlp::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let targets = vec![
        vec![0.0],
        vec![1.0],
        vec![1.0],
        vec![0.0],
    ];

    let mut network = Network::new(NetworkConfig::new(vec![2, 32, 8, 1], 0.1))?;
    network.train(&inputs, &targets, 5000)?;
    info!(loss = network.mean_loss(&inputs, &targets)?, "training finished");

    for input in &inputs {
        let proba = network.predict_proba(input)?[0];
        let label = network.predict_label(input)?;
        println!("Input: {:?} -> Output: {:.4} (label {})", input, proba, label);
    }
    Ok(())
}
