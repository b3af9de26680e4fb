extern crate sgdnet;

use anyhow::{Context, Result};
use sgdnet::feed_forward::{Activator, Network, NetworkConfig, Prediction};
use sgdnet::trainer::{StopCondition, Trainer};
use std::fs;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const INPUTS: [[f64; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
const OUTPUTS: [[f64; 1]; 4] = [[0.0], [1.0], [1.0], [0.0]];

/// Loads the network configuration from the JSON file named by the first
/// argument, falling back to a 2-3-1 network with a tanh hidden layer.
fn load_config() -> Result<NetworkConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse {}", path))
        }
        None => Ok(NetworkConfig::new(2, 3, 1).hidden_activator(Activator::TanH)),
    }
}

fn format_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|x| format!("{:.1}", x))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_results(accuracy: f64, results: &[Prediction]) {
    println!("{}", "-".repeat(80));
    println!("Prediction accuracy: {:.1} %\n", accuracy * 100.0);
    for result in results {
        println!(
            "Input: [{}], prediction: [{}], reference: [{}], error: [{:.1}]",
            format_values(&result.input),
            format_values(&result.prediction),
            format_values(&result.reference),
            result.error
        );
    }
    println!("{}\n", "-".repeat(80));
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config()?;
    let mut network = Network::new(&config)?;
    network.add_training_data(&INPUTS, &OUTPUTS)?;

    let summary = Trainer::new(&mut network)
        .epochs_per_batch(1000)
        .stop_condition(StopCondition::Accuracy(0.9999))
        .train()?;

    let results = network.results();
    print_results(summary.accuracy, &results);
    Ok(())
}
