//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network) with a single
//! hidden layer, trained by stochastic gradient descent.
//!
//! # Example
//!
//! Let's train a simple neural network to compute the XOR function:
//!
//! ```
//! # use sgdnet::feed_forward::*;
//! // Create examples of the XOR function
//! let inputs = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
//! let outputs = [[0.0], [1.0], [1.0], [0.0]];
//!
//! let config = NetworkConfig::new(2, 3, 1)
//!     .hidden_activator(Activator::TanH)
//!     .seed(7);
//! let mut network = Network::new(&config).unwrap();
//! network.add_training_data(&inputs, &outputs).unwrap();
//!
//! // Train in batches of epochs until the predictions are close enough.
//! let mut accuracy = 0.0;
//! for _ in 0..100 {
//!     accuracy = network.train(1000, 0.01).unwrap();
//!     if accuracy > 0.99 {
//!         break;
//!     }
//! }
//!
//! // And verify the network correctly computes XOR!
//! assert!(accuracy > 0.99);
//! assert!(network.predict(&[0.0, 1.0]).unwrap()[0] > 0.5);
//! assert!(network.predict(&[1.0, 1.0]).unwrap()[0] < 0.5);
//! ```

pub use crate::activator::Activator;

use crate::error::{check_len, check_positive, Error, Result};
use crate::layers::DenseLayer;
use crate::utils;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// The learning rate used when the caller has no preference.
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

/// The shape and initialization of a `Network`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_count: usize,
    pub hidden_count: usize,
    pub output_count: usize,
    #[serde(default)]
    pub hidden_activator: Activator,
    #[serde(default)]
    pub output_activator: Activator,
    /// Seed for the network's random source. Uses OS entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkConfig {
    /// Creates a new configuration.
    ///
    /// Both layers default to a ReLU activation function and the random source
    /// is seeded from the OS.
    pub fn new(input_count: usize, hidden_count: usize, output_count: usize) -> Self {
        NetworkConfig {
            input_count,
            hidden_count,
            output_count,
            hidden_activator: Activator::ReLU,
            output_activator: Activator::ReLU,
            seed: None,
        }
    }

    /// Sets the activation function of the hidden layer.
    pub fn hidden_activator(mut self, activator: Activator) -> Self {
        self.hidden_activator = activator;
        self
    }

    /// Sets the activation function of the output layer.
    pub fn output_activator(mut self, activator: Activator) -> Self {
        self.output_activator = activator;
        self
    }

    /// Seeds the random source, making initialization and shuffling
    /// reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Verifies that every layer has at least one node.
    fn validate(&self) -> Result<()> {
        let counts = [
            ("input", self.input_count),
            ("hidden", self.hidden_count),
            ("output", self.output_count),
        ];
        for &(name, count) in &counts {
            if count == 0 {
                return Err(Error::InvalidTopology(format!(
                    "{} count must be non-zero",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// The prediction for one training example, as reported by
/// `Network::results`.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub input: Vec<f64>,
    pub reference: Vec<f64>,
    pub prediction: Vec<f64>,
    /// Mean absolute error of the prediction.
    pub error: f64,
}

/// A Feedforward neural network with one hidden layer.
///
/// The network owns its training set, so training can be resumed with
/// repeated calls to `train`.
#[derive(Debug)]
pub struct Network<R = StdRng> {
    hidden_layer: DenseLayer,
    output_layer: DenseLayer,
    training_input: Vec<Vec<f64>>,
    training_output: Vec<Vec<f64>>,
    training_order: Vec<usize>,
    rng: R,
}

impl Network<StdRng> {
    /// Creates a new, untrained neural network.
    ///
    /// The random source is seeded from `config.seed` when present.
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Network::with_rng(config, rng)
    }
}

impl<R: Rng> Network<R> {
    /// Creates a new, untrained neural network drawing its initial parameters
    /// and training order from `rng`. `config.seed` is ignored.
    pub fn with_rng(config: &NetworkConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let hidden_layer = DenseLayer::new(
            config.hidden_count,
            config.input_count,
            config.hidden_activator,
            &mut rng,
        );
        let output_layer = DenseLayer::new(
            config.output_count,
            config.hidden_count,
            config.output_activator,
            &mut rng,
        );
        Ok(Network {
            hidden_layer,
            output_layer,
            training_input: Vec::new(),
            training_output: Vec::new(),
            training_order: Vec::new(),
            rng,
        })
    }

    /// Returns the size of the input layer to the network.
    pub fn input_count(&self) -> usize {
        self.hidden_layer.weight_count()
    }

    /// Returns the number of nodes in the hidden layer.
    pub fn hidden_count(&self) -> usize {
        self.hidden_layer.node_count()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_count(&self) -> usize {
        self.output_layer.node_count()
    }

    /// Returns the output of the most recent forward pass.
    pub fn output(&self) -> &[f64] {
        self.output_layer.output()
    }

    pub fn hidden_layer(&self) -> &DenseLayer {
        &self.hidden_layer
    }

    pub fn output_layer(&self) -> &DenseLayer {
        &self.output_layer
    }

    /// Returns the number of stored training examples.
    pub fn training_set_count(&self) -> usize {
        self.training_order.len()
    }

    /// Returns the order in which examples were visited during the last
    /// epoch.
    pub fn training_order(&self) -> &[usize] {
        &self.training_order
    }

    /// Replaces the training set with the provided examples.
    ///
    /// Every input must hold `input_count()` values and every output
    /// `output_count()` values. Nothing is stored unless the whole set is
    /// valid.
    pub fn add_training_data<I, O>(&mut self, inputs: &[I], outputs: &[O]) -> Result<()>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        if inputs.len() != outputs.len() {
            return Err(Error::TrainingSetMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        if inputs.is_empty() {
            return Err(Error::EmptyDataset);
        }
        for (input, output) in inputs.iter().zip(outputs) {
            check_len("training input", self.input_count(), input.as_ref().len())?;
            check_len("training output", self.output_count(), output.as_ref().len())?;
        }

        self.training_input = inputs.iter().map(|x| x.as_ref().to_vec()).collect();
        self.training_output = outputs.iter().map(|y| y.as_ref().to_vec()).collect();
        self.training_order = (0..inputs.len()).collect();
        debug!(examples = inputs.len(), "replaced training set");
        Ok(())
    }

    /// Feeds the provided `input` through the network, returning the output
    /// layer.
    pub fn predict(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        check_len("prediction input", self.input_count(), input.len())?;
        self.feedforward(input);
        Ok(self.output().to_vec())
    }

    /// Runs `epoch_count` epochs of stochastic gradient descent over the
    /// training set, starting from the current parameters.
    ///
    /// Each epoch visits every example once in a freshly shuffled order.
    ///
    /// Returns:
    ///   The accuracy after training.
    pub fn train(&mut self, epoch_count: usize, learning_rate: f64) -> Result<f64> {
        if epoch_count == 0 {
            return Err(Error::InvalidHyperparameter {
                name: "epoch_count",
                value: 0.0,
            });
        }
        check_positive("learning_rate", learning_rate)?;

        for _ in 0..epoch_count {
            utils::shuffle(&mut self.training_order, &mut self.rng);
            for &i in &self.training_order {
                let input = &self.training_input[i];
                self.hidden_layer.forward(input);
                self.output_layer.forward(self.hidden_layer.output());

                self.output_layer
                    .backpropagate_output(&self.training_output[i])?;
                self.hidden_layer.backpropagate_hidden(&self.output_layer)?;

                self.hidden_layer.optimize(input, learning_rate)?;
                self.output_layer
                    .optimize(self.hidden_layer.output(), learning_rate)?;
            }
        }

        let accuracy = self.accuracy();
        debug!(epoch_count, learning_rate, accuracy, "finished training");
        Ok(accuracy)
    }

    /// Returns `1 - mean absolute error` over the training set, or zero if no
    /// training data has been added.
    pub fn accuracy(&mut self) -> f64 {
        let count = self.training_set_count();
        if count == 0 {
            return 0.0;
        }
        let total: f64 = (0..count).map(|i| self.average_error(i)).sum();
        1.0 - total / count as f64
    }

    /// Predicts every training example, for reporting.
    pub fn results(&mut self) -> Vec<Prediction> {
        (0..self.training_set_count())
            .map(|i| {
                let error = self.average_error(i);
                Prediction {
                    input: self.training_input[i].clone(),
                    reference: self.training_output[i].clone(),
                    prediction: self.output().to_vec(),
                    error,
                }
            })
            .collect()
    }

    /// Feeds an input of validated length through both layers.
    fn feedforward(&mut self, input: &[f64]) {
        self.hidden_layer.forward(input);
        self.output_layer.forward(self.hidden_layer.output());
    }

    /// Predicts training example `i` and returns its mean absolute error.
    fn average_error(&mut self, i: usize) -> f64 {
        self.hidden_layer.forward(&self.training_input[i]);
        self.output_layer.forward(self.hidden_layer.output());
        mean_absolute_error(self.output_layer.output(), &self.training_output[i])
    }
}

/// Computes the mean absolute error between `actual` and `expected`.
fn mean_absolute_error(actual: &[f64], expected: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let total: f64 = actual
        .iter()
        .zip(expected)
        .map(|(a, e)| (e - a).abs())
        .sum();
    total / actual.len() as f64
}
