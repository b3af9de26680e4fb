//! Single-variable linear regression, `y = weight * x + bias`, trained with
//! the same stochastic update rule as the dense layers.

use crate::error::{check_positive, Error, Result};
use crate::utils;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// A linear model fitted to a fixed set of `(x, y)` pairs.
#[derive(Debug)]
pub struct LinReg<R = StdRng> {
    training_input: Vec<f64>,
    training_output: Vec<f64>,
    training_order: Vec<usize>,
    bias: f64,
    weight: f64,
    rng: R,
}

impl LinReg<StdRng> {
    /// Creates a model over the provided training pairs, seeded from the OS.
    pub fn new(inputs: &[f64], outputs: &[f64]) -> Self {
        LinReg::with_rng(inputs, outputs, StdRng::from_entropy())
    }
}

impl<R: Rng> LinReg<R> {
    /// Creates a model over the provided training pairs.
    ///
    /// If the two sets differ in length, the surplus of the longer one is
    /// dropped. The bias and weight start out random in `[0, 1)`.
    pub fn with_rng(inputs: &[f64], outputs: &[f64], mut rng: R) -> Self {
        let count = inputs.len().min(outputs.len());
        LinReg {
            training_input: inputs[..count].to_vec(),
            training_output: outputs[..count].to_vec(),
            training_order: (0..count).collect(),
            bias: utils::random_scalar(&mut rng, 0.0..1.0),
            weight: utils::random_scalar(&mut rng, 0.0..1.0),
            rng,
        }
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the number of stored training pairs.
    pub fn set_count(&self) -> usize {
        self.training_order.len()
    }

    pub fn predict(&self, input: f64) -> f64 {
        self.weight * input + self.bias
    }

    /// Runs `epoch_count` epochs over the training pairs in shuffled order.
    ///
    /// Returns:
    ///   The accuracy after training.
    pub fn train(&mut self, epoch_count: usize, learning_rate: f64) -> Result<f64> {
        if self.set_count() == 0 {
            return Err(Error::EmptyDataset);
        }
        if epoch_count == 0 {
            return Err(Error::InvalidHyperparameter {
                name: "epoch_count",
                value: 0.0,
            });
        }
        check_positive("learning_rate", learning_rate)?;

        for _ in 0..epoch_count {
            utils::shuffle(&mut self.training_order, &mut self.rng);
            for k in 0..self.training_order.len() {
                let i = self.training_order[k];
                self.optimize(self.training_input[i], self.training_output[i], learning_rate);
            }
        }

        let accuracy = self.accuracy();
        debug!(epoch_count, learning_rate, accuracy, "finished training");
        Ok(accuracy)
    }

    /// Returns `1 - mean absolute error` over the training pairs, or zero if
    /// there are none.
    pub fn accuracy(&self) -> f64 {
        if self.set_count() == 0 {
            return 0.0;
        }
        let total: f64 = self
            .training_input
            .iter()
            .zip(&self.training_output)
            .map(|(&x, &y)| (y - self.predict(x)).abs())
            .sum();
        1.0 - total / self.set_count() as f64
    }

    fn optimize(&mut self, input: f64, reference: f64, learning_rate: f64) {
        // At x = 0 the prediction is the bias alone.
        if input == 0.0 {
            self.bias = reference;
        } else {
            let error = reference - self.predict(input);
            self.bias += error * learning_rate;
            self.weight += error * learning_rate * input;
        }
    }
}
