//! Utilities for training networks in batches of epochs.

use crate::error::{check_positive, Error, Result};
use crate::feed_forward::{Network, DEFAULT_LEARNING_RATE};

use rand::Rng;
use std::time::{Duration, Instant};
use tracing::info;

/// A builder for repeatedly training a `Network` until a stop condition is
/// met.
#[derive(Debug)]
pub struct Trainer<'a, R: Rng> {
    network: &'a mut Network<R>,
    epochs_per_batch: usize,
    learning_rate: f64,
    stop_condition: StopCondition,
    max_batches: Option<usize>,
}

impl<'a, R: Rng> Trainer<'a, R> {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * 1000 epochs per batch.
    /// * A learning rate of 0.01.
    /// * Stops once the accuracy exceeds 0.9999.
    /// * No bound on the number of batches.
    pub fn new(network: &'a mut Network<R>) -> Self {
        Trainer {
            network,
            epochs_per_batch: 1000,
            learning_rate: DEFAULT_LEARNING_RATE,
            stop_condition: StopCondition::Accuracy(0.9999),
            max_batches: None,
        }
    }

    /// Sets the number of epochs to run between stop condition checks.
    pub fn epochs_per_batch(mut self, epochs: usize) -> Self {
        self.epochs_per_batch = epochs;
        self
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the condition to finish training.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.stop_condition = condition.into();
        self
    }

    /// Gives up after `batches` batches even if the stop condition was never
    /// met.
    pub fn max_batches(mut self, batches: usize) -> Self {
        self.max_batches = Some(batches);
        self
    }

    /// Trains the network until the stop condition holds.
    ///
    /// Returns:
    ///   A summary of the training run, or an error if invalid training
    ///   parameters were provided.
    pub fn train(mut self) -> Result<TrainingSummary> {
        if self.epochs_per_batch == 0 {
            return Err(Error::InvalidHyperparameter {
                name: "epochs_per_batch",
                value: 0.0,
            });
        }
        check_positive("learning_rate", self.learning_rate)?;
        if self.network.training_set_count() == 0 {
            return Err(Error::EmptyDataset);
        }

        let start_time = Instant::now();
        let mut batches = 0;
        let mut accuracy;
        let converged = loop {
            accuracy = self
                .network
                .train(self.epochs_per_batch, self.learning_rate)?;
            batches += 1;
            info!(batch = batches, accuracy, "finished batch");

            if self.stop_condition.should_stop(batches, accuracy, start_time) {
                break true;
            }
            if self.max_batches.map_or(false, |max| batches >= max) {
                break false;
            }
        };

        let summary = TrainingSummary {
            batches,
            epochs: batches * self.epochs_per_batch,
            accuracy,
            elapsed: start_time.elapsed(),
            converged,
        };
        info!(
            batches = summary.batches,
            epochs = summary.epochs,
            accuracy = summary.accuracy,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            converged = summary.converged,
            "training complete"
        );
        Ok(summary)
    }
}

/// The outcome of `Trainer::train`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrainingSummary {
    /// Number of batches run.
    pub batches: usize,
    /// Total number of epochs run.
    pub epochs: usize,
    /// Accuracy after the final batch.
    pub accuracy: f64,
    pub elapsed: Duration,
    /// Whether the stop condition was met, rather than the batch limit.
    pub converged: bool,
}

/// When to stop training
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StopCondition {
    /// Stops once the accuracy rises above the provided threshold
    Accuracy(f64),
    /// Stops after the provided number of batches
    Batches(usize),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true if training is complete.
    fn should_stop(&self, batch: usize, accuracy: f64, start_time: Instant) -> bool {
        match *self {
            StopCondition::Accuracy(threshold) => accuracy > threshold,
            StopCondition::Batches(batches) => batch >= batches,
            StopCondition::Duration(duration) => start_time.elapsed() >= duration,
        }
    }
}
