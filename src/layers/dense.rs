use crate::activator::Activator;
use crate::error::{check_len, check_positive, Result};
use crate::matrix::Mat;
use crate::utils;

use itertools::multizip;
use rand::Rng;

/// A wrapper for a fully connected layer of a neural network
///
/// Alongside its parameters, the layer keeps the output and error signal of
/// the most recent forward and backward passes, so the owning network can
/// chain layers without allocating intermediate buffers.
#[derive(Clone, Debug)]
pub struct DenseLayer {
    /// The activation function to be used for every node in the layer.
    activator: Activator,
    /// The last computed activation of every node.
    output: Vec<f64>,
    /// The last computed error signal of every node.
    error: Vec<f64>,
    /// One additive bias per node.
    bias: Vec<f64>,
    /// The layer weights, with each node's weights stored as a row.
    weights: Mat,
}

impl DenseLayer {
    /// Initializes a new, untrained layer.
    ///
    /// Arguments:
    ///
    ///  * `node_count` - the number of nodes, i.e. outputs, of this layer.
    ///  * `weight_count` - the number of weights per node, i.e. inputs to this
    ///                     layer.
    ///  * `activator` - the activation function to be used for this layer's
    ///                  output.
    ///  * `rng` - the random source for the initial bias and weights, which are
    ///            drawn uniformly from `[0, 1)`.
    pub fn new<R>(
        node_count: usize,
        weight_count: usize,
        activator: Activator,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        DenseLayer {
            activator,
            output: vec![0.0; node_count],
            error: vec![0.0; node_count],
            bias: utils::random_vec(rng, node_count, 0.0..1.0),
            weights: Mat::random(rng, node_count, weight_count, 0.0..1.0),
        }
    }

    /// Returns the number of nodes in this layer.
    pub fn node_count(&self) -> usize {
        self.output.len()
    }

    /// Returns the number of weights per node in this layer.
    pub fn weight_count(&self) -> usize {
        self.weights.cols()
    }

    pub fn activator(&self) -> Activator {
        self.activator
    }

    pub fn output(&self) -> &[f64] {
        &self.output
    }

    pub fn error(&self) -> &[f64] {
        &self.error
    }

    pub fn bias(&self) -> &[f64] {
        &self.bias
    }

    pub fn weights(&self) -> &Mat {
        &self.weights
    }

    /// Feeds the provided `input` forward through the layer, overwriting its
    /// output.
    pub fn feedforward(&mut self, input: &[f64]) -> Result<()> {
        check_len("feedforward input", self.weight_count(), input.len())?;
        self.forward(input);
        Ok(())
    }

    /// Computes the error signal of an output layer from the `reference`
    /// values it should have produced.
    pub fn backpropagate_output(&mut self, reference: &[f64]) -> Result<()> {
        check_len("backpropagation reference", self.node_count(), reference.len())?;
        let activator = self.activator;
        for (e, y, r) in multizip((
            self.error.iter_mut(),
            self.output.iter(),
            reference.iter(),
        )) {
            *e = (r - y) * activator.fprime(*y);
        }
        Ok(())
    }

    /// Computes the error signal of a hidden layer from the error signal and
    /// weights of `next_layer`, which must consume this layer's output.
    pub fn backpropagate_hidden(&mut self, next_layer: &DenseLayer) -> Result<()> {
        check_len(
            "next layer weight count",
            self.node_count(),
            next_layer.weight_count(),
        )?;
        let activator = self.activator;
        for (i, (e, y)) in self.error.iter_mut().zip(self.output.iter()).enumerate() {
            let raw: f64 = next_layer
                .weights
                .iter_rows()
                .zip(next_layer.error.iter())
                .map(|(row, next_error)| next_error * row[i])
                .sum();
            *e = raw * activator.fprime(*y);
        }
        Ok(())
    }

    /// Adjusts the bias and weights along the stored error signal.
    ///
    /// `input` must be the same input that was fed forward before the error
    /// was computed.
    pub fn optimize(&mut self, input: &[f64], learning_rate: f64) -> Result<()> {
        check_len("optimization input", self.weight_count(), input.len())?;
        check_positive("learning_rate", learning_rate)?;
        for (i, (bias, error)) in self.bias.iter_mut().zip(self.error.iter()).enumerate() {
            let step = error * learning_rate;
            *bias += step;
            for (w, x) in self.weights.row_mut(i).iter_mut().zip(input) {
                *w += step * x;
            }
        }
        Ok(())
    }

    /// Unchecked forward pass; callers validate the input length.
    pub(crate) fn forward(&mut self, input: &[f64]) {
        debug_assert_eq!(input.len(), self.weight_count());
        let activator = self.activator;
        for (y, bias, row) in multizip((
            self.output.iter_mut(),
            self.bias.iter(),
            self.weights.iter_rows(),
        )) {
            let sum: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum();
            *y = activator.f(bias + sum);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layer(node_count: usize, weight_count: usize, activator: Activator) -> DenseLayer {
        DenseLayer::new(
            node_count,
            weight_count,
            activator,
            &mut StdRng::seed_from_u64(11),
        )
    }

    /// Builds a layer with hand-picked parameters.
    fn fixed(activator: Activator, bias: Vec<f64>, weights: &[&[f64]]) -> DenseLayer {
        let mut layer = layer(bias.len(), weights[0].len(), activator);
        layer.bias = bias;
        for (i, row) in weights.iter().enumerate() {
            layer.weights.row_mut(i).copy_from_slice(row);
        }
        layer
    }

    #[test]
    fn new_layer_has_consistent_shape() {
        let layer = layer(3, 5, Activator::ReLU);
        assert_eq!(layer.node_count(), 3);
        assert_eq!(layer.weight_count(), 5);
        assert_eq!(layer.output(), &[0.0; 3]);
        assert_eq!(layer.error(), &[0.0; 3]);
        assert_eq!(layer.bias().len(), 3);
        assert!(layer.bias().iter().all(|&b| b >= 0.0 && b < 1.0));
        assert_eq!(layer.weights().rows(), 3);
        for row in layer.weights().iter_rows() {
            assert_eq!(row.len(), 5);
            assert!(row.iter().all(|&w| w >= 0.0 && w < 1.0));
        }
    }

    #[test]
    fn feedforward_computes_weighted_sum() {
        let mut layer = fixed(Activator::ReLU, vec![0.5, -4.0], &[&[1.0, 2.0], &[1.0, 1.0]]);
        layer.feedforward(&[1.0, 0.5]).unwrap();
        // 0.5 + 1 + 1 = 2.5; -4 + 1 + 0.5 < 0 is clamped.
        assert_abs_diff_eq!(layer.output()[0], 2.5, epsilon = 1e-12);
        assert_eq!(layer.output()[1], 0.0);
    }

    #[test]
    fn feedforward_applies_tanh() {
        let mut layer = fixed(Activator::TanH, vec![0.1], &[&[0.3]]);
        layer.feedforward(&[2.0]).unwrap();
        assert_abs_diff_eq!(layer.output()[0], 0.7f64.tanh(), epsilon = 1e-12);
    }

    #[test]
    fn feedforward_rejects_wrong_input_length() {
        let mut layer = layer(2, 3, Activator::ReLU);
        let err = layer.feedforward(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            Error::ShapeMismatch {
                context: "feedforward input",
                expected: 3,
                actual: 2,
            }
        );
        assert_eq!(layer.output(), &[0.0, 0.0]);
    }

    #[test]
    fn output_error_follows_reference() {
        let mut layer = fixed(Activator::ReLU, vec![1.0, 1.0], &[&[0.0], &[0.0]]);
        layer.feedforward(&[0.0]).unwrap();
        layer.backpropagate_output(&[3.0, 0.5]).unwrap();
        assert_abs_diff_eq!(layer.error()[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(layer.error()[1], -0.5, epsilon = 1e-12);
    }

    #[test]
    fn output_error_sign_matches_raw_error_for_tanh() {
        let mut layer = layer(4, 2, Activator::TanH);
        layer.feedforward(&[0.3, -0.7]).unwrap();
        let reference = [1.0, -1.0, 0.0, 0.5];
        layer.backpropagate_output(&reference).unwrap();
        for (i, r) in reference.iter().enumerate() {
            let raw = r - layer.output()[i];
            assert_eq!(layer.error()[i].signum(), raw.signum());
        }
    }

    #[test]
    fn inactive_relu_nodes_have_no_error() {
        let mut layer = fixed(Activator::ReLU, vec![-1.0], &[&[0.0]]);
        layer.feedforward(&[1.0]).unwrap();
        layer.backpropagate_output(&[5.0]).unwrap();
        assert_eq!(layer.error(), &[0.0]);
    }

    #[test]
    fn output_error_rejects_wrong_reference_length() {
        let mut layer = layer(2, 2, Activator::ReLU);
        assert!(layer.backpropagate_output(&[1.0]).is_err());
        assert_eq!(layer.error(), &[0.0, 0.0]);
    }

    #[test]
    fn hidden_error_uses_next_layer_weights() {
        let mut hidden = fixed(Activator::ReLU, vec![1.0, 2.0], &[&[0.0], &[0.0]]);
        let mut output = fixed(Activator::ReLU, vec![0.0], &[&[0.5, -2.0]]);
        hidden.feedforward(&[0.0]).unwrap();
        output.feedforward(hidden.output()).unwrap();
        // 0.5 * 1 - 2 * 2 = -3.5 is clamped to zero.
        assert_eq!(output.output(), &[0.0]);
        output.error = vec![2.0];
        hidden.backpropagate_hidden(&output).unwrap();
        assert_abs_diff_eq!(hidden.error()[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hidden.error()[1], -4.0, epsilon = 1e-12);
    }

    #[test]
    fn hidden_error_sums_over_next_layer_nodes() {
        let mut hidden = fixed(Activator::TanH, vec![0.0], &[&[1.0]]);
        let mut next = fixed(Activator::ReLU, vec![0.0, 0.0], &[&[2.0], &[3.0]]);
        hidden.feedforward(&[0.5]).unwrap();
        next.error = vec![1.0, -1.0];
        hidden.backpropagate_hidden(&next).unwrap();
        let y = 0.5f64.tanh();
        let expected = (2.0 - 3.0) * Activator::TanH.fprime(y);
        assert_abs_diff_eq!(hidden.error()[0], expected, epsilon = 1e-12);
    }

    #[test]
    fn hidden_error_rejects_mismatched_next_layer() {
        let mut hidden = layer(3, 2, Activator::ReLU);
        let next = layer(1, 4, Activator::ReLU);
        let err = hidden.backpropagate_hidden(&next).unwrap_err();
        assert_eq!(
            err,
            Error::ShapeMismatch {
                context: "next layer weight count",
                expected: 3,
                actual: 4,
            }
        );
    }

    #[test]
    fn optimize_steps_along_error() {
        let mut layer = fixed(Activator::ReLU, vec![0.0, 1.0], &[&[1.0, 1.0], &[0.0, 0.0]]);
        layer.error = vec![2.0, -1.0];
        layer.optimize(&[1.0, 0.5], 0.1).unwrap();
        assert_abs_diff_eq!(layer.bias()[0], 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(layer.bias()[1], 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(layer.weights()[(0, 0)], 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(layer.weights()[(0, 1)], 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(layer.weights()[(1, 0)], -0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(layer.weights()[(1, 1)], -0.05, epsilon = 1e-12);
    }

    #[test]
    fn optimize_rejects_bad_arguments_without_mutation() {
        let mut layer = layer(2, 2, Activator::ReLU);
        layer.error = vec![1.0, 1.0];
        let before = layer.clone();

        assert!(layer.optimize(&[1.0], 0.1).is_err());
        assert_eq!(
            layer.optimize(&[1.0, 1.0], 0.0).unwrap_err(),
            Error::InvalidHyperparameter {
                name: "learning_rate",
                value: 0.0,
            }
        );
        assert!(layer.optimize(&[1.0, 1.0], -0.5).is_err());
        assert_eq!(layer.bias(), before.bias());
        assert_eq!(layer.weights(), before.weights());
    }

    #[test]
    fn single_step_reduces_output_error() {
        let mut layer = fixed(Activator::ReLU, vec![0.2], &[&[0.3, 0.4]]);
        let input = [1.0, 1.0];
        layer.feedforward(&input).unwrap();
        let before = (1.0 - layer.output()[0]).abs();
        layer.backpropagate_output(&[1.0]).unwrap();
        layer.optimize(&input, 0.1).unwrap();
        layer.feedforward(&input).unwrap();
        assert!((1.0 - layer.output()[0]).abs() < before);
    }
}
