//! Activation function types.

use crate::error::Error;

use std::fmt;
use std::str::FromStr;

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activator {
    /// Rectified Linear Unit
    ReLU,
    /// Hyperbolic tan function
    TanH,
}

impl Default for Activator {
    fn default() -> Self {
        Activator::ReLU
    }
}

impl Activator {
    /// Evaluates `f(x)` for the selected the activation function.
    pub fn f(self, x: f64) -> f64 {
        match self {
            Activator::ReLU => if x > 0.0 { x } else { 0.0 },
            Activator::TanH => x.tanh(),
        }
    }

    /// Evaluates the gradient used during backpropagation.
    ///
    /// Note that this function takes in the *output* of the activation
    /// function, rather than the input, so layers never have to keep their
    /// weighted sums around. For `TanH` the gradient formula is applied to the
    /// output value directly, i.e. `1 - tanh(y)^2`.
    pub fn fprime(self, y: f64) -> f64 {
        match self {
            Activator::ReLU => if y > 0.0 { 1.0 } else { 0.0 },
            Activator::TanH => 1.0 - y.tanh().powi(2),
        }
    }
}

impl fmt::Display for Activator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Activator::ReLU => write!(f, "ReLU"),
            Activator::TanH => write!(f, "TanH"),
        }
    }
}

impl FromStr for Activator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relu" => Ok(Activator::ReLU),
            "tanh" => Ok(Activator::TanH),
            _ => Err(Error::UnknownActivator(s.to_owned())),
        }
    }
}
