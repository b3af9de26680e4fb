//! A single-hidden-layer feedforward network trained by stochastic gradient
//! descent, implemented without any numeric library.
//!
//! See [`feed_forward`] for a worked example.

#[macro_use]
extern crate serde_derive;

pub mod activator;
pub mod error;
pub mod feed_forward;
pub mod layers;
pub mod linear_regression;
pub mod matrix;
pub mod trainer;
pub mod utils;

pub use crate::error::{Error, Result};
