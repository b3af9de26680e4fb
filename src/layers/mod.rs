//! Layer implementations.

pub mod dense;

pub use self::dense::DenseLayer;
