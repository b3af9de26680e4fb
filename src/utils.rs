//! Random initialization helpers.
//!
//! Every helper takes its random source as a parameter so callers can swap in
//! a seeded generator for reproducible runs.

use rand::distributions::{Distribution, Uniform};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;

/// Returns a sampler for `range`, or `None` if the range is empty.
fn sampler(range: &Range<f64>) -> Option<Uniform<f64>> {
    if range.start < range.end {
        Some(Uniform::new(range.start, range.end))
    } else {
        None
    }
}

/// Draws a single value uniformly from `range`.
///
/// An empty range always yields `range.start`.
pub fn random_scalar<R>(rng: &mut R, range: Range<f64>) -> f64
where
    R: Rng + ?Sized,
{
    match sampler(&range) {
        Some(dist) => dist.sample(rng),
        None => range.start,
    }
}

/// Draws `len` values uniformly from `range`.
pub fn random_vec<R>(rng: &mut R, len: usize, range: Range<f64>) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    match sampler(&range) {
        Some(dist) => (0..len).map(|_| dist.sample(rng)).collect(),
        None => vec![range.start; len],
    }
}

/// Shuffles `order` in place; every permutation is equally likely.
pub fn shuffle<T, R>(order: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    order.shuffle(rng);
}
