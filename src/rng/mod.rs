//! Random streams
//!
//! Every stochastic component takes an explicit generator (`&mut R where
//! R: Rng`) instead of touching process-wide state. A run owns one stream
//! seeded from its configuration; parallel work gets independent child
//! streams whose seeds are drawn up front from the parent, so results do
//! not depend on thread scheduling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator used throughout the crate
pub type RandomStream = StdRng;

/// Create a stream from a seed
///
/// Using the same seed will produce the same sequence of random values.
pub fn seeded(seed: u64) -> RandomStream {
    StdRng::seed_from_u64(seed)
}

/// Draw `count` child seeds from a parent stream
///
/// The seeds are drawn sequentially, so the i-th child stream is the same
/// however the children are later scheduled.
pub fn child_seeds<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<u64> {
    (0..count).map(|_| rng.gen::<u64>()).collect()
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
