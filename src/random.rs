//! Seeded random-number streams.
//!
//! Every runner owns exactly one stream created here, so two runs with
//! the same seed replay identically and concurrent runs never share state.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic RNG from a 64-bit seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
