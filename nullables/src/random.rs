//! Nullable random — deterministic random bytes.

use ergauth_crypto::RandomSource;
use std::sync::Mutex;

/// A deterministic byte source for testing.
///
/// Each call fills the destination with the next pre-configured seed byte,
/// cycling through the list.
pub struct NullRandom {
    seeds: Vec<u8>,
    index: Mutex<usize>,
}

impl NullRandom {
    /// Create with a sequence of fill bytes, used in order.
    pub fn new(seeds: Vec<u8>) -> Self {
        assert!(!seeds.is_empty(), "NullRandom needs at least one seed");
        Self {
            seeds,
            index: Mutex::new(0),
        }
    }

    /// Create with a single value that will be used for every call.
    pub fn constant(value: u8) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for NullRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        let mut idx = self.index.lock().unwrap();
        let seed = self.seeds[*idx % self.seeds.len()];
        *idx += 1;
        dest.fill(seed);
    }
}
