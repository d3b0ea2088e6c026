#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Injectable random strategies used by the carving system.
//!
//! Every consumer draws through [`RandomSource`], so tests can pin a seed and
//! replay identical mazes while production can opt into operating-system
//! entropy or a fair shuffle bag.

use rand::{rngs::OsRng, seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Strategy that picks uniformly distributed indices.
pub trait RandomSource {
    /// Returns an index in `0..len`.
    ///
    /// A `len` of zero or one always yields zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

/// Deterministic source backed by ChaCha8 and a 64-bit seed.
#[derive(Clone, Debug)]
pub struct SeededSource {
    rng: ChaCha8Rng,
}

impl SeededSource {
    /// Creates a source that replays the same sequence for the same seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Cryptographic source that reads from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntropySource;

impl RandomSource for EntropySource {
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        OsRng.gen_range(0..len)
    }
}

/// Without-replacement draw over a fixed option set.
///
/// Every index in `0..len` is returned exactly once before any index repeats.
/// Asking for a different `len` discards the current bag and starts a fresh one.
#[derive(Clone, Debug)]
pub struct ShuffleBag {
    bag: Vec<usize>,
    option_count: usize,
    rng: ChaCha8Rng,
}

impl ShuffleBag {
    /// Creates an empty bag whose shuffles are driven by the provided seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            bag: Vec::new(),
            option_count: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Number of draws left before the bag refills.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    fn refill(&mut self, len: usize) {
        self.bag.clear();
        self.bag.extend(0..len);
        self.bag.shuffle(&mut self.rng);
        self.option_count = len;
        log::trace!("shuffle bag refilled with {len} options");
    }
}

impl RandomSource for ShuffleBag {
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        if len != self.option_count || self.bag.is_empty() {
            self.refill(len);
        }
        self.bag.pop().unwrap_or(0)
    }
}

/// Selects which [`RandomSource`] implementation drives generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RandomMode {
    /// Deterministic ChaCha8 stream.
    #[default]
    Seeded,
    /// Operating-system entropy; the seed is ignored.
    Entropy,
    /// Fair without-replacement draws shuffled by a seeded stream.
    ShuffleBag,
}

impl RandomMode {
    /// Builds the boxed source for this mode.
    #[must_use]
    pub fn build(self, seed: u64) -> Box<dyn RandomSource> {
        match self {
            Self::Seeded => Box::new(SeededSource::new(seed)),
            Self::Entropy => Box::new(EntropySource),
            Self::ShuffleBag => Box::new(ShuffleBag::new(seed)),
        }
    }
}
