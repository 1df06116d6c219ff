//! Injectable randomness for the decorative generators.
//!
//! Every random draw in the tree, petal, confetti and gallery code goes through
//! [`RandomSource`] so tests can run against a fixed seed (or a scripted source)
//! and assert structure without depending on particular draws.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform draw in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Integer draw in `lo..=hi`.
    fn count(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo + 1) as f64;
        lo + ((self.next_f64() * span).floor() as u32).min(hi - lo)
    }
}

impl RandomSource for SmallRng {
    fn next_f64(&mut self) -> f64 {
        self.r#gen::<f64>()
    }
}

/// Deterministic source for a fixed seed.
pub fn seeded(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Source seeded from the host's entropy. Falls back to a clock-derived seed
/// when the host refuses (the fallback only needs to vary between page loads).
pub fn from_host_entropy() -> SmallRng {
    let mut buf = [0u8; 8];
    let seed = match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(err) => {
            log::warn!("event=rng_fallback module=rng reason={err}");
            clock_seed()
        }
    };
    seeded(seed)
}

fn clock_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    let now = js_sys::Date::now();
    #[cfg(not(target_arch = "wasm32"))]
    let now = 0.0;
    // LCG step so neighbouring timestamps give unrelated seeds.
    (now as u64)
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    /// Returns the scripted values in order, cycling when exhausted.
    pub struct Scripted {
        values: Vec<f64>,
        idx: usize,
    }

    impl Scripted {
        pub fn new(values: &[f64]) -> Self {
            assert!(!values.is_empty());
            Self {
                values: values.to_vec(),
                idx: 0,
            }
        }
    }

    impl RandomSource for Scripted {
        fn next_f64(&mut self) -> f64 {
            let v = self.values[self.idx % self.values.len()];
            self.idx += 1;
            v
        }
    }
}
