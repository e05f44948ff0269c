//! Request-vector generators for the benchmark driver.
//!
//! Grounded on `hashmap_benchmark.cpp`'s `uniform_int_distribution` /
//! `zipfian_int_distribution` pair, using `rand`/`rand_distr` (both
//! already depended on elsewhere in this corpus, e.g.
//! `ptr_hash_patched`'s `rand` and the Zipf-benchmarking crates in
//! `other_examples/manifests`) instead of hand-rolling a sampler.

use rand::distr::Distribution;
use rand::Rng;
use rand_distr::Zipf;

use crate::error::{EngineError, Result};

#[derive(Clone, Copy, Debug)]
pub struct ZipfParams {
    pub min: u32,
    pub max: u32,
    pub skew: f64,
    pub offset: u32,
}

impl ZipfParams {
    pub fn validate(&self) -> Result<()> {
        if self.min > self.max {
            return Err(EngineError::InvalidConfiguration(
                "zipfian min must be <= max".into(),
            ));
        }
        if self.skew <= 0.0 {
            return Err(EngineError::InvalidConfiguration(
                "zipfian skew must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Distribution1 {
    Uniform { max: u32 },
    Zipfian(ZipfParams),
}

/// Fills `out` with `out.len()` keys drawn from `dist`, bounded to
/// `0..num_keys` so every generated key is guaranteed present in a table
/// pre-filled with `0..num_keys`.
pub fn fill(dist: Distribution1, num_keys: u32, out: &mut [u32], rng: &mut impl Rng) {
    match dist {
        Distribution1::Uniform { max } => {
            let bound = max.max(1);
            for slot in out.iter_mut() {
                *slot = rng.random_range(0..bound);
            }
        }
        Distribution1::Zipfian(p) => {
            let span = (p.max - p.min).max(1) as u64;
            let zipf = Zipf::new(span as f64, p.skew).expect("validated zipfian parameters");
            for slot in out.iter_mut() {
                let sample = zipf.sample(rng) as u32;
                let key = p.min.saturating_add(sample).saturating_add(p.offset);
                *slot = key % num_keys.max(1);
            }
        }
    }
}
