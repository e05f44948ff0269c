//! Per-stage hit/miss counters and sampled prefetch latencies (C7).
//!
//! Transliterated from `examples/original_source/src/lib/utils/profiler.cpp`'s
//! `PrefetchProfiler`/`StepSpecifier` into owned `Vec`s with `serde`
//! derives in place of `nlohmann::json`. Stage `k` is the prefetch
//! issued for the `k`-th chain-node comparison (0-indexed), so stage 0
//! is visited exactly once per request and deeper stages only for
//! requests whose chain walk goes further.
use serde::Serialize;

use crate::prefetch::cycle_counter;

#[derive(Default, Clone, Copy, Serialize)]
struct StepCounters {
    hits: u64,
    misses: u64,
}

pub struct Profiler {
    classifications: Vec<StepCounters>,
    /// `latencies[sample][stage]`, sampled every `sampling_mask + 1`-th
    /// prefetch to avoid perturbing throughput.
    latencies: Vec<Vec<u16>>,
    sample_id: usize,
    sampling_counter: u64,
    sampling_mask: u64,
    /// Cycle threshold used to classify a prefetch as a hit vs a miss.
    /// Platform-specific (44 cycles on the source repo's test machine);
    /// exposed as configuration per the spec's Open Question and never
    /// treated as authoritative.
    threshold_cycles: u16,
}

impl Profiler {
    pub fn new(depth: usize, samples: usize, threshold_cycles: u16) -> Self {
        Profiler {
            classifications: vec![StepCounters::default(); depth],
            latencies: vec![vec![0u16; depth]; samples],
            sample_id: 0,
            sampling_counter: 0,
            sampling_mask: 1023,
            threshold_cycles,
        }
    }

    /// Mark the moment a prefetch is issued; pass the returned timestamp
    /// to [`Self::record_use`] at the point the prefetched line is
    /// actually read.
    pub fn begin_prefetch(&self) -> u64 {
        cycle_counter()
    }

    /// Record that the line prefetched at `issued_at` (see
    /// [`Self::begin_prefetch`]) was consumed at stage `stage`,
    /// classifying it as a hit/miss against `threshold_cycles` and
    /// sampling the latency on every `sampling_mask + 1`-th call.
    pub fn record_use(&mut self, stage: usize, issued_at: u64) {
        if stage >= self.classifications.len() {
            // Chains deeper than the configured profiling depth are not
            // instrumented; this never affects correctness.
            return;
        }
        let latency = cycle_counter().saturating_sub(issued_at) as u16;

        if self.sampling_counter & self.sampling_mask == 0 {
            self.latencies[self.sample_id][stage] = latency;
            self.sample_id = (self.sample_id + 1) % self.latencies.len();
        }
        self.sampling_counter = self.sampling_counter.wrapping_add(1);

        if latency <= self.threshold_cycles {
            self.classifications[stage].hits += 1;
        } else {
            self.classifications[stage].misses += 1;
        }
    }

    pub fn reset(&mut self) {
        for c in &mut self.classifications {
            *c = StepCounters::default();
        }
        for sample in &mut self.latencies {
            sample.iter_mut().for_each(|v| *v = 0);
        }
        self.sample_id = 0;
        self.sampling_counter = 0;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            hits: self.classifications.iter().map(|c| c.hits).collect(),
            misses: self.classifications.iter().map(|c| c.misses).collect(),
            depth: self.classifications.len(),
            latencies: self.latencies.clone(),
        }
    }
}

/// A serializable point-in-time view of a [`Profiler`]'s counters.
#[derive(Serialize, Clone)]
pub struct Snapshot {
    pub hits: Vec<u64>,
    pub misses: Vec<u64>,
    pub depth: usize,
    pub latencies: Vec<Vec<u16>>,
}
