//! Non-binding cache-line prefetch hint.
//!
//! Mirrors `ptr_hash_patched::util::prefetch_index`: a single intrinsic call
//! behind a target-arch cfg, no-op everywhere else. Correctness never
//! depends on the hint firing, so the address is allowed to be
//! speculative or past-the-end.

/// Hint the memory subsystem to start loading the cache line containing
/// `ptr` into L1. `ptr` need not be valid; this never dereferences it.
#[inline(always)]
pub fn prefetch<T>(ptr: *const T) {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        std::arch::x86_64::_mm_prefetch(ptr as *const i8, std::arch::x86_64::_MM_HINT_T0);
    }
    #[cfg(target_arch = "x86")]
    unsafe {
        std::arch::x86::_mm_prefetch(ptr as *const i8, std::arch::x86::_MM_HINT_T0);
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
    {
        // No software prefetch hint on this target; correctness is
        // unaffected, only the throughput advantage is lost.
        let _ = ptr;
    }
}

/// Best-effort cycle counter used by the profiler's latency sampling.
/// Falls back to a nanosecond `Instant`-derived counter on targets
/// without `rdtsc`; sampled values are a hint, never load-bearing for
/// correctness (see `profiler`'s exact-accounting property).
#[inline(always)]
pub fn cycle_counter() -> u64 {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        std::arch::x86_64::_rdtsc()
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        use std::time::Instant;
        thread_local! {
            static EPOCH: Instant = Instant::now();
        }
        EPOCH.with(|e| e.elapsed().as_nanos() as u64)
    }
}
