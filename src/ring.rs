//! Fixed-capacity round-robin of in-flight request slots.
//!
//! Generalizes the two parallel fixed arrays (`next_hashes`, `next_buckets`)
//! that `PtrHash::index_stream` cycles through into a single slot type per
//! cell. Single-threaded, no synchronization: the ring is owned
//! exclusively by the executor invoking it.

pub struct Ring<T> {
    slots: Vec<T>,
    cursor: usize,
}

impl<T> Ring<T> {
    pub fn new(capacity: usize, mut make_slot: impl FnMut(usize) -> T) -> Self {
        assert!(capacity > 0, "ring capacity must be nonzero");
        let slots = (0..capacity).map(&mut make_slot).collect();
        Ring { slots, cursor: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slot at the current cursor and advances the cursor
    /// modulo `capacity`. Between two visits to the same slot, exactly
    /// `capacity - 1` other slots are visited, bounding the prefetch
    /// overlap window.
    #[inline]
    pub fn next(&mut self) -> &mut T {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.slots.len();
        &mut self.slots[index]
    }
}
