use crate::{EntropySource, Result};

/// Per-worker context checked out of a [`WorkerPool`] for one allocation.
///
/// Holds a fixed shard affinity and a buffer of pre-fetched random bytes that
/// is consumed front to back and overwritten in place when it runs dry.
/// Exclusively owned while checked out, so no field needs synchronization.
///
/// [`WorkerPool`]: crate::WorkerPool
pub struct WorkerState {
    shard: usize,
    buffer: Box<[u8]>,
    cursor: usize,
}

impl core::fmt::Debug for WorkerState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WorkerState")
            .field("shard", &self.shard)
            .field("capacity", &self.buffer.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl WorkerState {
    /// Creates a state bound to `shard` with an empty buffer of
    /// `buffer_size` bytes. The first [`Self::next_bytes`] call fills it.
    #[must_use]
    pub fn new(shard: usize, buffer_size: usize) -> Self {
        Self {
            shard,
            buffer: vec![0; buffer_size].into_boxed_slice(),
            cursor: buffer_size,
        }
    }

    /// Zero-capacity placeholder left behind when a state is moved out of
    /// its guard. Does not allocate.
    pub(crate) fn placeholder() -> Self {
        Self {
            shard: 0,
            buffer: Box::default(),
            cursor: 0,
        }
    }

    /// Index of the shard this state is bound to.
    #[must_use]
    pub const fn shard(&self) -> usize {
        self.shard
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Unconsumed bytes left in the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Returns the next `n` buffered random bytes, refilling the whole buffer
    /// from `entropy` first if fewer than `n` remain.
    ///
    /// # Errors
    ///
    /// Propagates the refill error. The buffer is then treated as exhausted,
    /// so the next call attempts a fresh refill.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the buffer capacity.
    pub fn next_bytes<E>(&mut self, entropy: &E, n: usize) -> Result<&[u8]>
    where
        E: EntropySource + ?Sized,
    {
        assert!(
            n <= self.buffer.len(),
            "requested {n} bytes from a {}-byte entropy buffer",
            self.buffer.len()
        );
        if self.remaining() < n {
            self.refill(entropy)?;
        }
        let start = self.cursor;
        self.cursor += n;
        Ok(&self.buffer[start..self.cursor])
    }

    #[cold]
    fn refill<E>(&mut self, entropy: &E) -> Result<()>
    where
        E: EntropySource + ?Sized,
    {
        #[cfg(feature = "tracing")]
        tracing::trace!(shard = self.shard, len = self.buffer.len(), "refilling entropy buffer");

        if let Err(err) = entropy.fill_bytes(&mut self.buffer) {
            self.cursor = self.buffer.len();
            return Err(err);
        }
        self.cursor = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::WorkerState;
    use crate::{EntropySource, Error, Result};
    use portable_atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Fills with the refill ordinal so consumed bytes reveal which refill
    /// produced them.
    #[derive(Default)]
    struct CountingEntropy {
        fills: AtomicUsize,
        fail: AtomicBool,
    }

    impl EntropySource for CountingEntropy {
        fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
            if self.fail.load(Ordering::Relaxed) {
                dest.fill(0xee);
                return Err(Error::entropy("mock failure"));
            }
            let n = self.fills.fetch_add(1, Ordering::Relaxed) + 1;
            dest.fill(n as u8);
            Ok(())
        }
    }

    #[test]
    fn first_use_fills_the_buffer() {
        let entropy = CountingEntropy::default();
        let mut state = WorkerState::new(3, 32);
        assert_eq!(state.remaining(), 0);
        assert_eq!(state.next_bytes(&entropy, 10).unwrap(), [1; 10]);
        assert_eq!(state.remaining(), 22);
        assert_eq!(state.shard(), 3);
        assert_eq!(entropy.fills.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn refills_only_when_request_does_not_fit() {
        let entropy = CountingEntropy::default();
        let mut state = WorkerState::new(0, 25);
        state.next_bytes(&entropy, 10).unwrap();
        state.next_bytes(&entropy, 10).unwrap();
        assert_eq!(entropy.fills.load(Ordering::Relaxed), 1);

        // 5 bytes left: not enough for 10, so the whole buffer is replaced.
        assert_eq!(state.next_bytes(&entropy, 10).unwrap(), [2; 10]);
        assert_eq!(state.remaining(), 15);

        // Exactly fitting requests drain the buffer without refilling.
        state.next_bytes(&entropy, 15).unwrap();
        assert_eq!(state.remaining(), 0);
        assert_eq!(entropy.fills.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn failed_refill_leaves_buffer_exhausted() {
        let entropy = CountingEntropy::default();
        let mut state = WorkerState::new(0, 16);
        state.next_bytes(&entropy, 10).unwrap();

        entropy.fail.store(true, Ordering::Relaxed);
        let err = state.next_bytes(&entropy, 10).unwrap_err();
        assert!(matches!(err, Error::EntropyUnavailable { .. }));
        assert_eq!(state.remaining(), 0);

        // Even a request that would have fit before the failure refills now.
        entropy.fail.store(false, Ordering::Relaxed);
        assert_eq!(state.next_bytes(&entropy, 4).unwrap(), [2; 4]);
    }

    #[test]
    #[should_panic(expected = "requested 11 bytes")]
    fn oversized_request_panics() {
        let mut state = WorkerState::new(0, 10);
        let _ = state.next_bytes(&CountingEntropy::default(), 11);
    }
}
