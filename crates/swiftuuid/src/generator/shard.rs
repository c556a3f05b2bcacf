use crossbeam_utils::CachePadded;
use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, MAX_TIMESTAMP, Result, TimeSource};

/// Number of independent monotonic counters.
pub const SHARD_COUNT: usize = 64;

/// Exclusive upper bound of the per-millisecond counter (12 bits).
pub const COUNTER_LIMIT: u16 = 1 << 12;

const COUNTER_BITS: u32 = 16;
const COUNTER_MASK: u64 = (1 << COUNTER_BITS) - 1;

#[inline]
const fn pack(last_ms: u64, counter: u16) -> u64 {
    (last_ms << COUNTER_BITS) | counter as u64
}

#[inline]
const fn unpack(state: u64) -> (u64, u16) {
    (state >> COUNTER_BITS, (state & COUNTER_MASK) as u16)
}

/// A fixed table of [`SHARD_COUNT`] lock-free `(last_ms, counter)` trackers.
///
/// Each shard owns a full cache line so that producers hammering adjacent
/// shards never invalidate each other's lines. The pair is packed into one
/// 64-bit word (`last_ms << 16 | counter`) and advanced with
/// compare-and-swap, so the counter reset on a new millisecond and a
/// concurrent increment can never interleave.
///
/// Ordering is only guaranteed within a shard. Identifiers from different
/// shards may share a millisecond and counter value and rely on their random
/// tail for uniqueness.
pub struct ShardTable {
    shards: [CachePadded<AtomicU64>; SHARD_COUNT],
}

impl Default for ShardTable {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ShardTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShardTable")
            .field("shards", &SHARD_COUNT)
            .finish()
    }
}

impl ShardTable {
    /// Creates a table with every shard at `(0, 0)`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shards: core::array::from_fn(|_| CachePadded::new(AtomicU64::new(0))),
        }
    }

    /// Returns the `(last_ms, counter)` currently recorded by `shard`.
    ///
    /// `shard` is taken modulo [`SHARD_COUNT`].
    #[must_use]
    pub fn snapshot(&self, shard: usize) -> (u64, u16) {
        unpack(self.shards[shard % SHARD_COUNT].load(Ordering::Acquire))
    }

    /// Claims the next `(timestamp, counter)` pair of `shard`.
    ///
    /// - If the clock is ahead of the shard, the shard moves to the new
    ///   millisecond and the counter restarts at `0`.
    /// - Otherwise (same millisecond, or the cache briefly behind) the counter
    ///   is incremented on the shard's recorded millisecond.
    /// - Once the counter has used all [`COUNTER_LIMIT`] values, the caller
    ///   yields, rereads the clock through [`TimeSource::fresh_millis`] and
    ///   retries with the fresher reading. This happens at most
    ///   `max_retries` times.
    ///
    /// Successive claims on one shard are strictly increasing as long as the
    /// clock does not move backwards past the shard's recorded millisecond.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockStalled`] if the shard stays saturated for
    /// `max_retries` rereads.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, time)))]
    pub fn advance<T>(&self, shard: usize, time: &T, max_retries: u32) -> Result<(u64, u16)>
    where
        T: TimeSource + ?Sized,
    {
        let shard = shard % SHARD_COUNT;
        let cell = &self.shards[shard];
        let mut floor = 0;
        let mut retries = 0;

        loop {
            let now = time.current_millis().max(floor) & MAX_TIMESTAMP;
            let current = cell.load(Ordering::Acquire);
            let (last_ms, counter) = unpack(current);

            let next = if now > last_ms {
                pack(now, 0)
            } else if counter + 1 < COUNTER_LIMIT {
                pack(last_ms, counter + 1)
            } else {
                if retries == max_retries {
                    return Err(Self::cold_stalled(shard, retries));
                }
                #[cfg(feature = "tracing")]
                if retries == 0 {
                    tracing::debug!(shard, last_ms, "shard counter saturated");
                }
                retries += 1;
                std::thread::yield_now();
                floor = time.fresh_millis();
                continue;
            };

            if cell
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Ok(unpack(next));
            }
            // Lost the race to another producer on this shard; retry.
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_stalled(shard: usize, retries: u32) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(shard, retries, "clock did not advance past saturated shard");
        Error::ClockStalled { shard, retries }
    }
}
