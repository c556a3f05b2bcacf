//! Reuse pool for [`WorkerState`] objects.
//!
//! Idle states are kept in a small number of cache-padded stripes. Each OS
//! thread is assigned a home stripe the first time it touches any pool, so
//! in steady state a thread pops the state it pushed on its previous call and
//! stripe locks are effectively uncontended. When the home stripe is empty
//! the other stripes are probed with `try_lock` before a new state is
//! created, so acquisition never blocks behind a busy neighbour.

use core::ops::{Deref, DerefMut};

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use portable_atomic::{AtomicUsize, Ordering};

use crate::{SHARD_COUNT, WorkerState};

/// Number of independent idle lists in a [`WorkerPool`].
pub const POOL_STRIPES: usize = 16;

static NEXT_STRIPE: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static HOME_STRIPE: usize = NEXT_STRIPE.fetch_add(1, Ordering::Relaxed) % POOL_STRIPES;
}

fn home_stripe() -> usize {
    HOME_STRIPE.with(|stripe| *stripe)
}

/// A concurrent pool handing out exclusively owned [`WorkerState`]s.
///
/// [`Self::acquire`] never blocks on an empty pool: it creates a new state,
/// binding it to the next shard in round-robin order so that affinities
/// spread evenly over all [`SHARD_COUNT`] shards no matter which thread
/// triggers creation. Growth is unbounded but settles at roughly the peak
/// number of concurrent callers, since every state returns after one
/// allocation.
#[derive(Debug)]
pub struct WorkerPool {
    stripes: [CachePadded<Mutex<Vec<WorkerState>>>; POOL_STRIPES],
    next_shard: AtomicUsize,
    created: AtomicUsize,
    buffer_size: usize,
}

impl WorkerPool {
    /// Creates an empty pool whose states carry `buffer_size`-byte entropy
    /// buffers.
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        Self {
            stripes: core::array::from_fn(|_| CachePadded::new(Mutex::new(Vec::new()))),
            next_shard: AtomicUsize::new(0),
            created: AtomicUsize::new(0),
            buffer_size,
        }
    }

    /// Checks out a state, reusing an idle one when available.
    ///
    /// The returned guard gives exclusive access and puts the state back into
    /// the pool when dropped, including on error and unwind paths.
    pub fn acquire(&self) -> PooledWorker<'_> {
        let home = home_stripe();

        if let Some(state) = self.stripes[home].lock().pop() {
            return PooledWorker::new(self, state);
        }

        for offset in 1..POOL_STRIPES {
            let stripe = &self.stripes[(home + offset) % POOL_STRIPES];
            if let Some(mut idle) = stripe.try_lock() {
                if let Some(state) = idle.pop() {
                    return PooledWorker::new(self, state);
                }
            }
        }

        PooledWorker::new(self, self.create())
    }

    /// Returns `state` to the calling thread's home stripe.
    pub(crate) fn release(&self, state: WorkerState) {
        self.stripes[home_stripe()].lock().push(state);
    }

    /// Number of idle states currently held by the pool.
    #[must_use]
    pub fn available(&self) -> usize {
        self.stripes.iter().map(|stripe| stripe.lock().len()).sum()
    }

    /// Number of states this pool has ever created.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    #[cold]
    fn create(&self) -> WorkerState {
        let shard = self.next_shard.fetch_add(1, Ordering::Relaxed) % SHARD_COUNT;
        let _total = self.created.fetch_add(1, Ordering::Relaxed) + 1;

        #[cfg(feature = "tracing")]
        tracing::trace!(shard, total = _total, "created worker state");

        WorkerState::new(shard, self.buffer_size)
    }
}

/// A [`WorkerState`] checked out of a [`WorkerPool`].
///
/// Dereferences to the state and releases it back to the pool on drop.
#[derive(Debug)]
pub struct PooledWorker<'a> {
    pool: &'a WorkerPool,
    state: WorkerState,
}

impl<'a> PooledWorker<'a> {
    const fn new(pool: &'a WorkerPool, state: WorkerState) -> Self {
        Self { pool, state }
    }
}

impl Deref for PooledWorker<'_> {
    type Target = WorkerState;

    fn deref(&self) -> &WorkerState {
        &self.state
    }
}

impl DerefMut for PooledWorker<'_> {
    fn deref_mut(&mut self) -> &mut WorkerState {
        &mut self.state
    }
}

impl Drop for PooledWorker<'_> {
    fn drop(&mut self) {
        let state = core::mem::replace(&mut self.state, WorkerState::placeholder());
        self.pool.release(state);
    }
}
