//! Process-wide generators.
//!
//! The first call to [`generate_v7_fast`] (or [`global_clock`]) starts a
//! shared [`CachedClock`] and builds a [`ShardedV7Generator`] on top of it.
//! Both live for the rest of the process; [`stop_global_clock`] ends the
//! refresh thread, after which the generator keeps working on direct clock
//! reads.

use std::sync::LazyLock;

use crate::{
    CachedClock, LazyV7Generator, OsEntropy, Result, ShardedV7Generator, SystemClock, Uuid,
    V4Generator,
};

static GLOBAL_CLOCK: LazyLock<CachedClock> = LazyLock::new(CachedClock::start);

static GLOBAL_V7: LazyLock<ShardedV7Generator<&'static CachedClock, OsEntropy>> =
    LazyLock::new(|| ShardedV7Generator::new(&*GLOBAL_CLOCK, OsEntropy));

static GLOBAL_V7_LAZY: LazyV7Generator<SystemClock, OsEntropy> =
    LazyV7Generator::new(SystemClock, OsEntropy);

static GLOBAL_V4: V4Generator<OsEntropy> = V4Generator::new(OsEntropy);

/// Generates a UUIDv7 from the process-wide sharded generator.
///
/// # Errors
///
/// See [`ShardedV7Generator::generate`].
///
/// # Example
/// ```
/// let a = swiftuuid::generate_v7_fast().unwrap();
/// let b = swiftuuid::generate_v7_fast().unwrap();
/// assert_eq!(a.version(), 7);
/// assert_ne!(a, b);
/// ```
pub fn generate_v7_fast() -> Result<Uuid> {
    GLOBAL_V7.generate()
}

/// Generates a UUIDv7 without caching, counting or pooling.
///
/// # Errors
///
/// Returns [`Error::EntropyUnavailable`] if the OS entropy source fails.
///
/// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
pub fn generate_v7_lazy() -> Result<Uuid> {
    GLOBAL_V7_LAZY.generate()
}

/// Generates a fully random UUIDv4.
///
/// # Errors
///
/// Returns [`Error::EntropyUnavailable`] if the OS entropy source fails.
///
/// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
pub fn generate_v4() -> Result<Uuid> {
    GLOBAL_V4.generate()
}

/// The clock behind [`generate_v7_fast`], started on first use.
pub fn global_clock() -> &'static CachedClock {
    &GLOBAL_CLOCK
}

/// Stops the global clock's refresh thread.
///
/// Subsequent [`generate_v7_fast`] calls read the system clock directly.
/// Stopping is permanent for the life of the process.
pub fn stop_global_clock() {
    GLOBAL_CLOCK.stop();
}
