use core::time::Duration;
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use portable_atomic::{AtomicBool, AtomicU64, Ordering};

use crate::{SystemClock, TimeSource};

/// Default refresh period of the background task.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_micros(500);

/// State shared between clock handles and the refresh thread.
#[derive(Debug)]
struct SharedTickerInner {
    current: CachePadded<AtomicU64>,
    running: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for SharedTickerInner {
    fn drop(&mut self) {
        // The last reference may be released by the refresh thread itself, so
        // only wake it here. It observes the dead weak reference and exits.
        if let Some(handle) = self.handle.get_mut().take() {
            handle.thread().unpark();
        }
    }
}

/// A wall-clock time source served from a process-wide cache.
///
/// A dedicated background thread refreshes the cached millisecond roughly
/// every [`DEFAULT_REFRESH_INTERVAL`] (configurable), so readers pay one
/// relaxed atomic load instead of a clock syscall. The cached value trails the
/// wall clock by at most one refresh period and never moves backwards.
///
/// Handles are cheap to clone and share the same thread. The thread stops when
/// [`CachedClock::stop`] is called or when the last handle is dropped. Once
/// stopped, [`TimeSource::current_millis`] falls back to reading the system
/// clock directly so generators built on a stopped clock keep working.
///
/// # Example
///
/// ```
/// use swiftuuid::{CachedClock, TimeSource};
///
/// let clock = CachedClock::start();
/// let cached = clock.current_millis();
/// assert!(clock.fresh_millis() >= cached);
///
/// clock.stop();
/// assert!(!clock.is_running());
/// ```
#[derive(Clone, Debug)]
pub struct CachedClock {
    inner: Arc<SharedTickerInner>,
}

impl Default for CachedClock {
    /// Starts a clock with [`DEFAULT_REFRESH_INTERVAL`].
    fn default() -> Self {
        Self::start()
    }
}

impl CachedClock {
    /// Starts a clock refreshed every [`DEFAULT_REFRESH_INTERVAL`].
    ///
    /// # Panics
    ///
    /// Panics if the operating system refuses to spawn the refresh thread.
    #[must_use]
    pub fn start() -> Self {
        Self::start_with_interval(DEFAULT_REFRESH_INTERVAL)
    }

    /// Starts a clock refreshed every `interval`.
    ///
    /// The cache is seeded synchronously before this returns, so the first
    /// read is already current.
    ///
    /// # Panics
    ///
    /// Panics if the operating system refuses to spawn the refresh thread.
    #[must_use]
    pub fn start_with_interval(interval: Duration) -> Self {
        let inner = Arc::new(SharedTickerInner {
            current: CachePadded::new(AtomicU64::new(SystemClock.current_millis())),
            running: AtomicBool::new(true),
            handle: Mutex::new(None),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::Builder::new()
            .name("swiftuuid-clock".into())
            .spawn(move || {
                loop {
                    let Some(inner_ref) = weak_inner.upgrade() else {
                        break;
                    };
                    if !inner_ref.running.load(Ordering::Acquire) {
                        break;
                    }

                    // Never publish a value older than the one readers saw.
                    inner_ref
                        .current
                        .fetch_max(SystemClock.current_millis(), Ordering::Release);

                    // Release the strong reference before sleeping so that
                    // dropping the last handle can end the thread.
                    drop(inner_ref);
                    thread::park_timeout(interval);
                }
            })
            .expect("failed to spawn clock refresh thread");

        *inner.handle.lock() = Some(handle);

        #[cfg(feature = "tracing")]
        tracing::debug!(?interval, "clock refresh thread started");

        Self { inner }
    }

    /// Stops the refresh thread and waits for it to exit.
    ///
    /// Calling this more than once, or from several handles, is harmless.
    pub fn stop(&self) {
        self.inner.running.store(false, Ordering::Release);
        let handle = self.inner.handle.lock().take();
        if let Some(handle) = handle {
            handle.thread().unpark();
            let _ = handle.join();

            #[cfg(feature = "tracing")]
            tracing::debug!("clock refresh thread stopped");
        }
    }

    /// Returns `true` while the refresh thread is serving the cache.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }
}

impl TimeSource for CachedClock {
    /// Returns the cached millisecond, or the system clock once stopped.
    #[inline]
    fn current_millis(&self) -> u64 {
        if self.inner.running.load(Ordering::Relaxed) {
            self.inner.current.load(Ordering::Relaxed)
        } else {
            SystemClock.current_millis()
        }
    }

    #[inline]
    fn fresh_millis(&self) -> u64 {
        SystemClock.current_millis()
    }
}
