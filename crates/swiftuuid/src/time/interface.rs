use std::sync::Arc;

/// A trait for time sources that return a Unix timestamp in milliseconds.
///
/// This abstraction allows you to plug in the cached process clock, the
/// system clock, or a mocked time source in tests.
///
/// # Example
///
/// ```
/// use swiftuuid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_700_000_000_000
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1_700_000_000_000);
/// assert_eq!(time.fresh_millis(), 1_700_000_000_000);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    ///
    /// Implementations may serve a cached value that trails the wall clock
    /// slightly.
    fn current_millis(&self) -> u64;

    /// Returns the current time bypassing any cache.
    ///
    /// Generators call this only on the cold path, when a shard has exhausted
    /// its counter for the cached millisecond. The default forwards to
    /// [`Self::current_millis`].
    fn fresh_millis(&self) -> u64 {
        self.current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }

    fn fresh_millis(&self) -> u64 {
        (**self).fresh_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }

    fn fresh_millis(&self) -> u64 {
        (**self).fresh_millis()
    }
}
