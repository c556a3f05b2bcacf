use core::time::Duration;

use crate::{DEFAULT_REFRESH_INTERVAL, Error, Result};

/// Bytes of entropy consumed by each version 7 identifier.
pub const ENTROPY_PER_ID: usize = 10;

/// Default size of each worker's entropy buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Default bound on yield-and-reread attempts for a saturated shard.
pub const DEFAULT_MAX_SATURATION_RETRIES: u32 = 1 << 20;

/// Tunables for [`ShardedV7Generator`] and the clock that feeds it.
///
/// # Example
/// ```
/// use core::time::Duration;
/// use swiftuuid::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_buffer_size(4096)
///     .with_refresh_interval(Duration::from_micros(250));
/// assert!(config.validate().is_ok());
///
/// assert!(GeneratorConfig::default().with_buffer_size(4).validate().is_err());
/// ```
///
/// [`ShardedV7Generator`]: crate::ShardedV7Generator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Size in bytes of each worker's entropy buffer. Must hold at least one
    /// identifier's worth ([`ENTROPY_PER_ID`]).
    pub buffer_size: usize,
    /// How often a [`CachedClock`] started from this config refreshes.
    ///
    /// [`CachedClock`]: crate::CachedClock
    pub refresh_interval: Duration,
    /// How many times a saturated shard yields and rereads the clock before
    /// giving up with [`Error::ClockStalled`].
    pub max_saturation_retries: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            max_saturation_retries: DEFAULT_MAX_SATURATION_RETRIES,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub const fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    #[must_use]
    pub const fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    #[must_use]
    pub const fn with_max_saturation_retries(mut self, retries: u32) -> Self {
        self.max_saturation_retries = retries;
        self
    }

    /// Checks every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size < ENTROPY_PER_ID {
            return Err(Error::config(format!(
                "buffer_size must be at least {ENTROPY_PER_ID} bytes, got {}",
                self.buffer_size
            )));
        }
        if self.refresh_interval.is_zero() {
            return Err(Error::config("refresh_interval must be non-zero"));
        }
        if self.max_saturation_retries == 0 {
            return Err(Error::config("max_saturation_retries must be non-zero"));
        }
        Ok(())
    }
}
