use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// Reads the wall clock on every call.
///
/// Returns `0` if the system clock reports a time before the Unix epoch.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    #[inline]
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}
