use ::rand::{RngCore, rng};

use crate::{EntropySource, Result};

/// An [`EntropySource`] backed by the thread-local RNG (`rand::rng()`).
///
/// This RNG is cryptographically secure (ChaCha-based) and periodically
/// reseeded from the OS, and it never fails. It avoids a system call per
/// refill at the cost of trusting a user-space generator.
///
/// The type is zero-sized and does not store the RNG; it accesses the
/// thread-local generator on each call, so it may be shared across threads.
#[derive(Copy, Clone, Debug, Default)]
pub struct ThreadEntropy;

impl EntropySource for ThreadEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        rng().fill_bytes(dest);
        Ok(())
    }
}
