use ::rand::{TryRngCore, rngs::OsRng};

use crate::{EntropySource, Error, Result};

/// An [`EntropySource`] reading from the operating system's secure random
/// facility (`getrandom(2)`, `BCryptGenRandom`, ...).
///
/// Every call is a system call, which is why the sharded generator batches
/// reads into per-worker buffers. Errors from the OS are surfaced as
/// [`Error::EntropyUnavailable`].
#[derive(Copy, Clone, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(dest).map_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(len = dest.len(), %err, "os entropy read failed");
            Error::entropy(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::OsEntropy;
    use crate::EntropySource;

    #[test]
    fn fills_whole_buffer() {
        let mut a = [0u8; 64];
        let mut b = [0u8; 64];
        OsEntropy.fill_bytes(&mut a).unwrap();
        OsEntropy.fill_bytes(&mut b).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, [0u8; 64]);
    }
}
