use std::sync::Arc;

use crate::Result;

/// A trait for sources of cryptographically secure random bytes.
///
/// This abstraction allows you to plug in the operating system source, a
/// user-space CSPRNG, or a mocked (possibly failing) source in tests.
///
/// Implementations must fill all of `dest` or return an error; partially
/// filled buffers are never consumed.
///
/// # Example
/// ```
/// use swiftuuid::{EntropySource, Result};
///
/// struct FixedBytes;
/// impl EntropySource for FixedBytes {
///     fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
///         dest.fill(0xab);
///         Ok(())
///     }
/// }
///
/// let mut buf = [0u8; 4];
/// FixedBytes.fill_bytes(&mut buf).unwrap();
/// assert_eq!(buf, [0xab; 4]);
/// ```
pub trait EntropySource {
    /// Fills `dest` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if the source cannot supply the
    /// bytes.
    ///
    /// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()>;
}

impl<E: EntropySource + ?Sized> EntropySource for &E {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill_bytes(dest)
    }
}

impl<E: EntropySource + ?Sized> EntropySource for Arc<E> {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill_bytes(dest)
    }
}
