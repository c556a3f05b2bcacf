use crate::{
    EntropySource, OsEntropy, Result, SystemClock, TimeSource, Uuid, UuidGenerator, Variant,
    Version,
};

/// A simple UUIDv7 generator with no shared state.
///
/// Reads the clock and the entropy source directly on every call, so bytes
/// 6..16 are entirely random apart from the version and variant bits. There
/// is no intra-millisecond ordering: two IDs minted in the same millisecond
/// compare in random order.
///
/// Use this when call volume is low or when a background clock thread is
/// undesirable. For throughput, prefer [`ShardedV7Generator`].
///
/// [`ShardedV7Generator`]: crate::ShardedV7Generator
#[derive(Clone, Debug, Default)]
pub struct LazyV7Generator<T = SystemClock, E = OsEntropy>
where
    T: TimeSource,
    E: EntropySource,
{
    time: T,
    entropy: E,
}

impl<T, E> LazyV7Generator<T, E>
where
    T: TimeSource,
    E: EntropySource,
{
    pub const fn new(time: T, entropy: E) -> Self {
        Self { time, entropy }
    }

    /// Generates a new UUIDv7 from a fresh clock reading and 10 new random
    /// bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if the entropy source fails.
    ///
    /// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
    pub fn generate(&self) -> Result<Uuid> {
        let mut id = Uuid::NIL;
        id.set_timestamp_ms(self.time.fresh_millis());
        self.entropy.fill_bytes(&mut id.bytes_mut()[6..])?;
        id.set_version(Version::V7);
        id.set_variant(Variant::Rfc9562);
        Ok(id)
    }
}

impl<T, E> UuidGenerator for LazyV7Generator<T, E>
where
    T: TimeSource,
    E: EntropySource,
{
    fn generate(&self) -> Result<Uuid> {
        self.generate()
    }
}
