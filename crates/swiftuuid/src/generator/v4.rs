use crate::{EntropySource, OsEntropy, Result, Uuid, UuidGenerator, Variant, Version};

/// A fully random (version 4) UUID generator.
///
/// Draws all 16 bytes from the entropy source, then overwrites the version
/// nibble with `0100` and the variant bits with `10`, leaving 122 random bits.
#[derive(Clone, Debug, Default)]
pub struct V4Generator<E = OsEntropy>
where
    E: EntropySource,
{
    entropy: E,
}

impl<E> V4Generator<E>
where
    E: EntropySource,
{
    pub const fn new(entropy: E) -> Self {
        Self { entropy }
    }

    /// Generates a new UUIDv4.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if the entropy source fails.
    ///
    /// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
    pub fn generate(&self) -> Result<Uuid> {
        let mut id = Uuid::NIL;
        self.entropy.fill_bytes(id.bytes_mut())?;
        id.set_version(Version::V4);
        id.set_variant(Variant::Rfc9562);
        Ok(id)
    }
}

impl<E> UuidGenerator for V4Generator<E>
where
    E: EntropySource,
{
    fn generate(&self) -> Result<Uuid> {
        self.generate()
    }
}
