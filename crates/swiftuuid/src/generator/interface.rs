use crate::{Result, Uuid};

/// A minimal interface shared by every identifier generator in this crate.
pub trait UuidGenerator {
    /// Produces a new identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if the random source fails. No
    /// partial identifier is ever returned.
    ///
    /// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
    fn generate(&self) -> Result<Uuid>;
}

impl<G: UuidGenerator + ?Sized> UuidGenerator for &G {
    fn generate(&self) -> Result<Uuid> {
        (**self).generate()
    }
}

impl<G: UuidGenerator + ?Sized> UuidGenerator for Box<G> {
    fn generate(&self) -> Result<Uuid> {
        (**self).generate()
    }
}
