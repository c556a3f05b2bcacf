/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `swiftuuid` can emit.
///
/// Generation only ever fails because the entropy source could not deliver
/// bytes. The remaining variants cover hardening limits and configuration
/// mistakes and are never observed with a live clock and default settings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The secure random source could not supply the requested bytes.
    ///
    /// No partial identifier is produced. Any pooled worker state involved in
    /// the failed call has already been returned to its pool.
    #[error("entropy source failed: {reason}")]
    EntropyUnavailable {
        /// Description reported by the underlying source.
        reason: String,
    },

    /// A shard stayed saturated for the configured number of retries without
    /// the clock advancing.
    #[error("shard {shard} saturated for {retries} retries without clock progress")]
    ClockStalled {
        /// Index of the saturated shard.
        shard: usize,
        /// Number of yield-and-reread attempts made.
        retries: u32,
    },

    /// A [`GeneratorConfig`] value was rejected.
    ///
    /// [`GeneratorConfig`]: crate::GeneratorConfig
    #[error("invalid generator configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration.
        reason: String,
    },
}

impl Error {
    pub(crate) fn entropy(reason: impl core::fmt::Display) -> Self {
        Self::EntropyUnavailable {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
