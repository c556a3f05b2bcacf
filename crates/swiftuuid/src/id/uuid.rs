use core::fmt;

use crate::id::{Variant, Version};

/// Maximum value representable in the 48-bit `unix_ts_ms` field.
pub const MAX_TIMESTAMP: u64 = (1 << 48) - 1;

/// A 128-bit universally unique identifier.
///
/// Bytes are stored in network order. Ordering and hashing follow the byte
/// array, so version 7 identifiers sort by timestamp first.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          unix_ts_ms                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          unix_ts_ms           |  ver  |       counter         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |var|                        rand_b                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            rand_b                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The layout above is the one written by
/// [`ShardedV7Generator`](crate::ShardedV7Generator); the lazy generator
/// fills the counter field with random bits instead.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns a reference to the underlying byte array.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn to_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Returns the version nibble (high nibble of byte 6).
    #[must_use]
    pub const fn version(&self) -> u8 {
        self.0[6] >> 4
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        Variant::from_byte(self.0[8])
    }

    /// Returns the 48-bit `unix_ts_ms` field.
    #[must_use]
    pub const fn timestamp_ms(&self) -> u64 {
        let b = &self.0;
        ((b[0] as u64) << 40)
            | ((b[1] as u64) << 32)
            | ((b[2] as u64) << 24)
            | ((b[3] as u64) << 16)
            | ((b[4] as u64) << 8)
            | (b[5] as u64)
    }

    /// Returns the 12 bits following the version nibble.
    ///
    /// For identifiers from the sharded generator this is the per-shard,
    /// per-millisecond counter.
    #[must_use]
    pub const fn counter(&self) -> u16 {
        (((self.0[6] & 0x0f) as u16) << 8) | self.0[7] as u16
    }

    /// Overwrites the version nibble, leaving the low nibble of byte 6 intact.
    pub const fn set_version(&mut self, version: Version) {
        self.0[6] = (self.0[6] & 0x0f) | (version.nibble() << 4);
    }

    /// Overwrites the variant bits of byte 8.
    pub const fn set_variant(&mut self, variant: Variant) {
        self.0[8] = variant.patch(self.0[8]);
    }

    /// Writes the low 48 bits of `unix_ts_ms` into bytes 0..6.
    pub(crate) const fn set_timestamp_ms(&mut self, unix_ts_ms: u64) {
        let ts = (unix_ts_ms & MAX_TIMESTAMP).to_be_bytes();
        self.0[0] = ts[2];
        self.0[1] = ts[3];
        self.0[2] = ts[4];
        self.0[3] = ts[5];
        self.0[4] = ts[6];
        self.0[5] = ts[7];
    }

    pub(crate) const fn bytes_mut(&mut self) -> &mut [u8; 16] {
        &mut self.0
    }
}

impl fmt::Display for Uuid {
    /// Writes the 8-4-4-4-12 canonical lowercase hexadecimal form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, octet) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{octet:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uuid({self})")
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(id: Uuid) -> Self {
        id.0
    }
}

impl From<u128> for Uuid {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<Uuid> for u128 {
    fn from(id: Uuid) -> Self {
        id.to_u128()
    }
}

impl AsRef<[u8]> for Uuid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
