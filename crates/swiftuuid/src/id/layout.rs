/// UUID versions produced by this crate.
///
/// The discriminant is the 4-bit value written into the high nibble of byte
/// 6.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Version {
    /// Fully random (RFC 9562 section 5.4).
    V4 = 0b0100,
    /// Unix epoch time-ordered (RFC 9562 section 5.7).
    V7 = 0b0111,
}

impl Version {
    /// Returns the version nibble.
    #[must_use]
    pub const fn nibble(self) -> u8 {
        self as u8
    }
}

/// The variant field held in the top bits of byte 8.
///
/// ```text
///  Byte 8 (MSB first)   Variant
///  0xxx xxxx            Ncs
///  10xx xxxx            Rfc9562
///  110x xxxx            Microsoft
///  111x xxxx            Future
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Reserved, NCS backward compatibility.
    Ncs,
    /// The layout specified by RFC 9562 (formerly RFC 4122).
    Rfc9562,
    /// Reserved, Microsoft backward compatibility.
    Microsoft,
    /// Reserved for future definition.
    Future,
}

impl Variant {
    /// Decodes the variant from byte 8 of an identifier.
    #[must_use]
    pub const fn from_byte(octet: u8) -> Self {
        if octet & 0x80 == 0 {
            Self::Ncs
        } else if octet & 0xc0 == 0x80 {
            Self::Rfc9562
        } else if octet & 0xe0 == 0xc0 {
            Self::Microsoft
        } else {
            Self::Future
        }
    }

    /// Returns `octet` with its variant bits replaced by this variant's
    /// pattern. Bits below the variant field are kept.
    #[must_use]
    pub const fn patch(self, octet: u8) -> u8 {
        match self {
            Self::Ncs => octet & 0x7f,
            Self::Rfc9562 => (octet & 0x3f) | 0x80,
            Self::Microsoft => (octet & 0x1f) | 0xc0,
            Self::Future => (octet & 0x1f) | 0xe0,
        }
    }
}
