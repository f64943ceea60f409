//! BER encoded octet and bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::ops;
use bytes::Bytes;
use crate::decode::{Decode, DecodeError, Object};
use crate::mode::Mode;
use crate::tag::Tag;


//------------ OctetString ---------------------------------------------------

/// An octet string value.
///
/// An octet string is a sequence of octets, i.e., a glorified `[u8]`. The
/// type wraps a `Bytes` value holding the content octets verbatim. If you
/// don’t need the wrapper, `Bytes` and `Vec<u8>` can be decoded as octet
/// strings directly.
///
/// # BER Encoding
///
/// Octet strings are encoded as a primitive value with the octets as the
/// content. The constructed form which splits the string into a sequence
/// of octet strings is not supported.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct OctetString(Bytes);

impl OctetString {
    /// Creates an octet string from a bytes value.
    pub fn new(bytes: Bytes) -> Self {
        OctetString(bytes)
    }

    /// Returns a slice of the content.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Converts the octet string into a bytes value.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns the length of the content.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Decode for OctetString {
    const TAG: Tag = Tag::OCTET_STRING;

    fn from_object(object: Object, _mode: Mode) -> Result<Self, DecodeError> {
        Ok(OctetString(object.into_value()))
    }
}

impl Decode for Bytes {
    const TAG: Tag = Tag::OCTET_STRING;

    fn from_object(object: Object, _mode: Mode) -> Result<Self, DecodeError> {
        Ok(object.into_value())
    }
}

impl Decode for Vec<u8> {
    const TAG: Tag = Tag::OCTET_STRING;

    fn from_object(object: Object, _mode: Mode) -> Result<Self, DecodeError> {
        Ok(object.value().to_vec())
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl ops::Deref for OctetString {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike [`OctetString`]s, they do not
/// need to contain a multiple of eight bits.
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # BER Encoding
///
/// The first octet of the content contains the number of unused bits in
/// the last octet and the following octets contain the bits with the first
/// bit in the most significant bit of the octet. The number of unused bits
/// is less than eight and zero if there are no further octets. In DER, the
/// unused bits must be zero.
///
/// The constructed encoding is not supported.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Parses the content octets of a bit string value.
    pub fn from_content(
        content: Bytes, mode: Mode
    ) -> Result<Self, &'static str> {
        let (unused, bits) = match content.split_first() {
            Some((&unused, _)) => (unused, content.slice(1..)),
            None => xerr!(return Err("empty BIT STRING")),
        };
        if unused > 7 {
            xerr!(return Err("invalid unused bits in BIT STRING"))
        }
        match bits.last() {
            None if unused != 0 => {
                xerr!(return Err("invalid unused bits in BIT STRING"))
            }
            Some(&last) if mode.is_der() => {
                if last & ((1u8 << unused) - 1) != 0 {
                    xerr!(return Err("non-zero unused bits in DER BIT STRING"))
                }
            }
            _ => { }
        }
        Ok(BitString { unused, bits })
    }

    /// Returns the value of the given bit.
    pub fn bit(&self, bit: usize) -> bool {
        let idx = bit >> 3;
        if self.bits.len() <= idx {
            return false
        }
        let bit = 7 - (bit as u8 & 7);
        if self.bits.len() == idx + 1 && self.unused > bit {
            return false
        }
        self.bits[idx] & (1 << bit) != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3) - (self.unused as usize)
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns a slice of the octets in the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns a bytes value of the octets of the bit string.
    pub fn octet_bytes(&self) -> Bytes {
        self.bits.clone()
    }
}

impl Decode for BitString {
    const TAG: Tag = Tag::BIT_STRING;

    fn from_object(object: Object, mode: Mode) -> Result<Self, DecodeError> {
        BitString::from_content(
            object.value().clone(), mode
        ).map_err(|err| object.content_err(err))
    }
}


//============ Tests =========================================================
