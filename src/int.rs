//! BER encoded integers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::decode::{ContentError, Decode, DecodeError, Object};
use crate::mode::Mode;
use crate::tag::Tag;


//------------ Integer -------------------------------------------------------

/// A BER encoded integer.
///
/// As integers are variable length in BER, this type is just a simple wrapper
/// atop the underlying `Bytes` value containing the raw content. A value of
/// this type is a signed integer. If a value is defined as an unsigned
/// integer, i.e., as `INTEGER (0..MAX)`, you should use the sibling type
/// `Unsigned` instead.
///
/// In addition to these two generic types, the decoder also implements
/// decoding into native integer types such as `i8` or `u32`. If the range
/// of such a type is obviously enough, you might want to consider using
/// these instead.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two‘s complement byte sequence of
/// that integer. Thus, the most-significant bit of the first octet serves as
/// the sign bit.
///
/// The content must be encoded in the smallest possible number of octets.
/// Because we insist on this rule, we can use the content octets as the
/// value and simply compare slices.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Integer(Bytes);

impl Integer {
    /// Creates an integer from its content octets.
    pub fn from_content(content: Bytes) -> Result<Self, ContentError> {
        check_head(&content)?;
        Ok(Integer(content))
    }

    /// Returns the content octets of the integer.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Converts the integer into its content octets.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns whether the integer is zero.
    pub fn is_zero(&self) -> bool {
        self.as_slice() == [0]
    }

    /// Returns whether the integer is less than zero.
    pub fn is_negative(&self) -> bool {
        self.0.first().map(|x| x & 0x80 != 0).unwrap_or(false)
    }

    /// Converts the integer into an unsigned integer if it isn’t negative.
    pub fn into_unsigned(self) -> Result<Unsigned, Self> {
        if self.is_negative() {
            Err(self)
        }
        else {
            Ok(Unsigned(self.0))
        }
    }
}

impl Decode for Integer {
    const TAG: Tag = Tag::INTEGER;

    fn from_object(object: Object, _mode: Mode) -> Result<Self, DecodeError> {
        Integer::from_content(
            object.value().clone()
        ).map_err(|err| object.content_err(err))
    }
}

impl AsRef<[u8]> for Integer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//------------ Unsigned ------------------------------------------------------

/// A BER encoded unsigned integer.
///
/// As integers are variable length in BER, this type is just a simple wrapper
/// atop the underlying `Bytes` value containing the raw content. It
/// guarantees that the wrapped integer is greater or equal to 0. This equals
/// an integer defined as `INTEGER (0..MAX)` in ASN.1.
///
/// If you need a integer without any restrictions, you can use `Integer`.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two‘s complement byte sequence of
/// that integer. Thus, the most-significant bit of the first octet serves as
/// the sign bit and, for an unsigned integer, has to be unset.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Unsigned(Bytes);

impl Unsigned {
    /// Creates an unsigned integer from its content octets.
    pub fn from_content(content: Bytes) -> Result<Self, ContentError> {
        check_unsigned_head(&content)?;
        Ok(Unsigned(content))
    }

    /// Returns the content octets of the integer.
    ///
    /// This may start with a zero octet if the most significant bit of the
    /// value is set.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns the big-endian magnitude of the integer.
    ///
    /// This is the content without a leading zero octet. For the value
    /// zero, the slice is empty.
    pub fn magnitude(&self) -> &[u8] {
        match self.0.split_first() {
            Some((0, rest)) => rest,
            _ => self.0.as_ref(),
        }
    }

    /// Converts the integer into its content octets.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns whether the integer is zero.
    pub fn is_zero(&self) -> bool {
        self.as_slice() == [0]
    }
}

impl Decode for Unsigned {
    const TAG: Tag = Tag::INTEGER;

    fn from_object(object: Object, _mode: Mode) -> Result<Self, DecodeError> {
        Unsigned::from_content(
            object.value().clone()
        ).map_err(|err| object.content_err(err))
    }
}

impl AsRef<[u8]> for Unsigned {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//------------ Bounded Integers ----------------------------------------------

/// Checks that an integer is started correctly.
///
/// Specifically, checks that there is at least one octet and that the
/// first nine bits of a multi-octet integer are not all the same.
fn check_head(content: &[u8]) -> Result<(), ContentError> {
    match (content.first(), content.get(1).map(|x| x & 0x80 != 0)) {
        (None, _) => {
            xerr!(Err("empty INTEGER".into()))
        }
        (Some(0), Some(false)) | (Some(0xFF), Some(true)) => {
            xerr!(Err("INTEGER not minimally encoded".into()))
        }
        _ => Ok(())
    }
}

/// Checks that an unsigned integer is started correctly.
///
/// This is the same as `check_head` followed by a check that the sign bit
/// is not set.
fn check_unsigned_head(content: &[u8]) -> Result<(), ContentError> {
    check_head(content)?;
    if content[0] & 0x80 != 0 {
        xerr!(Err("negative INTEGER not allowed".into()))
    }
    else {
        Ok(())
    }
}

/// Decodes a non-negative integer of at most `width` octets.
///
/// The width is the number of octets of the magnitude, i.e., not counting
/// a leading zero octet. It must be between 1 and 8.
pub(crate) fn decode_unsigned(
    content: &[u8], width: usize
) -> Result<u64, ContentError> {
    if width == 0 || width > 8 {
        xerr!(return Err(format!("invalid integer width {}", width).into()))
    }
    check_unsigned_head(content)?;
    let magnitude = match content.split_first() {
        Some((0, rest)) => rest,
        _ => content,
    };
    if magnitude.len() > width {
        xerr!(return Err("INTEGER out of range".into()))
    }
    Ok(magnitude.iter().fold(0, |res, &octet| (res << 8) | u64::from(octet)))
}

/// Decodes a signed integer of at most `width` octets.
///
/// The width must be between 1 and 8.
pub(crate) fn decode_signed(
    content: &[u8], width: usize
) -> Result<i64, ContentError> {
    check_head(content)?;
    if content.len() > width.min(8) {
        xerr!(return Err("INTEGER out of range".into()))
    }
    // Sign-extend into a full buffer.
    let mut buf = if content[0] & 0x80 != 0 { [0xFF; 8] } else { [0; 8] };
    buf[8 - content.len()..].copy_from_slice(content);
    Ok(i64::from_be_bytes(buf))
}

macro_rules! unsigned_impl {
    ( $type:ident ) => {
        impl Decode for $type {
            const TAG: Tag = Tag::INTEGER;

            fn from_object(
                object: Object, _mode: Mode
            ) -> Result<Self, DecodeError> {
                let res = decode_unsigned(
                    object.value(), std::mem::size_of::<$type>()
                ).map_err(|err| object.content_err(err))?;
                $type::try_from(res).map_err(|_| {
                    object.content_err("INTEGER out of range")
                })
            }
        }
    }
}

macro_rules! signed_impl {
    ( $type:ident ) => {
        impl Decode for $type {
            const TAG: Tag = Tag::INTEGER;

            fn from_object(
                object: Object, _mode: Mode
            ) -> Result<Self, DecodeError> {
                let res = decode_signed(
                    object.value(), std::mem::size_of::<$type>()
                ).map_err(|err| object.content_err(err))?;
                $type::try_from(res).map_err(|_| {
                    object.content_err("INTEGER out of range")
                })
            }
        }
    }
}

unsigned_impl!(u8);
unsigned_impl!(u16);
unsigned_impl!(u32);
unsigned_impl!(u64);
unsigned_impl!(usize);

signed_impl!(i8);
signed_impl!(i16);
signed_impl!(i32);
signed_impl!(i64);


//------------ Big Integers --------------------------------------------------

#[cfg(feature = "bigint")]
impl Decode for num_bigint_dig::BigInt {
    const TAG: Tag = Tag::INTEGER;

    fn from_object(object: Object, mode: Mode) -> Result<Self, DecodeError> {
        let int = Integer::from_object(object, mode)?;
        Ok(num_bigint_dig::BigInt::from_signed_bytes_be(int.as_slice()))
    }
}

#[cfg(feature = "bigint")]
impl Decode for num_bigint_dig::BigUint {
    const TAG: Tag = Tag::INTEGER;

    fn from_object(object: Object, mode: Mode) -> Result<Self, DecodeError> {
        let int = Unsigned::from_object(object, mode)?;
        Ok(num_bigint_dig::BigUint::from_bytes_be(int.magnitude()))
    }
}


//============ Tests =========================================================
