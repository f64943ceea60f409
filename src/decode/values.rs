//! Decoding typed values.
//!
//! This is an internal module. Its public types are re-exported by the
//! parent.

use crate::int;
use crate::mode::Mode;
use crate::string::BitString;
use crate::tag::Tag;
use super::decoder::Decoder;
use super::error::{ContentError, DecodeError};
use super::object::Object;
use super::source::Source;


//------------ Decode --------------------------------------------------------

/// A type that can be decoded from a single encoded value.
///
/// The trait provides the universal tag a value of the type uses when it
/// isn’t tagged differently, whether the value is constructed, and a
/// function that interprets the content of an object whose tag and
/// encoding have already been checked.
///
/// Implementations are provided for the common types: `bool`, `()` for
/// NULL, the native integers, [`Integer`] and [`Unsigned`], `Bytes`,
/// `Vec<u8>`, [`OctetString`] and [`BitString`] for strings, and [`Oid`].
/// With the `bigint` feature, `BigInt` and `BigUint` of the
/// `num-bigint-dig` crate can be decoded, too.
///
/// [`Integer`]: crate::Integer
/// [`Unsigned`]: crate::Unsigned
/// [`OctetString`]: crate::OctetString
/// [`BitString`]: crate::BitString
/// [`Oid`]: crate::Oid
pub trait Decode: Sized {
    /// The tag of the value if it isn’t tagged differently.
    const TAG: Tag;

    /// Whether the value uses constructed encoding.
    const CONSTRUCTED: bool = false;

    /// Interprets the content of an object.
    ///
    /// The tag and encoding of the object have been checked already.
    fn from_object(object: Object, mode: Mode) -> Result<Self, DecodeError>;
}

impl Decode for bool {
    const TAG: Tag = Tag::BOOLEAN;

    fn from_object(object: Object, mode: Mode) -> Result<Self, DecodeError> {
        let value: &[u8] = object.value();
        match (value, mode) {
            ([0], _) => Ok(false),
            ([0xFF], _) => Ok(true),
            ([_], Mode::Ber) => Ok(true),
            ([_], Mode::Der) => {
                xerr!(Err(object.content_err("invalid boolean in DER")))
            }
            _ => {
                xerr!(Err(object.content_err(
                    "BOOLEAN must have exactly one content octet"
                )))
            }
        }
    }
}

impl Decode for () {
    const TAG: Tag = Tag::NULL;

    fn from_object(object: Object, _mode: Mode) -> Result<Self, DecodeError> {
        if object.value().is_empty() {
            Ok(())
        }
        else {
            xerr!(Err(object.content_err("NULL must have empty content")))
        }
    }
}


//------------ Decoder -------------------------------------------------------

/// # Decoding Typed Values
///
/// The `take` methods return the decoded value while the `decode` methods
/// store it in a place provided by the caller and return the decoder
/// itself so calls can be chained.
impl<S: Source, P> Decoder<S, P> {
    /// Takes a value of the given type.
    pub fn take<T: Decode>(&mut self) -> Result<T, DecodeError> {
        self.take_tagged(T::TAG)
    }

    /// Takes a value that is implicitly tagged with the given tag.
    ///
    /// The value must have the tag given instead of the type’s own tag but
    /// is otherwise decoded as the type.
    pub fn take_tagged<T: Decode>(
        &mut self, tag: Tag
    ) -> Result<T, DecodeError> {
        let obj = self.get_next_object()?;
        obj.check(tag, T::CONSTRUCTED)?;
        T::from_object(obj, self.mode())
    }

    /// Takes a value implicitly tagged with a context specific tag.
    ///
    /// # Panics
    ///
    /// The method panics if `number` is greater than [`Tag::MAX_NUMBER`].
    pub fn take_ctx<T: Decode>(
        &mut self, number: u32
    ) -> Result<T, DecodeError> {
        self.take_tagged(Tag::ctx(number))
    }

    /// Takes a value that is explicitly tagged with the given tag.
    ///
    /// The next value must be a constructed value with `tag` that contains
    /// exactly one value of the type.
    pub fn take_explicit<T: Decode>(
        &mut self, tag: Tag
    ) -> Result<T, DecodeError> {
        let mut cons = self.start_cons(tag)?;
        let res = cons.take()?;
        cons.end_cons()?;
        Ok(res)
    }

    /// Takes an optional value with the given tag.
    ///
    /// If the next value has a different tag or the end of the data has
    /// been reached, returns `Ok(None)`. The next value is left for the
    /// next read in this case.
    ///
    /// If the tag matches and the value is primitive, it is decoded as the
    /// type with an implicit tag. If it is constructed but the type is
    /// primitive, the tag is taken as an explicit tag: the value must
    /// contain exactly one value of the type with its own tag.
    pub fn take_opt<T: Decode>(
        &mut self, tag: Tag
    ) -> Result<Option<T>, DecodeError> {
        let obj = match self.get_opt_object()? {
            Some(obj) => obj,
            None => return Ok(None)
        };
        if obj.tag() != tag {
            self.push_back(obj);
            return Ok(None)
        }
        if obj.is_constructed() && !T::CONSTRUCTED {
            let mut inner = obj.into_decoder(self.mode());
            let res = inner.take()?;
            inner.verify_end()?;
            return Ok(Some(res))
        }
        obj.check(tag, T::CONSTRUCTED)?;
        T::from_object(obj, self.mode()).map(Some)
    }

    /// Decodes a value of the given type into `out`.
    pub fn decode<T: Decode>(
        &mut self, out: &mut T
    ) -> Result<&mut Self, DecodeError> {
        *out = self.take()?;
        Ok(self)
    }

    /// Decodes an implicitly tagged value into `out`.
    pub fn decode_tagged<T: Decode>(
        &mut self, out: &mut T, tag: Tag
    ) -> Result<&mut Self, DecodeError> {
        *out = self.take_tagged(tag)?;
        Ok(self)
    }

    /// Decodes a value implicitly tagged as context specific into `out`.
    ///
    /// # Panics
    ///
    /// The method panics if `number` is greater than [`Tag::MAX_NUMBER`].
    pub fn decode_ctx<T: Decode>(
        &mut self, out: &mut T, number: u32
    ) -> Result<&mut Self, DecodeError> {
        *out = self.take_ctx(number)?;
        Ok(self)
    }

    /// Decodes an explicitly tagged value into `out`.
    pub fn decode_explicit<T: Decode>(
        &mut self, out: &mut T, tag: Tag
    ) -> Result<&mut Self, DecodeError> {
        *out = self.take_explicit(tag)?;
        Ok(self)
    }

    /// Decodes a NULL value.
    pub fn decode_null(&mut self) -> Result<&mut Self, DecodeError> {
        self.take::<()>()?;
        Ok(self)
    }

    /// Decodes a non-negative integer of limited size.
    ///
    /// The value must be a primitive value with the given tag. Its content
    /// must be a minimally encoded integer that is not negative and has a
    /// magnitude of at most `width` octets. The width must be between 1
    /// and 8.
    pub fn decode_constrained_integer(
        &mut self, tag: Tag, width: usize
    ) -> Result<u64, DecodeError> {
        let obj = self.get_next_object()?;
        obj.check(tag, false)?;
        int::decode_unsigned(
            obj.value(), width
        ).map_err(|err| obj.content_err(err))
    }

    /// Decodes a string value into `out`.
    ///
    /// The value must have `tag` but is decoded according to `real_type`
    /// which must be either [`Tag::OCTET_STRING`] or [`Tag::BIT_STRING`].
    /// For an octet string, the content is copied into `out`. For a bit
    /// string, the octets of the string without the initial octet are.
    /// Any previous content of `out` is dropped.
    pub fn decode_string(
        &mut self, out: &mut Vec<u8>, real_type: Tag, tag: Tag
    ) -> Result<&mut Self, DecodeError> {
        if real_type == Tag::OCTET_STRING {
            *out = self.take_tagged(tag)?;
        }
        else if real_type == Tag::BIT_STRING {
            let bits: BitString = self.take_tagged(tag)?;
            out.clear();
            out.extend_from_slice(bits.octet_slice());
        }
        else {
            xerr!(return Err(DecodeError::content(
                format!("invalid string type {}", real_type), self.pos()
            )))
        }
        Ok(self)
    }

    /// Decodes an optional value into `out`.
    ///
    /// If the next value has the given tag, it is decoded as described for
    /// [`take_opt`][Self::take_opt]. Otherwise, `out` is set to `default`
    /// and the next value is left for the next read.
    pub fn decode_optional<T: Decode>(
        &mut self, out: &mut T, tag: Tag, default: T
    ) -> Result<&mut Self, DecodeError> {
        *out = self.take_opt(tag)?.unwrap_or(default);
        Ok(self)
    }

    /// Decodes an optional string with a context specific tag into `out`.
    ///
    /// If the next value has the context specific tag with the given
    /// number, it is decoded as a string of type `real_type` as described
    /// for [`decode_string`][Self::decode_string]. A constructed value is
    /// taken as an explicit tag around the string. If the tag doesn’t match,
    /// `out` is cleared and the next value is left for the next read.
    ///
    /// # Panics
    ///
    /// The method panics if `number` is greater than [`Tag::MAX_NUMBER`].
    pub fn decode_optional_string(
        &mut self, out: &mut Vec<u8>, real_type: Tag, number: u32
    ) -> Result<&mut Self, DecodeError> {
        let tag = Tag::ctx(number);
        let obj = match self.get_opt_object()? {
            Some(obj) => obj,
            None => {
                out.clear();
                return Ok(self)
            }
        };
        if obj.tag() != tag {
            self.push_back(obj);
            out.clear();
        }
        else if obj.is_constructed() {
            let mut inner = obj.into_decoder(self.mode());
            inner.decode_string(out, real_type, real_type)?;
            inner.verify_end()?;
        }
        else {
            self.push_back(obj);
            self.decode_string(out, real_type, tag)?;
        }
        Ok(self)
    }

    /// Decodes all remaining values of the same type into `out`.
    ///
    /// If `clear` is `true`, any previous content of `out` is dropped.
    /// Otherwise the values are appended.
    pub fn decode_list<T: Decode>(
        &mut self, out: &mut Vec<T>, clear: bool
    ) -> Result<&mut Self, DecodeError> {
        if clear {
            out.clear();
        }
        while self.more_items()? {
            out.push(self.take()?);
        }
        Ok(self)
    }

    /// Decodes a value and checks that it is equal to `expected`.
    ///
    /// If it isn’t, returns an error with the message given and the
    /// position of the value.
    pub fn decode_and_check<T: Decode + PartialEq>(
        &mut self, expected: &T, msg: impl Into<ContentError>,
    ) -> Result<&mut Self, DecodeError> {
        let pos = self.pos();
        let value: T = self.take()?;
        if value != *expected {
            xerr!(return Err(DecodeError::content(msg, pos)))
        }
        Ok(self)
    }

    /// Decodes an octet string holding an unsigned integer into `out`.
    ///
    /// The octets of the string are interpreted as the big-endian
    /// magnitude of the integer.
    #[cfg(feature = "bigint")]
    pub fn decode_octet_string_bigint(
        &mut self, out: &mut num_bigint_dig::BigUint
    ) -> Result<&mut Self, DecodeError> {
        let octets: bytes::Bytes = self.take()?;
        *out = num_bigint_dig::BigUint::from_bytes_be(&octets);
        Ok(self)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use crate::decode::SliceSource;
    use crate::int::Integer;
    use super::*;

    fn decoder(data: &[u8]) -> Decoder<SliceSource<'_>> {
        Decoder::new(data)
    }

    #[test]
    fn booleans() {
        let data = b"\x01\x01\x00\x01\x01\xff\x01\x01\x01";
        let mut dec = decoder(data);
        assert!(!dec.take::<bool>().unwrap());
        assert!(dec.take::<bool>().unwrap());
        assert!(dec.take::<bool>().unwrap());

        let mut dec = Decoder::with_mode(SliceSource::new(data), Mode::Der);
        assert!(!dec.take::<bool>().unwrap());
        assert!(dec.take::<bool>().unwrap());
        assert!(dec.take::<bool>().is_err());

        assert!(decoder(b"\x01\x00").take::<bool>().is_err());
        assert!(decoder(b"\x01\x02\x00\x00").take::<bool>().is_err());
    }

    #[test]
    fn null() {
        decoder(b"\x05\x00").decode_null().unwrap().verify_end().unwrap();
        assert!(decoder(b"\x05\x01\x00").decode_null().is_err());
        assert!(decoder(b"\x04\x00").decode_null().is_err());
    }

    #[test]
    fn chained_decode() {
        let mut flag = false;
        let mut num = 0u32;
        let mut data = Vec::new();
        decoder(b"\x01\x01\xff\x02\x02\x01\x00\x04\x01x")
            .decode(&mut flag).unwrap()
            .decode(&mut num).unwrap()
            .decode(&mut data).unwrap()
            .verify_end().unwrap();
        assert!(flag);
        assert_eq!(num, 256);
        assert_eq!(data, b"x");
    }

    #[test]
    fn constrained_integer() {
        let mut dec = decoder(b"\x02\x02\x00\x80\x80\x01\x05");
        assert_eq!(
            dec.decode_constrained_integer(Tag::INTEGER, 1).unwrap(), 0x80
        );
        assert_eq!(
            dec.decode_constrained_integer(Tag::ctx(0), 1).unwrap(), 5
        );

        assert!(
            decoder(b"\x02\x02\x01\x00")
                .decode_constrained_integer(Tag::INTEGER, 1).is_err()
        );
        assert_eq!(
            decoder(b"\x02\x02\x01\x00")
                .decode_constrained_integer(Tag::INTEGER, 2).unwrap(),
            256
        );
        assert!(
            decoder(b"\x02\x01\xff")
                .decode_constrained_integer(Tag::INTEGER, 8).is_err()
        );
        assert!(
            decoder(b"\x02\x02\x00\x01")
                .decode_constrained_integer(Tag::INTEGER, 8).is_err()
        );
        assert!(
            decoder(b"\x02\x01\x01")
                .decode_constrained_integer(Tag::INTEGER, 9).is_err()
        );
    }

    #[test]
    fn optional_implicit() {
        let mut dec = decoder(b"\x80\x01\x07\x02\x01\x03");
        let mut first = 0u8;
        let mut second = 0u8;
        dec.decode_optional(&mut first, Tag::ctx(0), 1).unwrap();
        dec.decode_optional(&mut second, Tag::ctx(1), 9).unwrap();
        assert_eq!(first, 7);
        assert_eq!(second, 9);
        // The unmatched value is still there.
        assert_eq!(dec.take::<u8>().unwrap(), 3);
        assert_eq!(dec.take_opt::<u8>(Tag::ctx(1)).unwrap(), None);
        dec.verify_end().unwrap();

        // A low tag number in the long form is an error, not a mismatch.
        let mut out = 0u8;
        assert!(
            decoder(b"\x9f\x03\x01\x05").decode_optional(
                &mut out, Tag::ctx(3), 9
            ).is_err()
        );
        assert!(decoder(b"\x9f\x80\x03\x01\x05").take_ctx::<u8>(3).is_err());
    }

    #[test]
    fn optional_explicit() {
        let mut dec = decoder(b"\xa0\x03\x02\x01\x02");
        assert_eq!(dec.take_opt::<u8>(Tag::ctx(0)).unwrap(), Some(2));
        dec.verify_end().unwrap();

        // The inner value must be consumed completely.
        let mut dec = decoder(b"\xa0\x05\x02\x01\x02\x05\x00");
        assert!(dec.take_opt::<u8>(Tag::ctx(0)).is_err());

        assert_eq!(
            decoder(b"\xa1\x03\x02\x01\x02").take_explicit::<u8>(
                Tag::ctx(1)
            ).unwrap(),
            2
        );
        let mut out = Integer::from_content(
            Bytes::from_static(b"\x00")
        ).unwrap();
        decoder(b"\xa1\x03\x02\x01\x02").decode_explicit(
            &mut out, Tag::ctx(1)
        ).unwrap();
        assert_eq!(out.as_slice(), b"\x02");
    }

    #[test]
    fn implicit_tags() {
        let mut dec = decoder(b"\x81\x02ab\x5f\x21\x01\xff");
        let mut s = Vec::new();
        dec.decode_ctx(&mut s, 1).unwrap();
        assert_eq!(s, b"ab");
        let mut flag = false;
        dec.decode_tagged(&mut flag, Tag::application(33)).unwrap();
        assert!(flag);
        dec.verify_end().unwrap();
    }

    #[test]
    fn strings() {
        let mut out = vec![1, 2, 3];
        decoder(b"\x04\x02ab").decode_string(
            &mut out, Tag::OCTET_STRING, Tag::OCTET_STRING
        ).unwrap();
        assert_eq!(out, b"ab");

        decoder(b"\x03\x03\x00ab").decode_string(
            &mut out, Tag::BIT_STRING, Tag::BIT_STRING
        ).unwrap();
        assert_eq!(out, b"ab");

        decoder(b"\x83\x02\x00c").decode_string(
            &mut out, Tag::BIT_STRING, Tag::ctx(3)
        ).unwrap();
        assert_eq!(out, b"c");

        assert!(
            decoder(b"\x03\x02\x08a").decode_string(
                &mut out, Tag::BIT_STRING, Tag::BIT_STRING
            ).is_err()
        );
        assert!(
            decoder(b"\x02\x01\x00").decode_string(
                &mut out, Tag::INTEGER, Tag::INTEGER
            ).is_err()
        );
    }

    #[test]
    fn optional_strings() {
        let mut dec = decoder(b"\x80\x02ab\xa1\x04\x04\x02cd\x04\x01e");
        let mut out = Vec::new();
        dec.decode_optional_string(&mut out, Tag::OCTET_STRING, 0).unwrap();
        assert_eq!(out, b"ab");
        dec.decode_optional_string(&mut out, Tag::OCTET_STRING, 1).unwrap();
        assert_eq!(out, b"cd");
        dec.decode_optional_string(&mut out, Tag::OCTET_STRING, 2).unwrap();
        assert!(out.is_empty());
        assert_eq!(dec.take::<Bytes>().unwrap().as_ref(), b"e");
        out.push(1);
        dec.decode_optional_string(&mut out, Tag::OCTET_STRING, 2).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn lists() {
        let mut dec = decoder(
            b"\x30\x09\x02\x01\x01\x02\x01\x02\x02\x01\x03"
        );
        let mut seq = dec.start_cons(Tag::SEQUENCE).unwrap();
        let mut out = vec![0u8];
        seq.decode_list(&mut out, true).unwrap();
        assert_eq!(out, [1, 2, 3]);
        assert!(!seq.more_items().unwrap());
        seq.end_cons().unwrap();

        let mut dec = decoder(b"\x02\x01\x04");
        dec.decode_list(&mut out, false).unwrap();
        assert_eq!(out, [1, 2, 3, 4]);

        let mut dec = decoder(b"\x02\x01\x04\x05\x00");
        assert!(dec.decode_list(&mut out, true).is_err());
    }

    #[test]
    fn and_check() {
        let mut dec = decoder(b"\x02\x01\x00\x02\x01\x01");
        dec.decode_and_check(&0u8, "unexpected version").unwrap();
        let err = dec.decode_and_check(
            &0u8, "unexpected version"
        ).err().unwrap();
        assert_eq!(err.to_string(), "3: unexpected version");
    }

    #[cfg(feature = "bigint")]
    #[test]
    fn octet_string_bigint() {
        use num_bigint_dig::BigUint;

        let mut out = BigUint::from(0u8);
        decoder(b"\x04\x03\x01\x00\x00")
            .decode_octet_string_bigint(&mut out).unwrap();
        assert_eq!(out, BigUint::from(0x10000u32));
        decoder(b"\x04\x00").decode_octet_string_bigint(&mut out).unwrap();
        assert_eq!(out, BigUint::from(0u8));
    }
}
