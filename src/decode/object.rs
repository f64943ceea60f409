//! A single raw encoded value.
//!
//! This is an internal module. Its public types are re-exported by the
//! parent.

use std::fmt;
use bytes::Bytes;
use crate::length::Length;
use crate::mode::Mode;
use crate::tag::Tag;
use super::decoder::Decoder;
use super::error::{ContentError, DecodeError};
use super::source::{BytesSource, CaptureSource, Pos, Source};


//------------ Object --------------------------------------------------------

/// A single encoded value with its header already parsed.
///
/// An object is what the decoder produces for each value before it is
/// interpreted. It contains the tag of the value, whether it is
/// constructed, and the content octets. The content octets are never
/// looked at when producing an object.
///
/// In addition, the object keeps the complete encoding of the value,
/// including identifier and length octets, and the position in the source
/// where the value started. The first allows a value to be handed on
/// verbatim, the second is used when reporting errors.
#[derive(Clone)]
pub struct Object {
    /// The tag of the value.
    tag: Tag,

    /// Whether the value is constructed.
    constructed: bool,

    /// The content octets.
    value: Bytes,

    /// The complete encoding of the value.
    encoded: Bytes,

    /// The position in the source the value started at.
    start: Pos,
}

impl Object {
    /// Takes a single object from the beginning of a source.
    ///
    /// Returns `Ok(None)` if the source is exhausted before the first
    /// identifier octet. If the source ends anywhere inside the value or
    /// the identifier or length octets are invalid, returns an error.
    ///
    /// If the source knows how many octets it has left, a length exceeding
    /// that number is rejected before any content is read.
    pub fn take_from<S: Source>(
        source: &mut S, mode: Mode,
    ) -> Result<Option<Self>, DecodeError> {
        if source.is_exhausted()? {
            return Ok(None)
        }
        let start = source.pos();
        let mut capture = CaptureSource::new(source);
        let (tag, constructed) = Tag::take_from(&mut capture)?;
        let len = Length::take_from(&mut capture, mode)?.value();
        if let Some(remaining) = capture.remaining() {
            if len > remaining {
                xerr!(return Err(DecodeError::content(
                    "length exceeds available data", start
                )))
            }
        }
        let header_len = capture.captured_len();
        if capture.request(len)? < len {
            xerr!(return Err(DecodeError::content(
                "unexpected end of data", start
            )))
        }
        capture.advance(len);
        let encoded = capture.into_bytes();
        let value = encoded.slice(header_len..);
        Ok(Some(Object { tag, constructed, value, encoded, start }))
    }

    /// Returns the tag of the object.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns whether the object is constructed.
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Returns a reference to the content octets.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Converts the object into its content octets.
    pub fn into_value(self) -> Bytes {
        self.value
    }

    /// Returns the complete encoding of the object.
    pub fn encoded(&self) -> &Bytes {
        &self.encoded
    }

    /// Returns the position of the first identifier octet.
    pub fn start(&self) -> Pos {
        self.start
    }

    /// Returns the position of the first content octet.
    pub fn content_start(&self) -> Pos {
        self.start + Pos::from(self.encoded.len() - self.value.len())
    }

    /// Checks that the object has the given tag and encoding.
    ///
    /// The error message names both what was expected and what was found.
    pub fn check(
        &self, tag: Tag, constructed: bool
    ) -> Result<(), DecodeError> {
        if self.tag != tag {
            xerr!(return Err(self.content_err(format!(
                "expected {}, found {}", tag, self.tag
            ))))
        }
        if self.constructed != constructed {
            xerr!(return Err(self.content_err(format!(
                "expected {} {}, found {} encoding",
                if constructed { "constructed" } else { "primitive" },
                tag,
                if self.constructed { "constructed" } else { "primitive" },
            ))))
        }
        Ok(())
    }

    /// Produces a content error pointing at the start of the object.
    pub fn content_err(&self, err: impl Into<ContentError>) -> DecodeError {
        DecodeError::content(err, self.start)
    }

    /// Converts the object into a decoder for its content.
    ///
    /// This is how constructed values are entered. The decoder’s source
    /// starts at the position of the content so errors point at the right
    /// place.
    pub fn into_decoder(self, mode: Mode) -> Decoder<BytesSource> {
        let pos = self.content_start();
        Decoder::with_mode(BytesSource::with_pos(self.value, pos), mode)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Object")
            .field("tag", &self.tag)
            .field("constructed", &self.constructed)
            .field("len", &self.value.len())
            .field("start", &self.start)
            .finish()
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::{ReaderSource, SliceSource};

    fn take(data: &[u8]) -> Result<Option<Object>, DecodeError> {
        Object::take_from(&mut SliceSource::new(data), Mode::Ber)
    }

    #[test]
    fn take_primitive() {
        let mut source = SliceSource::new(b"\x02\x01\x05\x04\x00");
        let obj = Object::take_from(
            &mut source, Mode::Der
        ).unwrap().unwrap();
        assert_eq!(obj.tag(), Tag::INTEGER);
        assert!(!obj.is_constructed());
        assert_eq!(obj.value().as_ref(), b"\x05");
        assert_eq!(obj.encoded().as_ref(), b"\x02\x01\x05");
        assert_eq!(usize::from(obj.start()), 0);
        assert_eq!(usize::from(obj.content_start()), 2);

        let obj = Object::take_from(
            &mut source, Mode::Der
        ).unwrap().unwrap();
        assert_eq!(obj.tag(), Tag::OCTET_STRING);
        assert!(obj.value().is_empty());
        assert_eq!(usize::from(obj.start()), 3);
        assert!(Object::take_from(&mut source, Mode::Der).unwrap().is_none());
    }

    #[test]
    fn take_constructed() {
        let obj = take(b"\x30\x03\x02\x01\x01").unwrap().unwrap();
        assert_eq!(obj.tag(), Tag::SEQUENCE);
        assert!(obj.is_constructed());
        assert!(obj.check(Tag::SEQUENCE, true).is_ok());
        assert!(obj.check(Tag::SEQUENCE, false).is_err());
        assert!(obj.check(Tag::SET, true).is_err());

        let obj = take(b"\xbf\x81\x00\x00").unwrap().unwrap();
        assert_eq!(obj.tag(), Tag::ctx(128));
        assert!(obj.is_constructed());
        assert_eq!(usize::from(obj.content_start()), 4);
    }

    #[test]
    fn take_truncated() {
        assert!(take(b"").unwrap().is_none());
        assert!(take(b"\x02").is_err());
        assert!(take(b"\x02\x02\x01").is_err());
        assert!(take(b"\x1f\x81").is_err());
        assert!(take(b"\x04\x82\x01").is_err());
        assert!(take(b"\x30\x80\x00\x00").is_err());
    }

    #[test]
    fn excessive_length_rejected_early() {
        let err = take(b"\x04\x84\x7f\xff\xff\xff\x00").unwrap_err();
        assert_eq!(usize::from(err.pos().unwrap()), 0);

        // A reader doesn’t know its length but mustn’t choke either.
        let data = b"\x04\x84\x7f\xff\xff\xff\x00";
        let mut source = ReaderSource::new(&data[..]);
        assert!(Object::take_from(&mut source, Mode::Ber).is_err());
    }

    #[test]
    fn check_messages() {
        let obj = take(b"\x05\x00").unwrap().unwrap();
        assert_eq!(
            obj.check(Tag::INTEGER, false).unwrap_err().to_string(),
            "0: expected INTEGER, found NULL"
        );
        let obj = take(b"\x22\x00").unwrap().unwrap();
        assert_eq!(
            obj.check(Tag::INTEGER, false).unwrap_err().to_string(),
            "0: expected primitive INTEGER, found constructed encoding"
        );
    }

    #[test]
    fn into_decoder() {
        let obj = take(b"\x30\x03\x02\x01\x07").unwrap().unwrap();
        let mut dec = obj.into_decoder(Mode::Der);
        assert_eq!(usize::from(dec.pos()), 2);
        assert_eq!(dec.take::<u8>().unwrap(), 7);
        dec.verify_end().unwrap();
    }
}
