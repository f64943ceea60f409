//! The decoder cursor.
//!
//! This is an internal module. Its public types are re-exported by the
//! parent.

use log::trace;
use crate::mode::Mode;
use crate::tag::Tag;
use super::error::DecodeError;
use super::object::Object;
use super::source::{BytesSource, CHUNK_SIZE, IntoSource, Pos, Source};


//------------ Decoder -------------------------------------------------------

/// A cursor over a sequence of encoded values.
///
/// The decoder reads values from a [`Source`] one by one. Each value is
/// first read as an [`Object`], i.e., its header is parsed and its content
/// collected, and is then either interpreted by one of the typed decode
/// methods or, if it is constructed, entered via [`start_cons`].
///
/// Entering a constructed value creates a new decoder for its content that
/// mutably borrows its parent. The parent can only be used again once the
/// child has either been finished via [`end_cons`], which checks that all
/// content has been consumed, or dropped.
///
/// A decoder can hold on to a single object that has been read but
/// shouldn’t be consumed yet via [`push_back`]. This is used for optional
/// values: if the next value doesn’t have the expected tag, it is put back
/// and will be returned by the next read.
///
/// # Example
///
/// ```
/// use berdec::{Decoder, Tag};
///
/// let data = b"\x30\x07\x02\x01\x01\x04\x02ab";
/// let mut dec = Decoder::new(data.as_ref());
/// let mut seq = dec.start_cons(Tag::SEQUENCE)?;
/// let version: u8 = seq.take()?;
/// let name: Vec<u8> = seq.take()?;
/// seq.end_cons()?.verify_end()?;
///
/// assert_eq!(version, 1);
/// assert_eq!(name, b"ab");
/// # Ok::<(), berdec::decode::DecodeError>(())
/// ```
///
/// [`start_cons`]: #method.start_cons
/// [`end_cons`]: #method.end_cons
/// [`push_back`]: #method.push_back
pub struct Decoder<S, P = ()> {
    /// The source of encoded data.
    source: S,

    /// An object that was pushed back.
    pushed: Option<Object>,

    /// The encoding rules in use.
    mode: Mode,

    /// The decoder of the enclosing constructed value, if any.
    parent: P,
}

impl<S> Decoder<S> {
    /// Creates a new decoder using BER.
    pub fn new(source: impl IntoSource<Source = S>) -> Self {
        Self::with_mode(source, Mode::default())
    }

    /// Creates a new decoder using the given mode.
    pub fn with_mode(
        source: impl IntoSource<Source = S>, mode: Mode
    ) -> Self {
        Decoder {
            source: source.into_source(),
            pushed: None,
            mode,
            parent: (),
        }
    }

    /// Converts the decoder into its source.
    ///
    /// Any object that was pushed back is lost.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: Source, P> Decoder<S, P> {
    /// Returns the mode of the decoder.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the position of the next value.
    pub fn pos(&self) -> Pos {
        match self.pushed {
            Some(ref obj) => obj.start(),
            None => self.source.pos(),
        }
    }

    /// Returns the next object.
    ///
    /// If an object was pushed back, this is returned. Otherwise a new
    /// object is read from the source. If the end of the data has been
    /// reached, an error is returned.
    pub fn get_next_object(&mut self) -> Result<Object, DecodeError> {
        match self.get_opt_object()? {
            Some(obj) => Ok(obj),
            None => {
                xerr!(Err(self.source.content_err("expected further values")))
            }
        }
    }

    /// Returns the next object if there is one.
    ///
    /// Returns `Ok(None)` if the end of the data has been reached.
    pub fn get_opt_object(&mut self) -> Result<Option<Object>, DecodeError> {
        if let Some(obj) = self.pushed.take() {
            return Ok(Some(obj))
        }
        Object::take_from(&mut self.source, self.mode)
    }

    /// Pushes an object back.
    ///
    /// The object will be returned by the next call to
    /// [`get_next_object`][Self::get_next_object].
    ///
    /// # Panics
    ///
    /// Only one object can be pushed back. The method panics if there
    /// already is an object pending.
    pub fn push_back(&mut self, obj: Object) {
        assert!(
            self.pushed.is_none(),
            "push_back called with an object already pending"
        );
        self.pushed = Some(obj)
    }

    /// Returns the tag of the next value without consuming it.
    ///
    /// Returns `Ok(None)` if the end of the data has been reached.
    pub fn peek_tag(&mut self) -> Result<Option<Tag>, DecodeError> {
        match self.get_opt_object()? {
            Some(obj) => {
                let tag = obj.tag();
                self.push_back(obj);
                Ok(Some(tag))
            }
            None => Ok(None)
        }
    }

    /// Returns whether there are more values to decode.
    pub fn more_items(&mut self) -> Result<bool, DecodeError> {
        if self.pushed.is_some() {
            return Ok(true)
        }
        Ok(!self.source.is_exhausted()?)
    }

    /// Checks that all data has been consumed.
    ///
    /// Returns an error if there is a pending object or the source has
    /// octets left.
    pub fn verify_end(&mut self) -> Result<&mut Self, DecodeError> {
        if let Some(ref obj) = self.pushed {
            xerr!(return Err(obj.content_err("trailing data")))
        }
        if !self.source.is_exhausted()? {
            xerr!(return Err(self.source.content_err("trailing data")))
        }
        Ok(self)
    }

    /// Drops everything left to decode.
    pub fn discard_remaining(&mut self) -> Result<&mut Self, DecodeError> {
        self.pushed = None;
        self.source.skip_all()?;
        Ok(self)
    }

    /// Moves the remaining encoded data into `out`.
    ///
    /// The data is not decoded. Any previous content of `out` is dropped.
    /// If an object was pushed back, its complete encoding comes first.
    pub fn raw_bytes(
        &mut self, out: &mut Vec<u8>
    ) -> Result<&mut Self, DecodeError> {
        out.clear();
        if let Some(obj) = self.pushed.take() {
            out.extend_from_slice(obj.encoded())
        }
        loop {
            let len = self.source.request(CHUNK_SIZE)?;
            if len == 0 {
                return Ok(self)
            }
            out.extend_from_slice(&self.source.slice()[..len]);
            self.source.advance(len);
        }
    }

    /// Starts decoding a constructed value with the given tag.
    ///
    /// The next value must be constructed and have exactly the tag given,
    /// class included. Returns a decoder for the content of the value that
    /// borrows `self` until it is finished with
    /// [`end_cons`][Decoder::end_cons].
    pub fn start_cons(
        &mut self, tag: Tag
    ) -> Result<Decoder<BytesSource, &mut Self>, DecodeError> {
        let obj = self.get_next_object()?;
        obj.check(tag, true)?;
        let pos = obj.content_start();
        trace!(
            "entering {} at {} with {} content octets",
            tag, obj.start(), obj.value().len()
        );
        Ok(Decoder {
            source: BytesSource::with_pos(obj.into_value(), pos),
            pushed: None,
            mode: self.mode,
            parent: self,
        })
    }

    /// Starts decoding a constructed value with a context specific tag.
    ///
    /// # Panics
    ///
    /// The method panics if `number` is greater than [`Tag::MAX_NUMBER`].
    pub fn start_cons_ctx(
        &mut self, number: u32
    ) -> Result<Decoder<BytesSource, &mut Self>, DecodeError> {
        self.start_cons(Tag::ctx(number))
    }
}

impl<'p, S: Source, P> Decoder<BytesSource, &'p mut Decoder<S, P>> {
    /// Finishes decoding a constructed value.
    ///
    /// Checks that the content of the value has been consumed completely
    /// and returns the decoder of the enclosing value.
    pub fn end_cons(mut self) -> Result<&'p mut Decoder<S, P>, DecodeError> {
        self.verify_end()?;
        trace!("leaving constructed value at {}", self.source.pos());
        Ok(self.parent)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use crate::decode::{ReaderSource, SliceSource};
    use super::*;

    const SEQ: &[u8] = b"\x30\x07\x02\x01\x01\x04\x02ab";

    #[test]
    fn sequence() {
        let mut dec = Decoder::new(SEQ);
        let mut seq = dec.start_cons(Tag::SEQUENCE).unwrap();
        let mut version = 0u64;
        let mut name = Vec::new();
        seq.decode(&mut version).unwrap().decode(&mut name).unwrap();
        assert!(!seq.more_items().unwrap());
        let dec = seq.end_cons().unwrap();
        dec.verify_end().unwrap();
        assert_eq!(version, 1);
        assert_eq!(name, b"ab");
    }

    #[test]
    fn sequence_from_reader() {
        let mut dec = Decoder::new(ReaderSource::new(SEQ));
        let mut seq = dec.start_cons(Tag::SEQUENCE).unwrap();
        assert_eq!(seq.take::<u8>().unwrap(), 1);
        assert_eq!(seq.take::<Bytes>().unwrap().as_ref(), b"ab");
        seq.end_cons().unwrap().verify_end().unwrap();
    }

    #[test]
    fn end_cons_requires_consumed_content() {
        let mut dec = Decoder::new(SEQ);
        let mut seq = dec.start_cons(Tag::SEQUENCE).unwrap();
        seq.take::<u8>().unwrap();
        assert!(seq.end_cons().is_err());

        // A pending object counts as unconsumed.
        let mut dec = Decoder::new(SEQ);
        let mut seq = dec.start_cons(Tag::SEQUENCE).unwrap();
        seq.take::<u8>().unwrap();
        let obj = seq.get_next_object().unwrap();
        seq.push_back(obj);
        assert!(seq.end_cons().is_err());
    }

    #[test]
    fn start_cons_checks() {
        // Wrong tag.
        assert!(Decoder::new(SEQ).start_cons(Tag::SET).is_err());
        // Wrong class.
        assert!(
            Decoder::new(b"\xa0\x00".as_ref()).start_cons(
                Tag::universal(0)
            ).is_err()
        );
        assert!(Decoder::new(b"\xa0\x00".as_ref()).start_cons_ctx(0).is_ok());
        // Primitive.
        assert!(
            Decoder::new(b"\x10\x00".as_ref()).start_cons(
                Tag::SEQUENCE
            ).is_err()
        );
        // Empty.
        assert!(Decoder::new(b"".as_ref()).start_cons(Tag::SEQUENCE).is_err());
        // Length exceeding the outer value.
        let mut dec = Decoder::new(b"\x30\x03\x30\x05\x00".as_ref());
        let mut seq = dec.start_cons(Tag::SEQUENCE).unwrap();
        assert!(seq.start_cons(Tag::SEQUENCE).is_err());
    }

    #[test]
    fn nested_positions() {
        let mut dec = Decoder::new(b"\x30\x05\x30\x03\x05\x01\x00".as_ref());
        let mut outer = dec.start_cons(Tag::SEQUENCE).unwrap();
        let mut inner = outer.start_cons(Tag::SEQUENCE).unwrap();
        assert_eq!(usize::from(inner.pos()), 4);
        let err = inner.decode_null().err().unwrap();
        assert_eq!(usize::from(err.pos().unwrap()), 4);
    }

    #[test]
    fn indefinite_length_rejected() {
        let mut dec = Decoder::new(b"\x30\x80\x02\x01\x01\x00\x00".as_ref());
        assert!(dec.start_cons(Tag::SEQUENCE).is_err());
    }

    #[test]
    fn end_of_data() {
        let mut dec = Decoder::new(b"".as_ref());
        assert!(!dec.more_items().unwrap());
        assert!(dec.get_opt_object().unwrap().is_none());
        let err = dec.get_next_object().unwrap_err();
        assert_eq!(
            err.content_error().unwrap().to_string(),
            "expected further values"
        );
        dec.verify_end().unwrap();
    }

    #[test]
    fn push_back_and_peek() {
        let mut dec = Decoder::new(b"\x05\x00\x02\x01\x03".as_ref());
        assert_eq!(dec.peek_tag().unwrap(), Some(Tag::NULL));
        assert_eq!(dec.peek_tag().unwrap(), Some(Tag::NULL));
        assert!(dec.more_items().unwrap());
        let obj = dec.get_next_object().unwrap();
        assert_eq!(obj.tag(), Tag::NULL);
        dec.push_back(obj);
        assert!(dec.verify_end().is_err());
        dec.decode_null().unwrap();
        assert_eq!(usize::from(dec.pos()), 2);
        assert_eq!(dec.take::<u8>().unwrap(), 3);
        assert_eq!(dec.peek_tag().unwrap(), None);
    }

    #[test]
    #[should_panic]
    fn double_push_back() {
        let mut dec = Decoder::new(b"\x05\x00\x05\x00".as_ref());
        let first = dec.get_next_object().unwrap();
        let second = dec.get_next_object().unwrap();
        dec.push_back(second);
        dec.push_back(first);
    }

    #[test]
    fn raw_bytes() {
        let mut dec = Decoder::new(b"\x05\x00\x02\x01\x03\x04\x00".as_ref());
        dec.decode_null().unwrap();
        let obj = dec.get_next_object().unwrap();
        dec.push_back(obj);
        let mut out = vec![0xff; 3];
        dec.raw_bytes(&mut out).unwrap();
        assert_eq!(out, b"\x02\x01\x03\x04\x00");
        dec.verify_end().unwrap();
    }

    #[test]
    fn chained_scope_checks() {
        let mut dec = Decoder::new(b"\x05\x00\x30\x00".as_ref());
        dec.decode_null().unwrap().verify_end().err().unwrap();
        let mut seq = dec.start_cons(Tag::SEQUENCE).unwrap();
        seq.verify_end().unwrap().discard_remaining().unwrap();
        seq.end_cons().unwrap().verify_end().unwrap();
    }

    #[test]
    fn discard_remaining() {
        let mut dec = Decoder::new(SEQ);
        let mut seq = dec.start_cons(Tag::SEQUENCE).unwrap();
        let obj = seq.get_next_object().unwrap();
        seq.push_back(obj);
        seq.discard_remaining().unwrap();
        assert!(!seq.more_items().unwrap());
        seq.end_cons().unwrap().verify_end().unwrap();
    }

    #[test]
    fn end_of_contents_is_an_object() {
        let mut dec = Decoder::new(b"\x00\x00".as_ref());
        let obj = dec.get_next_object().unwrap();
        assert_eq!(obj.tag(), Tag::END_OF_VALUE);
        dec.verify_end().unwrap();
    }

    #[test]
    fn der_lengths() {
        let data = b"\x04\x81\x01a";
        assert!(Decoder::new(data.as_ref()).take::<Bytes>().is_ok());
        assert!(
            Decoder::with_mode(
                SliceSource::new(data), Mode::Der
            ).take::<Bytes>().is_err()
        );
    }
}
