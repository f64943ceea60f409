//! The source for decoding data.
//!
//! This is an internal module. Its public types are re-exported by the
//! parent.

use std::{fmt, io, ops};
use std::io::Read;
use bytes::Bytes;
use super::error::{ContentError, DecodeError};


//------------ Source --------------------------------------------------------

/// A view into a sequence of octets.
///
/// Sources form that foundation of decoding. They provide the raw octets to
/// decoders. They only ever move forward.
///
/// A source can only provide a certain number of octets at a time. The
/// method [`request`] allows the caller to ask for a certain number of
/// octets and tells how many are actually available. These octets can then
/// be accessed through [`slice`] and [`bytes`] and, once processed, be
/// consumed by calling [`advance`].
///
/// [`request`]: #tymethod.request
/// [`slice`]: #tymethod.slice
/// [`bytes`]: #tymethod.bytes
/// [`advance`]: #tymethod.advance
pub trait Source {
    /// Returns the current logical position within the source.
    fn pos(&self) -> Pos;

    /// Request at least `len` octets to be available.
    ///
    /// The method returns the number of octets that are actually
    /// available. This may be more than `len`. If it is less, the source
    /// has reached its end.
    fn request(&mut self, len: usize) -> Result<usize, DecodeError>;

    /// Returns a octet slice of the available data.
    ///
    /// The slice covers at least as many octets as the last successful
    /// call to [`request`] returned.
    ///
    /// [`request`]: #tymethod.request
    fn slice(&self) -> &[u8];

    /// Produces a `Bytes` value from part of the available data.
    ///
    /// # Panics
    ///
    /// The method panics if `start` or `end` are larger than the length of
    /// the slice returned by [`slice`].
    ///
    /// [`slice`]: #tymethod.slice
    fn bytes(&self, start: usize, end: usize) -> Bytes;

    /// Advance the source by `len` octets.
    ///
    /// # Panics
    ///
    /// The method panics if `len` is larger than the number of octets
    /// currently available.
    fn advance(&mut self, len: usize);

    /// Returns the number of octets remaining if the source knows it.
    fn remaining(&self) -> Option<usize> {
        None
    }


    //--- Provided methods

    /// Returns whether the source has reached its end.
    fn is_exhausted(&mut self) -> Result<bool, DecodeError> {
        Ok(self.request(1)? == 0)
    }

    /// Takes a single octet from the source.
    ///
    /// If there aren’t any more octets available from the source, returns
    /// a content error.
    fn take_u8(&mut self) -> Result<u8, DecodeError> {
        match self.take_opt_u8()? {
            Some(res) => Ok(res),
            None => {
                xerr!(Err(self.content_err("unexpected end of data")))
            }
        }
    }

    /// Takes an optional octet from the source.
    ///
    /// If there aren’t any more octets available from the source, returns
    /// `Ok(None)`.
    fn take_opt_u8(&mut self) -> Result<Option<u8>, DecodeError> {
        if self.request(1)? < 1 {
            return Ok(None)
        }
        let res = self.slice()[0];
        self.advance(1);
        Ok(Some(res))
    }

    /// Takes exactly `len` octets from the source.
    fn take_bytes(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        if self.request(len)? < len {
            xerr!(return Err(self.content_err("unexpected end of data")))
        }
        let res = self.bytes(0, len);
        self.advance(len);
        Ok(res)
    }

    /// Advances over all remaining octets.
    fn skip_all(&mut self) -> Result<(), DecodeError> {
        loop {
            let len = self.request(CHUNK_SIZE)?;
            if len == 0 {
                return Ok(())
            }
            self.advance(len);
        }
    }

    /// Returns a content error at the current position of the source.
    fn content_err(&self, err: impl Into<ContentError>) -> DecodeError {
        DecodeError::content(err, self.pos())
    }
}

/// The number of octets requested when walking over unknown data.
pub(crate) const CHUNK_SIZE: usize = 4096;

impl<'a, S: Source + ?Sized> Source for &'a mut S {
    fn pos(&self) -> Pos {
        (**self).pos()
    }

    fn request(&mut self, len: usize) -> Result<usize, DecodeError> {
        (**self).request(len)
    }

    fn slice(&self) -> &[u8] {
        (**self).slice()
    }

    fn bytes(&self, start: usize, end: usize) -> Bytes {
        (**self).bytes(start, end)
    }

    fn advance(&mut self, len: usize) {
        (**self).advance(len)
    }

    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }
}


//------------ IntoSource ----------------------------------------------------

/// A type that can be converted into a source.
pub trait IntoSource {
    type Source: Source;

    fn into_source(self) -> Self::Source;
}

impl<T: Source> IntoSource for T {
    type Source = Self;

    fn into_source(self) -> Self::Source {
        self
    }
}


//------------ SliceSource ---------------------------------------------------

/// A source atop a borrowed octets slice.
#[derive(Clone, Copy, Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Creates a new source for the given slice.
    pub fn new(data: &'a [u8]) -> Self {
        SliceSource { data, pos: 0 }
    }

    /// Returns the part of the slice not yet consumed.
    pub fn remaining_slice(&self) -> &'a [u8] {
        self.data
    }
}

impl<'a> Source for SliceSource<'a> {
    fn pos(&self) -> Pos {
        self.pos.into()
    }

    fn request(&mut self, _len: usize) -> Result<usize, DecodeError> {
        Ok(self.data.len())
    }

    fn slice(&self) -> &[u8] {
        self.data
    }

    fn bytes(&self, start: usize, end: usize) -> Bytes {
        Bytes::copy_from_slice(&self.data[start..end])
    }

    fn advance(&mut self, len: usize) {
        assert!(len <= self.data.len(), "advanced past end of source");
        self.data = &self.data[len..];
        self.pos += len;
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.data.len())
    }
}

impl<'a> IntoSource for &'a [u8] {
    type Source = SliceSource<'a>;

    fn into_source(self) -> Self::Source {
        SliceSource::new(self)
    }
}


//------------ BytesSource ---------------------------------------------------

/// A source atop a `Bytes` value.
///
/// This is also the bounded view a nested decoder reads the content of a
/// constructed value from. Such a view starts at the position of the
/// content within the outer source so errors point at the right place.
#[derive(Clone, Debug)]
pub struct BytesSource {
    data: Bytes,
    pos: usize,
}

impl BytesSource {
    /// Creates a new source for the given bytes value.
    pub fn new(data: Bytes) -> Self {
        BytesSource { data, pos: 0 }
    }

    /// Creates a new source that starts at the given position.
    pub fn with_pos(data: Bytes, pos: Pos) -> Self {
        BytesSource { data, pos: pos.into() }
    }

    /// Returns the octets not yet consumed.
    pub fn remaining_bytes(&self) -> &Bytes {
        &self.data
    }
}

impl Source for BytesSource {
    fn pos(&self) -> Pos {
        self.pos.into()
    }

    fn request(&mut self, _len: usize) -> Result<usize, DecodeError> {
        Ok(self.data.len())
    }

    fn slice(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn bytes(&self, start: usize, end: usize) -> Bytes {
        self.data.slice(start..end)
    }

    fn advance(&mut self, len: usize) {
        assert!(len <= self.data.len(), "advanced past end of source");
        bytes::Buf::advance(&mut self.data, len);
        self.pos += len;
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.data.len())
    }
}

impl IntoSource for Bytes {
    type Source = BytesSource;

    fn into_source(self) -> Self::Source {
        BytesSource::new(self)
    }
}


//------------ ReaderSource --------------------------------------------------

/// A source reading from an `io::Read` stream.
///
/// Octets are only read from the reader when they are requested. Requests
/// for a large number of octets only grow the internal buffer as data
/// actually arrives, so a bogus length in the encoded data can’t make the
/// source allocate more than the stream really contains.
pub struct ReaderSource<R> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
    eof: bool,
}

impl<R> ReaderSource<R> {
    /// Creates a new source for the given reader.
    pub fn new(reader: R) -> Self {
        ReaderSource { reader, buf: Vec::new(), pos: 0, eof: false }
    }

    /// Returns the reader, dropping any buffered octets.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: io::Read> Source for ReaderSource<R> {
    fn pos(&self) -> Pos {
        self.pos.into()
    }

    fn request(&mut self, len: usize) -> Result<usize, DecodeError> {
        if self.buf.len() < len && !self.eof {
            let missing = len - self.buf.len();
            let read = (&mut self.reader).take(
                missing as u64
            ).read_to_end(&mut self.buf)?;
            if read < missing {
                self.eof = true
            }
        }
        Ok(self.buf.len())
    }

    fn slice(&self) -> &[u8] {
        self.buf.as_slice()
    }

    fn bytes(&self, start: usize, end: usize) -> Bytes {
        Bytes::copy_from_slice(&self.buf[start..end])
    }

    fn advance(&mut self, len: usize) {
        assert!(len <= self.buf.len(), "advanced past end of source");
        self.buf.drain(..len);
        self.pos += len;
    }
}

impl<R> fmt::Debug for ReaderSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ReaderSource")
            .field("buffered", &self.buf.len())
            .field("pos", &self.pos)
            .field("eof", &self.eof)
            .finish()
    }
}


//------------ CaptureSource -------------------------------------------------

/// A source that captures what has been advanced over.
///
/// A capture source wraps a mutable reference to some other source and
/// provides the usual source access. However, instead of dropping octets
/// that have been advanced over, it keeps them around and can hand them
/// out as a bytes value via [`into_bytes`].
///
/// [`into_bytes`]: #method.into_bytes
pub struct CaptureSource<'a, S: 'a> {
    /// The wrapped real source.
    source: &'a mut S,

    /// The number of bytes the source has promised to have for us.
    len: usize,

    /// The position in the source our view starts at.
    pos: usize,
}

impl<'a, S: Source> CaptureSource<'a, S> {
    /// Creates a new capture source using a reference to some other source.
    pub fn new(source: &'a mut S) -> Self {
        CaptureSource { source, len: 0, pos: 0 }
    }

    /// Returns the number of octets captured so far.
    pub fn captured_len(&self) -> usize {
        self.pos
    }

    /// Converts the capture source into the captured bytes.
    ///
    /// Only then the wrapped source is advanced over the captured octets.
    pub fn into_bytes(self) -> Bytes {
        let res = self.source.bytes(0, self.pos);
        self.source.advance(self.pos);
        res
    }
}

impl<'a, S: Source + 'a> Source for CaptureSource<'a, S> {
    fn pos(&self) -> Pos {
        self.source.pos() + self.pos.into()
    }

    fn request(&mut self, len: usize) -> Result<usize, DecodeError> {
        self.len = self.source.request(self.pos.saturating_add(len))?;
        Ok(self.len - self.pos)
    }

    fn slice(&self) -> &[u8] {
        &self.source.slice()[self.pos..]
    }

    fn bytes(&self, start: usize, end: usize) -> Bytes {
        self.source.bytes(start + self.pos, end + self.pos)
    }

    fn advance(&mut self, len: usize) {
        assert!(
            self.pos + len <= self.len, "advanced past end of source"
        );
        self.pos += len;
    }

    fn remaining(&self) -> Option<usize> {
        self.source.remaining().map(|rem| rem.saturating_sub(self.pos))
    }
}


//------------ Pos -----------------------------------------------------------

/// The logical position within a source.
///
/// Values of this type can only be used for diagnostics. They can not be used
/// to determine how far a source has been advanced since it was created. This
/// is why we used a newtype.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl From<Pos> for usize {
    fn from(pos: Pos) -> usize {
        pos.0
    }
}

impl ops::Add for Pos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Pos(self.0 + rhs.0)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//============ Tests =========================================================
