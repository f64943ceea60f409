//! Parsing BER encoded data.
//!
//! This modules provides the means to parse BER encoded data.
//!
//! The basic idea is that for each type a function exists that knows how
//! to decode one value of that type. For constructed types, this function
//! in turn relies on similar functions provided for its constituent types.
//! For a detailed introduction to how to write these functions, please
//! refer to the [`Decoder`] type.
//!
//! The module provides a number of basic types:
//!
//! * [`Source`] is the trait for the raw octets the decoder reads from.
//!   It is implemented for byte slices via [`SliceSource`], for `Bytes`
//!   values via [`BytesSource`], and for readers via [`ReaderSource`].
//! * [`Object`] is a single value with its header parsed but its content
//!   not yet interpreted.
//! * [`Decoder`] is the cursor that reads objects one by one, enters and
//!   leaves constructed values, and decodes typed values.
//! * [`Decode`] is the trait for types that can be decoded from an object.
//! * [`DecodeError`] is the error produced when decoding fails.

pub use self::decoder::Decoder;
pub use self::error::{ContentError, DecodeError};
pub use self::object::Object;
pub use self::source::{
    BytesSource, CaptureSource, IntoSource, Pos, ReaderSource, SliceSource,
    Source,
};
pub use self::values::Decode;

mod decoder;
mod error;
mod object;
mod source;
mod values;
