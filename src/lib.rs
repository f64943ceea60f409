//! A streaming decoder for BER and DER encoded data.
//!
//! This crate allows decoding data encoded in the Basic Encoding Rules as
//! defined in ITU recommendation X.690 as well as their stricter
//! sibling, the Distinguished Encoding Rules.
//!
//! Decoding happens through a [`Decoder`] that walks over the encoded
//! values one by one. It can be asked for the next value as a typed value
//! via the [`Decode`] trait, can enter a constructed value and hand out a
//! nested decoder for its content, and can look at the next value and put
//! it back if it isn’t what was expected, which is how optional values are
//! handled. Only definite length encodings are supported.
//!
//! # Example
//!
//! Assume a simple structure:
//!
//! ```text
//! Example ::= SEQUENCE {
//!     version  [0] EXPLICIT INTEGER DEFAULT 0,
//!     id       INTEGER,
//!     name     OCTET STRING,
//!     flags    SEQUENCE OF BOOLEAN }
//! ```
//!
//! This can be decoded like this:
//!
//! ```
//! use berdec::{Decoder, Mode, Tag};
//!
//! let data = b"\x30\x11\
//!     \x02\x02\x01\x00\
//!     \x04\x03abc\
//!     \x30\x06\x01\x01\xff\x01\x01\x00";
//!
//! let mut dec = Decoder::with_mode(data.as_ref(), Mode::Der);
//! let mut seq = dec.start_cons(Tag::SEQUENCE)?;
//! let mut version = 0u8;
//! let mut id = 0u32;
//! let mut name = Vec::new();
//! seq.decode_optional(&mut version, Tag::ctx(0), 0)?
//!    .decode(&mut id)?
//!    .decode(&mut name)?;
//! let mut flags: Vec<bool> = Vec::new();
//! let mut list = seq.start_cons(Tag::SEQUENCE)?;
//! list.decode_list(&mut flags, true)?;
//! list.end_cons()?;
//! seq.end_cons()?.verify_end()?;
//!
//! assert_eq!(version, 0);
//! assert_eq!(id, 256);
//! assert_eq!(name, b"abc");
//! assert_eq!(flags, [true, false]);
//! # Ok::<(), berdec::decode::DecodeError>(())
//! ```
//!
//! # Features
//!
//! * `bigint`: enables decoding of the `BigInt` and `BigUint` types of
//!   the `num-bigint-dig` crate. This is enabled by default.
//! * `extra-debug`: logs a backtrace whenever a decoding error is
//!   created.

// Needs to be first to make the macro available for all modules.
#[macro_use] mod debug;

pub use self::decode::{Decode, Decoder};
pub use self::int::{Integer, Unsigned};
pub use self::mode::Mode;
pub use self::oid::{ConstOid, Oid};
pub use self::string::{BitString, OctetString};
pub use self::tag::{Class, Tag};

pub mod decode;
pub mod oid;

mod int;
mod length;
mod mode;
mod string;
mod tag;
