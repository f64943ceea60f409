//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object identifiers,
//! a construct used by ANS.1 to uniquely identify all sorts of things. The
//! type is also re-exported at the top-level.
//!
//! [`Oid`]: struct.Oid.html

use std::{fmt, hash};
use bytes::Bytes;
use smallvec::SmallVec;
use crate::decode::{Decode, DecodeError, Object};
use crate::mode::Mode;
use crate::tag::Tag;


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’ or with
/// the integers separated by white space and enclosed in curly braces such
/// as ‘{ 1 3 6 1 5 5 7 1 }’.
///
/// Values of this type keep a single object identifer in its BER encoding,
/// i.e., in some form of byte sequence. Because different representations
/// may be useful, the type is actually generic over something that can
/// become a reference to a bytes slice. Decoding is only defined for
/// `Bytes` values, though, and checks that the content is a correctly
/// encoded object identifier.
///
/// The main use for object identifiers is to compare them to predefined
/// values. For this purpose, you typically define your known object
/// identifiers as constants of `Oid<&'static [u8]>` – or its type alias
/// `ConstOid`. This is why the wrapped value is `pub`.
#[derive(Clone, Debug)]
pub struct Oid<T: AsRef<[u8]> = Bytes>(pub T);

/// A type alias for `Oid<&'static [u8]>`.
///
/// This is useful when defining object identifier constants.
pub type ConstOid = Oid<&'static [u8]>;

impl Oid<Bytes> {
    /// Creates an object identifier from its content octets.
    ///
    /// The octets must not be empty, the last octet must end a
    /// sub-identifier, and no sub-identifier may start with a padding
    /// octet of 0x80.
    pub fn from_content(content: Bytes) -> Result<Self, &'static str> {
        match content.last() {
            None => xerr!(return Err("empty OBJECT IDENTIFIER")),
            Some(last) if last & 0x80 != 0 => {
                xerr!(return Err("truncated OBJECT IDENTIFIER"))
            }
            _ => { }
        }
        let mut start = true;
        for &octet in content.iter() {
            if start && octet == 0x80 {
                xerr!(return Err("non-minimal OBJECT IDENTIFIER"))
            }
            start = octet & 0x80 == 0;
        }
        Ok(Oid(content))
    }
}

impl<T: AsRef<[u8]>> Oid<T> {
    /// Returns an iterator over the encoded sub-identifiers.
    ///
    /// Note that the first sub-identifier encodes the first two arcs.
    pub fn components(&self) -> Components<'_> {
        Components { slice: self.0.as_ref() }
    }

    /// Returns the arcs of the object identifier.
    ///
    /// Returns `None` if any arc doesn’t fit into a `u64`.
    pub fn arcs(&self) -> Option<SmallVec<[u64; 8]>> {
        let mut components = self.components();
        let first = components.next()?.to_u64()?;
        let mut res = SmallVec::new();
        match first {
            0..=39 => { res.push(0); res.push(first) }
            40..=79 => { res.push(1); res.push(first - 40) }
            _ => { res.push(2); res.push(first - 80) }
        }
        for component in components {
            res.push(component.to_u64()?);
        }
        Some(res)
    }
}

impl Decode for Oid<Bytes> {
    const TAG: Tag = Tag::OID;

    fn from_object(object: Object, _mode: Mode) -> Result<Self, DecodeError> {
        Self::from_content(
            object.value().clone()
        ).map_err(|err| object.content_err(err))
    }
}


//--- AsRef

impl<T: AsRef<[u8]>> AsRef<[u8]> for Oid<T> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- PartialEq and Eq

impl<T: AsRef<[u8]>, U: AsRef<[u8]>> PartialEq<Oid<U>> for Oid<T> {
    fn eq(&self, other: &Oid<U>) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl<T: AsRef<[u8]>> Eq for Oid<T> { }


//--- Hash

impl<T: AsRef<[u8]>> hash::Hash for Oid<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state)
    }
}


//--- Display

impl<T: AsRef<[u8]>> fmt::Display for Oid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Arcs too large for a u64 are really rare (if not non-existant),
        // so we don’t bother converting them into decimal.
        match self.arcs() {
            Some(arcs) => {
                let mut arcs = arcs.into_iter();
                if let Some(first) = arcs.next() {
                    write!(f, "{}", first)?;
                }
                for arc in arcs {
                    write!(f, ".{}", arc)?;
                }
                Ok(())
            }
            None => f.write_str("(unrepresentable object identifier)")
        }
    }
}


//------------ Component -----------------------------------------------------

/// A sub-identifier of an object identifier.
///
/// These are integers, encoded base 128 with the most significant bit of
/// each octet set if more octets follow. Because they aren’t bounded in any
/// way, we keep them as references to the underlying octets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Component<'a> {
    /// The octets of the subidentifer.
    slice: &'a [u8],
}

impl<'a> Component<'a> {
    /// Returns the encoded octets of the sub-identifier.
    pub fn as_slice(self) -> &'a [u8] {
        self.slice
    }

    /// Attempts to convert the sub-identifier to `u64`.
    ///
    /// Since the value can be larger than the maximum value of a `u64`,
    /// this may fail in which case the method will return `None`.
    pub fn to_u64(self) -> Option<u64> {
        let mut res = 0u64;
        for &ch in self.slice {
            if res.leading_zeros() < 7 {
                return None
            }
            res = res << 7 | u64::from(ch & 0x7F);
        }
        Some(res)
    }
}


//------------ Components ----------------------------------------------------

/// An iterator over the sub-identifiers in an object identifier.
#[derive(Clone, Debug)]
pub struct Components<'a> {
    /// The remainder of the object identifier’s encoded octets.
    slice: &'a [u8],
}

impl<'a> Iterator for Components<'a> {
    type Item = Component<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.slice.is_empty() {
            return None
        }
        // A trailing incomplete sub-identifier is returned as is.
        let len = self.slice.iter().position(|ch| ch & 0x80 == 0).map(|idx| {
            idx + 1
        }).unwrap_or(self.slice.len());
        let (res, tail) = self.slice.split_at(len);
        self.slice = tail;
        Some(Component { slice: res })
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::Decoder;

    const RSA_ENCRYPTION: ConstOid = Oid(
        &[42, 134, 72, 134, 247, 13, 1, 1, 1]
    );

    fn take(data: &[u8]) -> Result<Oid, DecodeError> {
        Decoder::new(data).take()
    }

    #[test]
    fn decode_and_display() {
        let oid = take(
            b"\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x01\x01"
        ).unwrap();
        assert_eq!(oid, RSA_ENCRYPTION);
        assert_eq!(oid.to_string(), "1.2.840.113549.1.1.1");
        assert_eq!(
            oid.arcs().unwrap().as_slice(),
            &[1, 2, 840, 113549, 1, 1, 1]
        );
        assert_eq!(oid.components().count(), 6);

        let oid = take(b"\x06\x03\x88\x37\x03").unwrap();
        assert_eq!(oid.to_string(), "2.999.3");
        let oid = take(b"\x06\x01\x00").unwrap();
        assert_eq!(oid.to_string(), "0.0");
    }

    #[test]
    fn invalid() {
        assert!(take(b"\x06\x00").is_err());
        assert!(take(b"\x06\x02\x2a\x86").is_err());
        assert!(take(b"\x06\x03\x2a\x80\x01").is_err());
        assert!(take(b"\x26\x01\x2a").is_err());
    }

    #[test]
    fn oversized_arc() {
        let oid = take(
            b"\x06\x0c\x2a\x81\x80\x80\x80\x80\x80\x80\x80\x80\x80\x00"
        ).unwrap();
        assert!(oid.arcs().is_none());
        assert_eq!(oid.to_string(), "(unrepresentable object identifier)");
        assert_eq!(
            take(b"\x06\x0b\x2a\x81\xff\xff\xff\xff\xff\xff\xff\xff\x7f")
                .unwrap().arcs().unwrap()[2],
            u64::MAX
        );
    }
}
