//! The identifier octets of a BER encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::decode::{DecodeError, Source};


//------------ Tag -----------------------------------------------------------

/// The tag of a BER encoded value.
///
/// Each encoded value starts with one or more identifier octets. They
/// carry the class of the tag, its number, and whether the value is
/// constructed. A `Tag` only represents the class and the number, so two
/// tags compare equal regardless of the encoding of the values they were
/// taken from. Whether a value was constructed is kept by [`Object`].
///
/// # Limitations
///
/// Tag numbers are limited to [`Tag::MAX_NUMBER`], i.e., to what fits into
/// three continuation octets after the initial octet. Identifiers that
/// need more octets are rejected when decoding.
///
/// [`Object`]: crate::decode::Object
//
//  The tag is kept as its identifier octets with the constructed bit
//  cleared and unused octets set to zero. This makes comparison a simple
//  array comparison.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Tag([u8; 4]);

/// # Constants for Often Used Tag Values
///
impl Tag {
    /// The largest supported tag number.
    pub const MAX_NUMBER: u32 = 0x1f_ffff;

    /// The tag marking the end of an indefinite length value, UNIVERSAL 0.
    ///
    /// Since indefinite lengths aren’t supported, a value with this tag is
    /// treated like any other value.
    pub const END_OF_VALUE: Self = Tag::universal(0);

    /// UNIVERSAL 1, the BOOLEAN type.
    pub const BOOLEAN: Self = Tag::universal(1);

    /// UNIVERSAL 2, the INTEGER type.
    pub const INTEGER: Self = Tag::universal(2);

    /// UNIVERSAL 3, the BIT STRING type.
    pub const BIT_STRING: Self = Tag::universal(3);

    /// UNIVERSAL 4, the OCTET STRING type.
    pub const OCTET_STRING: Self = Tag::universal(4);

    /// UNIVERSAL 5, the NULL type.
    pub const NULL: Self = Tag::universal(5);

    /// UNIVERSAL 6, the OBJECT IDENTIFIER type.
    pub const OID: Self = Tag::universal(6);

    /// UNIVERSAL 10, the ENUMERATED type.
    pub const ENUMERATED: Self = Tag::universal(10);

    /// UNIVERSAL 12, the UTF8String type.
    pub const UTF8_STRING: Self = Tag::universal(12);

    /// UNIVERSAL 16, the SEQUENCE and SEQUENCE OF types.
    pub const SEQUENCE: Self = Tag::universal(16);

    /// UNIVERSAL 17, the SET and SET OF types.
    pub const SET: Self = Tag::universal(17);

    /// UNIVERSAL 19, the PrintableString type.
    pub const PRINTABLE_STRING: Self = Tag::universal(19);

    /// UNIVERSAL 22, the IA5String type.
    pub const IA5_STRING: Self = Tag::universal(22);

    /// UNIVERSAL 23, the UTCTime type.
    pub const UTC_TIME: Self = Tag::universal(23);

    /// UNIVERSAL 24, the GeneralizedTime type.
    pub const GENERALIZED_TIME: Self = Tag::universal(24);

    /// UNIVERSAL 30, the BMPString type.
    pub const BMP_STRING: Self = Tag::universal(30);
}

impl Tag {
    /// The bits of the initial octet holding the class.
    const CLASS_BITS: u8 = 0xc0;

    /// The bit of the initial octet marking constructed encoding.
    const CONSTRUCTED_BIT: u8 = 0x20;

    /// The bits of the initial octet holding a low tag number.
    ///
    /// If they are all set, the number follows in continuation octets.
    const NUMBER_BITS: u8 = 0x1f;

    /// The bit of a continuation octet signalling that more follow.
    const MORE_BIT: u8 = 0x80;

    /// Creates a tag from a class and a number.
    ///
    /// Numbers up to 30 are kept in the initial octet. Larger numbers use
    /// the high tag number form: the number bits of the initial octet are
    /// all set and the number follows base 128 in as few continuation
    /// octets as possible, most significant digit first.
    ///
    /// # Panics
    ///
    /// The function panics if `number` is greater than
    /// [`Tag::MAX_NUMBER`].
    pub const fn new(class: Class, number: u32) -> Self {
        assert!(number <= Tag::MAX_NUMBER, "tag number too large");
        let class = class.into_u8();
        if number < Tag::NUMBER_BITS as u32 {
            return Tag([class | number as u8, 0, 0, 0])
        }
        let mut res = [class | Tag::NUMBER_BITS, 0, 0, 0];
        let digits = if number < 1 << 7 { 1 }
                     else if number < 1 << 14 { 2 }
                     else { 3 };
        let mut i = 0;
        while i < digits {
            let shift = 7 * (digits - 1 - i);
            let mut octet = ((number >> shift) & 0x7f) as u8;
            if i + 1 < digits {
                octet |= Tag::MORE_BIT
            }
            res[i + 1] = octet;
            i += 1;
        }
        Tag(res)
    }

    /// Creates a new tag in the universal class.
    pub const fn universal(number: u32) -> Self {
        Tag::new(Class::Universal, number)
    }

    /// Creates a new tag in the application class.
    pub const fn application(number: u32) -> Self {
        Tag::new(Class::Application, number)
    }

    /// Creates a new tag in the context specific class.
    ///
    /// This is the class used by default for tagged fields.
    pub const fn ctx(number: u32) -> Self {
        Tag::new(Class::Context, number)
    }

    /// Creates a new tag in the private class.
    pub const fn private(number: u32) -> Self {
        Tag::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        Class::from_u8(self.0[0])
    }

    /// Returns whether the tag is of the universal class.
    pub fn is_universal(self) -> bool {
        matches!(self.class(), Class::Universal)
    }

    /// Returns whether the tag is of the context specific class.
    pub fn is_context_specific(self) -> bool {
        matches!(self.class(), Class::Context)
    }

    /// Returns the number of the tag.
    pub fn number(self) -> u32 {
        if self.0[0] & Tag::NUMBER_BITS != Tag::NUMBER_BITS {
            return u32::from(self.0[0] & Tag::NUMBER_BITS)
        }
        let mut res = 0;
        for &octet in &self.0[1..] {
            res = (res << 7) | u32::from(octet & 0x7f);
            if octet & Tag::MORE_BIT == 0 {
                break
            }
        }
        res
    }

    /// Takes a tag from the beginning of a source.
    ///
    /// Upon success, returns both the tag and whether the value is
    /// constructed. If there are no more octets available in the source,
    /// an error is returned.
    ///
    /// The high tag number form is only accepted for numbers of 31 and
    /// up, and without a leading padding octet of 0x80, so that equal
    /// tags always have equal identifier octets.
    pub fn take_from<S: Source>(
        source: &mut S,
    ) -> Result<(Self, bool), DecodeError> {
        let pos = source.pos();
        let first = source.take_u8()?;
        let constructed = first & Tag::CONSTRUCTED_BIT != 0;
        let mut res = [first & !Tag::CONSTRUCTED_BIT, 0, 0, 0];
        if first & Tag::NUMBER_BITS != Tag::NUMBER_BITS {
            return Ok((Tag(res), constructed))
        }
        for idx in 1..res.len() {
            let octet = match source.take_opt_u8()? {
                Some(octet) => octet,
                None => {
                    xerr!(return Err(DecodeError::content(
                        "truncated long-form tag", pos
                    )))
                }
            };
            if idx == 1 && (octet == Tag::MORE_BIT || octet < 0x1f) {
                xerr!(return Err(DecodeError::content(
                    "non-minimal long-form tag", pos
                )))
            }
            res[idx] = octet;
            if octet & Tag::MORE_BIT == 0 {
                return Ok((Tag(res), constructed))
            }
        }
        xerr!(Err(DecodeError::content(
            "tag number exceeds supported range", pos
        )))
    }

    /// Returns the name of a well-known universal tag.
    fn universal_name(self) -> Option<&'static str> {
        if !self.is_universal() {
            return None
        }
        Some(match self.number() {
            1 => "BOOLEAN",
            2 => "INTEGER",
            3 => "BIT STRING",
            4 => "OCTET STRING",
            5 => "NULL",
            6 => "OBJECT IDENTIFIER",
            10 => "ENUMERATED",
            12 => "UTF8String",
            16 => "SEQUENCE",
            17 => "SET",
            19 => "PrintableString",
            22 => "IA5String",
            23 => "UTCTime",
            24 => "GeneralizedTime",
            30 => "BMPString",
            _ => return None,
        })
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(name) = self.universal_name() {
            return f.write_str(name)
        }
        match self.class() {
            Class::Universal => write!(f, "[UNIVERSAL {}]", self.number()),
            Class::Application => {
                write!(f, "[APPLICATION {}]", self.number())
            }
            Class::Context => write!(f, "[{}]", self.number()),
            Class::Private => write!(f, "[PRIVATE {}]", self.number()),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    /// Types defined in X.680 itself.
    Universal,

    /// Types specific to an application.
    Application,

    /// Tags only meaningful within their enclosing type.
    Context,

    /// Types private to some organization.
    Private,
}

impl Class {
    const fn from_u8(octet: u8) -> Self {
        match octet & Tag::CLASS_BITS {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::Context,
            _ => Class::Private,
        }
    }

    const fn into_u8(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::Context => 0x80,
            Class::Private => 0xc0,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Class::Universal => "UNIVERSAL",
            Class::Application => "APPLICATION",
            Class::Context => "CONTEXT-SPECIFIC",
            Class::Private => "PRIVATE",
        })
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::SliceSource;

    const CLASSES: [Class; 4] = [
        Class::Universal, Class::Application, Class::Context, Class::Private
    ];

    fn take(data: &[u8]) -> Result<(Tag, bool), DecodeError> {
        let mut source = SliceSource::new(data);
        let res = Tag::take_from(&mut source)?;
        assert!(source.remaining_slice().is_empty(), "trailing octets");
        Ok(res)
    }

    /// Checks that a tag survives being taken from its identifier octets.
    fn check_number(class: Class, number: u32, octets: usize) {
        let tag = Tag::new(class, number);
        assert_eq!(tag.class(), class);
        assert_eq!(tag.number(), number, "number {}", number);
        assert_eq!(take(&tag.0[..octets]).unwrap(), (tag, false));
        let mut cons = tag.0;
        cons[0] |= 0x20;
        assert_eq!(take(&cons[..octets]).unwrap(), (tag, true));
    }

    #[test]
    fn low_tag_numbers() {
        for class in CLASSES {
            for number in 0..31 {
                check_number(class, number, 1);
            }
        }
        assert_eq!(take(b"\x02").unwrap(), (Tag::INTEGER, false));
        assert_eq!(take(b"\x30").unwrap(), (Tag::SEQUENCE, true));
        assert_eq!(take(b"\xa3").unwrap(), (Tag::ctx(3), true));
        assert_eq!(take(b"\x5e").unwrap(), (Tag::application(30), false));
    }

    #[test]
    fn high_tag_numbers() {
        for class in CLASSES {
            for number in [31, 32, 100, 127] {
                check_number(class, number, 2);
            }
            for number in [128, 129, 1000, 0x3fff] {
                check_number(class, number, 3);
            }
            for number in [0x4000, 0x12345, Tag::MAX_NUMBER] {
                check_number(class, number, 4);
            }
        }
        assert_eq!(take(b"\x9f\x1f").unwrap(), (Tag::ctx(31), false));
        assert_eq!(take(b"\xbf\x81\x00").unwrap(), (Tag::ctx(128), true));
        assert_eq!(
            take(b"\x1f\xff\xff\x7f").unwrap(),
            (Tag::universal(Tag::MAX_NUMBER), false)
        );
    }

    #[test]
    fn tag_failures() {
        // Five identifier octets.
        assert!(take(b"\xff\x80\x80\x80\x00").is_err());
        // Truncated high tag number.
        assert!(take(b"\xbf\x81").is_err());
        assert!(take(b"\x1f").is_err());
        assert!(take(b"").is_err());
    }

    #[test]
    fn non_minimal_high_tags() {
        // Low numbers in the high tag number form.
        assert!(take(b"\x9f\x03").is_err());
        assert!(take(b"\x1f\x1e").is_err());
        assert!(take(b"\x1f\x00").is_err());
        // Leading padding octet.
        assert!(take(b"\x9f\x80\x03").is_err());
        assert!(take(b"\x9f\x80\x81\x00").is_err());
        // Smallest high tag number is fine.
        assert_eq!(take(b"\x9f\x1f").unwrap(), (Tag::ctx(31), false));
    }

    #[test]
    #[should_panic]
    fn number_too_large() {
        let _ = Tag::new(Class::Context, Tag::MAX_NUMBER + 1);
    }

    #[test]
    fn display() {
        assert_eq!(Tag::SEQUENCE.to_string(), "SEQUENCE");
        assert_eq!(Tag::OID.to_string(), "OBJECT IDENTIFIER");
        assert_eq!(Tag::ctx(3).to_string(), "[3]");
        assert_eq!(Tag::ctx(2).to_string(), "[2]");
        assert_eq!(Tag::application(40).to_string(), "[APPLICATION 40]");
        assert_eq!(Tag::universal(31).to_string(), "[UNIVERSAL 31]");
        assert_eq!(Tag::private(0).to_string(), "[PRIVATE 0]");
        assert_eq!(format!("{:?}", Tag::INTEGER), "Tag(INTEGER)");
        assert_eq!(Class::Context.to_string(), "CONTEXT-SPECIFIC");
    }
}
