//! The length octets.
//!
//! This is a private module. The [`Length`] definied herein is not
//! publicly exposed.

use crate::mode::Mode;
use crate::decode::{DecodeError, Source};


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// Only definite lengths are supported, i.e., lengths that provide the
/// actual number of content octets in the value.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite which we
/// reject. Otherwise, those following octets give the big-endian encoding
/// of the definite length of the content octets.
///
/// Under DER rules, a length must be encoded in the minimum number of
/// octets. Because of this, parsing takes the mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Length(usize);

impl Length {
    /// The maximum number of significant length octets.
    const MAX_OCTETS: usize = std::mem::size_of::<usize>();

    /// Returns the length.
    pub fn value(self) -> usize {
        self.0
    }

    /// Parses a length from a source.
    pub fn take_from<S: Source>(
        source: &mut S, mode: Mode,
    ) -> Result<Self, DecodeError> {
        if mode.is_der() {
            Self::take_from_restricted(source)
        }
        else {
            Self::take_from_relaxed(source)
        }
    }

    /// Parses a length from a source in BER mode.
    fn take_from_relaxed<S: Source>(
        source: &mut S
    ) -> Result<Self, DecodeError> {
        let pos = source.pos();
        let len = match FirstOctet::take(source)? {
            FirstOctet::Single(res) => return Ok(res),
            FirstOctet::Multi(len) => len,
        };

        // Leading zeros are allowed and don’t count towards the size
        // limit.
        let mut res = 0usize;
        let mut significant = 0;
        for _ in 0..len {
            let octet = source.take_u8()?;
            if significant == 0 && octet == 0 {
                continue
            }
            significant += 1;
            if significant > Length::MAX_OCTETS {
                xerr!(return Err(
                    DecodeError::content("excessive length", pos)
                ))
            }
            res = (res << 8) | usize::from(octet);
        }
        Ok(Length(res))
    }

    /// Parses a length from a source in DER mode.
    fn take_from_restricted<S: Source>(
        source: &mut S
    ) -> Result<Self, DecodeError> {
        // The difference to the BER case is the second octet can’t be zero
        // and it can’t be less that 0x80 if it is the last octet as well.
        // In both cases, there is a shorter encoding.
        let pos = source.pos();
        let len = match FirstOctet::take(source)? {
            FirstOctet::Single(res) => return Ok(res),
            FirstOctet::Multi(len) => len,
        };
        if len > Length::MAX_OCTETS {
            xerr!(return Err(DecodeError::content("excessive length", pos)))
        }

        let second = source.take_u8()?;
        if second == 0 || (second < 0x80 && len == 1) {
            xerr!(return Err(
                DecodeError::content("non-minimal length in DER", pos)
            ))
        }
        let mut res = usize::from(second);
        for _ in 1..len {
            res = (res << 8) | usize::from(source.take_u8()?);
        }
        Ok(Length(res))
    }
}


//------------ FirstOctet ---------------------------------------------------

/// The first octet of the encoded length.
enum FirstOctet {
    /// The first octet is a length in and of itself.
    Single(Length),

    /// The first octet indicates the number of octets to follow.
    Multi(usize),
}

impl FirstOctet {
    /// Takes the first octet and checks what it means.
    fn take<S: Source>(source: &mut S) -> Result<Self, DecodeError> {
        let pos = source.pos();
        match source.take_u8()? {
            // Bit 7 clear: single.
            n if (n & 0x80) == 0 => {
                Ok(Self::Single(Length(usize::from(n))))
            }

            // 0x80: indefinite.
            0x80 => {
                xerr!(Err(DecodeError::content(
                    "indefinite length encoding not supported", pos
                )))
            }

            // 0xFF: illegal.
            0xFF => {
                xerr!(Err(DecodeError::content(
                    "illegal length octets", pos
                )))
            }

            // anything else: clear left bit, number of octets.
            n => Ok(Self::Multi(usize::from(n & 0x7F)))
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::SliceSource;
    use super::*;

    fn take_from(src: &[u8], mode: Mode) -> Result<usize, DecodeError> {
        let mut src = SliceSource::new(src);
        let res = Length::take_from(&mut src, mode)?;
        if src.remaining_slice().is_empty() {
            Ok(res.value())
        }
        else {
            Err(src.content_err("TRAILING DATA"))
        }
    }

    #[test]
    fn ber_take_from() {
        let ber = |src: &[u8]| take_from(src, Mode::Ber);

        assert_eq!(ber(b"\x00").unwrap(), 0x00);
        assert_eq!(ber(b"\x12").unwrap(), 0x12);
        assert_eq!(ber(b"\x7f").unwrap(), 0x7f);
        assert!(ber(b"\x80").is_err());
        assert_eq!(ber(b"\x81\x00").unwrap(), 0);
        assert_eq!(ber(b"\x81\xF0").unwrap(), 0xF0);
        assert_eq!(ber(b"\x82\x00\x00").unwrap(), 0);
        assert_eq!(ber(b"\x82\xF0\x0E").unwrap(), 0xF00E);
        assert_eq!(ber(b"\x82\x00\x0E").unwrap(), 0x0E);
        assert!(ber(b"\xFF").is_err());
        assert!(ber(b"\x82\x01").is_err());
        assert!(ber(b"\x81").is_err());
    }

    #[test]
    fn der_take_from() {
        let der = |src: &[u8]| take_from(src, Mode::Der);

        assert_eq!(der(b"\x00").unwrap(), 0x00);
        assert_eq!(der(b"\x12").unwrap(), 0x12);
        assert_eq!(der(b"\x7f").unwrap(), 0x7f);
        assert!(der(b"\x80").is_err());
        assert!(der(b"\x81\x00").is_err());
        assert!(der(b"\x81\x7f").is_err());
        assert_eq!(der(b"\x81\x80").unwrap(), 0x80);
        assert_eq!(der(b"\x81\xF0").unwrap(), 0xF0);
        assert!(der(b"\x82\x00\x00").is_err());
        assert_eq!(der(b"\x82\xF0\x0E").unwrap(), 0xF00E);
        assert!(der(b"\x82\x00\x0E").is_err());
        assert!(der(b"\xFF").is_err());
    }

    #[test]
    fn excessive_length() {
        let mut long = vec![0x80 | (Length::MAX_OCTETS as u8 + 1), 0x01];
        long.resize(Length::MAX_OCTETS + 2, 0);
        assert!(take_from(&long, Mode::Ber).is_err());
        assert!(take_from(&long, Mode::Der).is_err());

        // Leading zeros don’t count in BER.
        let mut padded = vec![0x80 | (Length::MAX_OCTETS as u8 + 2), 0, 0];
        padded.resize(Length::MAX_OCTETS + 2, 0);
        padded.push(0x05);
        assert_eq!(take_from(&padded, Mode::Ber).unwrap(), 5);
    }
}
