//! The BER mode.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::{Decoder, DecodeError, IntoSource};


//------------ Mode ----------------------------------------------------------

/// The BER Mode.
///
/// X.690 defines three variants of the encoding rules, the basic rules
/// themselves and two more restrictive forms. Of these, this crate
/// supports the basic rules and the distinguished rules. The canonical
/// rules require indefinite length encoding for constructed values which
/// is not supported.
///
/// The mode is chosen when creating a decoder and is then passed on to
/// every nested decoder and value. It affects the lengths and booleans
/// that are accepted.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules. Lengths may use more octets than
    /// necessary and any non-zero octet is a true boolean.
    #[default]
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules require the shortest possible encoding. Additional
    /// rules apply to booleans and bit strings.
    Der,
}

impl Mode {
    /// Returns whether the mode is DER.
    pub fn is_der(self) -> bool {
        matches!(self, Mode::Der)
    }

    /// Creates a new decoder for the given source using this mode.
    pub fn decoder<S: IntoSource>(self, source: S) -> Decoder<S::Source> {
        Decoder::with_mode(source, self)
    }

    /// Decodes a source using this mode.
    ///
    /// The closure `op` receives a decoder atop the source and is expected
    /// to read everything it needs from it. Afterwards, the source must
    /// have been exhausted or an error is returned.
    pub fn decode<S, F, T>(self, source: S, op: F) -> Result<T, DecodeError>
    where
        S: IntoSource,
        F: FnOnce(&mut Decoder<S::Source>) -> Result<T, DecodeError>,
    {
        let mut decoder = self.decoder(source);
        let res = op(&mut decoder)?;
        decoder.verify_end()?;
        Ok(res)
    }
}


//============ Tests =========================================================
