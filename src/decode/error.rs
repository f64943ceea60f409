//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt, io};
use super::source::Pos;


//------------ ContentError --------------------------------------------------

/// An error happened while interpreting the encoded data.
///
/// The error keeps a human readable message describing what was expected
/// and what was found instead. Messages can either be static strings or
/// anything that can be displayed.
pub struct ContentError {
    /// The error message.
    message: ErrorMessage,
}

/// The message of a content error.
enum ErrorMessage {
    Static(&'static str),
    Boxed(Box<dyn fmt::Display + Send + Sync>),
}

impl ContentError {
    /// Creates a content error from a static string.
    pub fn from_static(msg: &'static str) -> Self {
        ContentError { message: ErrorMessage::Static(msg) }
    }

    /// Creates a content error from a boxed trait object.
    pub fn from_boxed(msg: Box<dyn fmt::Display + Send + Sync>) -> Self {
        ContentError { message: ErrorMessage::Boxed(msg) }
    }
}

impl From<&'static str> for ContentError {
    fn from(msg: &'static str) -> Self {
        Self::from_static(msg)
    }
}

impl From<String> for ContentError {
    fn from(msg: String) -> Self {
        Self::from_boxed(Box::new(msg))
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.message {
            ErrorMessage::Static(msg) => f.write_str(msg),
            ErrorMessage::Boxed(ref msg) => msg.fmt(f),
        }
    }
}

impl fmt::Debug for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ContentError")
            .field(&format_args!("{}", self))
            .finish()
    }
}


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// This is the only error produced by the decoder. It either wraps an
/// error of the underlying reader or it describes encoded data that didn’t
/// conform with the expectations of the caller: truncated values,
/// indefinite or excessive lengths, tag mismatches, non-canonical values,
/// integers that don’t fit, or trailing data.
///
/// Content errors carry the position in the source where the offending
/// value started.
pub struct DecodeError {
    inner: DecodeErrorKind,
}

enum DecodeErrorKind {
    Source(io::Error),
    Content {
        error: ContentError,
        pos: Pos,
    }
}

impl DecodeError {
    /// Creates a decode error from a content error and a position.
    pub fn content(error: impl Into<ContentError>, pos: Pos) -> Self {
        DecodeError {
            inner: DecodeErrorKind::Content { error: error.into(), pos },
        }
    }

    /// Returns the content error if this is one.
    pub fn content_error(&self) -> Option<&ContentError> {
        match self.inner {
            DecodeErrorKind::Content { ref error, .. } => Some(error),
            DecodeErrorKind::Source(_) => None,
        }
    }

    /// Returns the position of a content error.
    pub fn pos(&self) -> Option<Pos> {
        match self.inner {
            DecodeErrorKind::Content { pos, .. } => Some(pos),
            DecodeErrorKind::Source(_) => None,
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        DecodeError { inner: DecodeErrorKind::Source(err) }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner {
            DecodeErrorKind::Source(ref err) => err.fmt(f),
            DecodeErrorKind::Content { ref error, pos } => {
                write!(f, "{}: {}", pos, error)
            }
        }
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner {
            DecodeErrorKind::Source(ref err) => {
                f.debug_tuple("DecodeError::Source").field(err).finish()
            }
            DecodeErrorKind::Content { ref error, pos } => {
                f.debug_struct("DecodeError::Content")
                    .field("error", error)
                    .field("pos", &pos)
                    .finish()
            }
        }
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.inner {
            DecodeErrorKind::Source(ref err) => Some(err),
            DecodeErrorKind::Content { .. } => None,
        }
    }
}


//============ Tests =========================================================
