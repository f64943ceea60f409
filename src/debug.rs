//! Macros for last-resort debugging.
//!
//! Since errors produced by the decoder only carry a message and a
//! position, debugging code using it may be difficult. To remedy this
//! somewhat, this module contains a macro `xerr!()` that will log a
//! backtrace at debug level if the `extra-debug` feature is enabled during
//! build before resolving into whatever the expression it encloses
//! resolves to otherwise. Use it whenever you initially produce an error,
//! i.e.:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(Err(source.content_err("malformed")))
//! }
//! ```
//!
//! or, with an early return:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(return Err(source.content_err("malformed")));
//! }
//! ```

#[cfg(feature = "extra-debug")]
pub use backtrace::Backtrace;

#[cfg(feature = "extra-debug")]
macro_rules! xerr {
    ($test:expr) => {{
        log::debug!(
            "decoding error raised at\n{:?}",
            $crate::debug::Backtrace::new()
        );
        $test
    }}
}

#[cfg(not(feature = "extra-debug"))]
macro_rules! xerr {
    ($test:expr) => { $test };
}
