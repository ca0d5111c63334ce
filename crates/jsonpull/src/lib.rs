//! A pull-based JSON tokenizer.
//!
//! [`Tokenizer`] walks a complete, in-memory document once and hands out one
//! [`Token`] per call to [`Tokenizer::next`]. No tree is built: containers are
//! reported as open/close tokens in depth-first order, scalars as byte spans
//! into the input buffer. Strings are decoded in place on request, so the
//! common path performs no allocation beyond the expectation stack.
//!
//! ```rust
//! use jsonpull::{TokenKind, Tokenizer};
//!
//! let mut input = br#"{"name": "Ada", "tags": [1, 2]}"#.to_vec();
//! let mut tokenizer = Tokenizer::new(&mut input);
//!
//! assert_eq!(tokenizer.next().kind(), TokenKind::Object);
//! let key = tokenizer.next();
//! assert_eq!(tokenizer.parse_string(key), "name");
//! let value = tokenizer.next();
//! assert_eq!(tokenizer.parse_str(value), Ok("Ada"));
//! ```
//!
//! Once a fault is detected the tokenizer latches: every further call returns
//! an [`TokenKind::Error`] token and the cursor never moves past the fault.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod context;
mod error;
pub mod escape;
mod options;
mod token;
mod tokenizer;

#[cfg(feature = "bind")]
pub mod bind;

#[cfg(test)]
mod tests;

pub use context::Context;
pub use error::{DecodeError, ParseError, SyntaxError};
pub use options::TokenizerOptions;
pub use token::{Span, Token, TokenKind};
pub use tokenizer::Tokenizer;

pub use bstr::BStr;
