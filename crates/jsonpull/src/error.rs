use thiserror::Error;

use crate::context::Context;

/// A lexical or structural fault.
///
/// This is the payload of every [`TokenKind::Error`](crate::TokenKind::Error)
/// token. The message is static; the offset points at the byte where the
/// fault was detected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("{message} at byte {offset}")]
pub struct SyntaxError {
    /// Byte offset of the fault in the document.
    pub offset: usize,
    /// Human readable description.
    pub message: &'static str,
}

impl SyntaxError {
    /// Resolves the offset to a line and column in `document`.
    #[must_use]
    pub fn locate(self, document: &[u8]) -> ParseError {
        let context = Context::resolve(document, self.offset);
        ParseError {
            message: self.message,
            offset: self.offset,
            line: context.line_number,
            column: context.column + 1,
        }
    }
}

/// A [`SyntaxError`] resolved against its document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    /// Human readable description.
    pub message: &'static str,
    /// Byte offset of the fault in the document.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based byte column.
    pub column: usize,
}

/// Failure to decode a token that was lexically valid.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The integer literal does not fit the requested type.
    #[error("integer literal does not fit in {target}")]
    IntegerOutOfRange {
        /// Name of the requested type.
        target: &'static str,
    },
    /// The literal could not be converted to a number.
    #[error("invalid number literal")]
    InvalidNumber,
    /// The decoded string is not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}
