//! Tokens handed out by the [`Tokenizer`](crate::Tokenizer).
//!
//! A [`Token`] is either a byte span into the tokenizer's input tagged with a
//! [`TokenKind`], or a terminal [`SyntaxError`]. Spans are plain indices, so a
//! token never borrows the buffer; reading its bytes always goes through the
//! tokenizer that produced it.

use core::{fmt, ops::Range};

use crate::error::SyntaxError;

/// Half-open byte range `[start, start + len)` into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Number of bytes covered.
    pub len: usize,
}

impl Span {
    #[must_use]
    pub(crate) const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Offset one past the last byte.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    /// The span as a slice range.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Classification of a [`Token`].
///
/// The first eight kinds are *items*: values that appear inside a container.
/// The remaining four terminate an iteration over a container's children
/// (see [`TokenKind::is_item`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `null`
    Null,
    /// `true` or `false`
    Bool,
    /// An integer literal without a sign.
    UInt,
    /// An integer literal with a leading `-`.
    Int,
    /// A literal with a fraction or an exponent.
    Float,
    /// A string literal; the span excludes the quotes and is still escaped.
    String,
    /// An opening `[`.
    Array,
    /// An opening `{`.
    Object,
    /// A closing `]`.
    EndArray,
    /// A closing `}`.
    EndObject,
    /// The document has been fully consumed.
    Eof,
    /// The tokenizer detected a fault and latched.
    Error,
}

impl TokenKind {
    /// Whether a loop over a container's children should continue.
    ///
    /// `false` for [`EndArray`](Self::EndArray),
    /// [`EndObject`](Self::EndObject), [`Eof`](Self::Eof) and
    /// [`Error`](Self::Error).
    #[must_use]
    pub const fn is_item(self) -> bool {
        !matches!(
            self,
            Self::EndArray | Self::EndObject | Self::Eof | Self::Error
        )
    }

    /// Whether the kind is one of the three numeric kinds.
    #[must_use]
    pub const fn is_number(self) -> bool {
        matches!(self, Self::UInt | Self::Int | Self::Float)
    }

    /// A short lowercase name, used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::UInt => "uint",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::EndArray => "end of array",
            Self::EndObject => "end of object",
            Self::Eof => "end of input",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lexical unit of a document.
///
/// Tokens are neither `Copy` nor `Clone`: decoding a string
/// token rewrites the bytes under it, so [`Tokenizer::parse_string`] takes
/// the token by value and the same literal can never be decoded twice.
///
/// [`Tokenizer::parse_string`]: crate::Tokenizer::parse_string
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct Token {
    repr: Repr,
}

#[derive(Debug, PartialEq, Eq)]
enum Repr {
    Lexeme { kind: TokenKind, span: Span },
    Error(SyntaxError),
}

impl Token {
    pub(crate) const fn new(kind: TokenKind, span: Span) -> Self {
        debug_assert!(!matches!(kind, TokenKind::Error));
        Self {
            repr: Repr::Lexeme { kind, span },
        }
    }

    pub(crate) const fn error(error: SyntaxError) -> Self {
        Self {
            repr: Repr::Error(error),
        }
    }

    /// The token's classification.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self.repr {
            Repr::Lexeme { kind, .. } => kind,
            Repr::Error(_) => TokenKind::Error,
        }
    }

    /// Whether a loop over a container's children should continue; see
    /// [`TokenKind::is_item`].
    #[must_use]
    pub const fn is_item(&self) -> bool {
        self.kind().is_item()
    }

    /// The bytes this token covers, or `None` for an error token.
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        match self.repr {
            Repr::Lexeme { span, .. } => Some(span),
            Repr::Error(_) => None,
        }
    }

    /// The fault carried by an error token.
    #[must_use]
    pub const fn syntax_error(&self) -> Option<SyntaxError> {
        match self.repr {
            Repr::Lexeme { .. } => None,
            Repr::Error(error) => Some(error),
        }
    }

    /// Byte offset of the token: the span start, or the fault location for
    /// an error token.
    #[must_use]
    pub const fn location(&self) -> usize {
        match self.repr {
            Repr::Lexeme { span, .. } => span.start,
            Repr::Error(error) => error.offset,
        }
    }

    /// Splits off the error case.
    ///
    /// # Errors
    ///
    /// Returns the carried [`SyntaxError`] if this is an error token.
    pub fn into_result(self) -> Result<Self, SyntaxError> {
        match self.repr {
            Repr::Error(error) => Err(error),
            Repr::Lexeme { .. } => Ok(self),
        }
    }
}

/// Classifies a literal made of number characters.
///
/// The literal must match `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
/// Digits with an optional leading `-` are integers; a fraction or an
/// exponent makes it a float. Returns `None` if the grammar does not match.
pub(crate) fn classify_number(literal: &[u8]) -> Option<TokenKind> {
    let negative = literal.first() == Some(&b'-');
    let int_start = usize::from(negative);
    let mut pos = skip_digits(literal, int_start);

    let int_digits = &literal[int_start..pos];
    if int_digits.is_empty() || (int_digits.len() > 1 && int_digits[0] == b'0') {
        return None;
    }

    let mut float = false;
    if literal.get(pos) == Some(&b'.') {
        let fraction_start = pos + 1;
        pos = skip_digits(literal, fraction_start);
        if pos == fraction_start {
            return None;
        }
        float = true;
    }

    if matches!(literal.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(literal.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exponent_start = pos;
        pos = skip_digits(literal, exponent_start);
        if pos == exponent_start {
            return None;
        }
        float = true;
    }

    if pos != literal.len() {
        return None;
    }

    Some(if float {
        TokenKind::Float
    } else if negative {
        TokenKind::Int
    } else {
        TokenKind::UInt
    })
}

fn skip_digits(bytes: &[u8], from: usize) -> usize {
    from + bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}
